//! CNAB Processor Library
//!
//! A Rust library for filtering and splitting CNAB400 bank return files
//! (fixed-width, one record per line) by operation code and settlement type.
//!
//! This library provides tools for:
//! - Decoding return files with an ordered encoding fallback
//! - Extracting positional fields with strict offset contracts
//! - Identifying the issuing bank from the header record
//! - Classifying data records as normal, advance or unknown settlements
//! - Filtering records against per-bank operation allowlists and splitting them
//! - Exporting advance records as CSV/XLSX and writing a processing report
//! - Polling directories and skipping files already recorded in a ledger

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod cnab_parser;
        pub mod document_extractor;
        pub mod export_writer;
        pub mod file_runner;
        pub mod record_processor;
        pub mod report;
        pub mod watcher;
    }
    pub mod adapters {
        pub mod filesystem;
        pub mod ledger;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{BankTag, ExportRecord, SettlementType};
pub use app::services::record_processor::{ProcessingOutcome, RunStatistics};
pub use config::{BankConfig, Config};

/// Result type alias for the CNAB processor
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for CNAB processing operations
///
/// Per-line problems never show up here: they are tallied in the run statistics.
/// Every variant below is file-level or process-level.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// No encoding candidate could decode the file
    #[error("Could not decode file '{file}': {message}")]
    Decode { file: String, message: String },

    /// The input file has no lines
    #[error("Empty file: {file}")]
    EmptyFile { file: String },

    /// The header did not match any known bank and policy says skip
    #[error("Bank not identified in file '{file}'")]
    BankUnidentified { file: String },

    /// Processing is disabled for the detected bank
    #[error("Processing disabled for bank {bank}")]
    BankDisabled { bank: String },

    /// Tabular export failed
    #[error("Export error: {message}")]
    Export { message: String },

    /// CSV writing error
    #[error("CSV error in '{file}': {message}")]
    Csv {
        file: String,
        message: String,
        #[source]
        source: Option<csv::Error>,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Processed-files ledger error
    #[error("Ledger error: {message}")]
    Ledger { message: String },

    /// File not found
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    /// Processing interrupted
    #[error("Processing interrupted: {reason}")]
    ProcessingInterrupted { reason: String },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a decode error
    pub fn decode(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            file: file.into(),
            message: message.into(),
        }
    }

    /// Create an empty file error
    pub fn empty_file(file: impl Into<String>) -> Self {
        Self::EmptyFile { file: file.into() }
    }

    /// Create a bank unidentified error
    pub fn bank_unidentified(file: impl Into<String>) -> Self {
        Self::BankUnidentified { file: file.into() }
    }

    /// Create a bank disabled error
    pub fn bank_disabled(bank: impl Into<String>) -> Self {
        Self::BankDisabled { bank: bank.into() }
    }

    /// Create an export error
    pub fn export(message: impl Into<String>) -> Self {
        Self::Export {
            message: message.into(),
        }
    }

    /// Create a CSV error with context
    pub fn csv(
        file: impl Into<String>,
        message: impl Into<String>,
        source: Option<csv::Error>,
    ) -> Self {
        Self::Csv {
            file: file.into(),
            message: message.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a ledger error
    pub fn ledger(message: impl Into<String>) -> Self {
        Self::Ledger {
            message: message.into(),
        }
    }

    /// Create a file not found error
    pub fn file_not_found(path: impl Into<String>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Create a processing interrupted error
    pub fn processing_interrupted(reason: impl Into<String>) -> Self {
        Self::ProcessingInterrupted {
            reason: reason.into(),
        }
    }

    /// True for outcomes that mean "nothing to do for this file" rather than a failure
    pub fn is_skip(&self) -> bool {
        matches!(
            self,
            Self::EmptyFile { .. } | Self::BankUnidentified { .. } | Self::BankDisabled { .. }
        )
    }
}

// Automatic conversions from common error types
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<csv::Error> for Error {
    fn from(error: csv::Error) -> Self {
        Self::Csv {
            file: "unknown".to_string(),
            message: "CSV writing failed".to_string(),
            source: Some(error),
        }
    }
}
