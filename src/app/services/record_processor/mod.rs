//! Record processing module for CNAB400 return files
//!
//! This module is the core of the processor: it takes the ordered lines of one
//! file and the settings of its bank, and decides which output bucket each
//! record belongs to.
//!
//! # Architecture
//!
//! - [`processor`] - RecordProcessor and the filter/split pass
//! - [`stats`] - Run statistics and the processing outcome
//!
//! # Processing Rules
//!
//! 1. **Framing**: header (first line) and trailer (last line) are always kept,
//!    and copied into both split subsets so each stays a valid file on its own.
//! 2. **Validation**: data lines failing structural checks are counted and dropped.
//! 3. **Filtering**: valid lines are kept when the allowlist is empty, the line
//!    has no operation code, or its code is in the allowlist.
//! 4. **Splitting**: with splitting enabled, retained advance lines go only to the
//!    advance subset and everything else only to the normal subset. With
//!    splitting disabled both subsets mirror the retained set.
//!
//! # Example Usage
//!
//! ```rust
//! use cnab_processor::app::models::BankTag;
//! use cnab_processor::app::services::record_processor::process;
//! use cnab_processor::config::BankConfig;
//!
//! let lines = vec!["HEADER".to_string(), "TRAILER".to_string()];
//! let outcome = process(&lines, BankTag::Bradesco, &BankConfig::new("", true, false)).unwrap();
//! println!("{}", outcome.summary());
//! ```

pub mod processor;
pub mod stats;

#[cfg(test)]
pub mod tests;

// Re-export main types for easy access
pub use processor::{RecordProcessor, process};
pub use stats::{ProcessingOutcome, RunStatistics};
