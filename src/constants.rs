//! Application constants for the CNAB processor
//!
//! This module contains the CNAB400 field layout, bank identification tokens,
//! output naming conventions and configuration defaults used throughout the
//! processor.

// =============================================================================
// CNAB400 Field Layout
// =============================================================================

/// Fixed-width field offsets (0-based, end-exclusive, in characters)
pub mod fields {
    /// Bank code on the header record
    pub const BANK_CODE: (usize, usize) = (76, 79);

    /// Operation (occurrence) code on a data record
    pub const OPERATION_CODE: (usize, usize) = (108, 110);

    /// Due date in DDMMYY form
    pub const DUE_DATE: (usize, usize) = (110, 116);

    /// Document number, up to 15 characters
    pub const DOCUMENT_ID: (usize, usize) = (116, 131);

    /// Amount scaled by 1000, up to 16 digits
    pub const AMOUNT: (usize, usize) = (251, 267);

    /// Settlement type flag ('1' advance, '2' normal)
    pub const SETTLEMENT_FLAG: (usize, usize) = (318, 319);
}

/// Minimum line length for a structurally valid data record
pub const MIN_DATA_RECORD_LENGTH: usize = fields::AMOUNT.1;

/// Minimum line length for settlement-type aware paths
pub const MIN_SETTLEMENT_RECORD_LENGTH: usize = fields::SETTLEMENT_FLAG.1;

/// Minimum header length for positional bank identification
pub const MIN_HEADER_LENGTH: usize = fields::BANK_CODE.1;

/// Minimum number of characters in a document id
pub const MIN_DOCUMENT_ID_LENGTH: usize = 3;

/// Length of a DDMMYY date field
pub const DUE_DATE_LENGTH: usize = 6;

/// Implied decimal places of the raw amount field (value × 1000)
pub const AMOUNT_RAW_SCALE: u32 = 3;

/// Decimal places of exported amounts
pub const EXPORT_AMOUNT_DECIMALS: u32 = 2;

/// Two-digit years up to this value are in the 2000s, above it in the 1900s
pub const YEAR_PIVOT: u32 = 30;

/// Settlement flag values
pub mod settlement_flags {
    pub const ADVANCE: char = '1';
    pub const NORMAL: char = '2';
}

/// First-character record type markers for header/trailer-coded layouts
pub mod record_markers {
    pub const HEADER: char = '0';
    pub const TRAILER: char = '9';
}

// =============================================================================
// Bank Identification
// =============================================================================

pub const BRADESCO_CODE: &str = "237";
pub const BRADESCO_NAME_TOKEN: &str = "BRADESCO";

pub const BB_CODE: &str = "001";
pub const BB_NAME_TOKEN: &str = "BANCO DO BRASIL";

// =============================================================================
// Output Artifacts
// =============================================================================

pub const FILTERED_SUFFIX: &str = "_alterado";
pub const NORMAL_SUFFIX: &str = "_normal";
pub const ADVANCE_SUFFIX: &str = "_antecipado";
pub const REPORT_SUFFIX: &str = "_relatorio";
pub const REPORT_EXTENSION: &str = "txt";

/// Column headers of the tabular export
pub const EXPORT_COLUMNS: [&str; 3] = ["n_documento", "valor", "data_pagamento"];

/// Amount written when the raw amount field is not numeric
pub const DEFAULT_EXPORT_AMOUNT: &str = "0,00";

// =============================================================================
// Configuration Defaults
// =============================================================================

pub const DEFAULT_CHECK_INTERVAL_SECS: u64 = 30;
pub const DEFAULT_LOCAL_DIR: &str = "cnab";
pub const DEFAULT_LEDGER_FILE: &str = "processed_files.md";
pub const DEFAULT_FILE_EXTENSION: &str = "RET";
pub const DEFAULT_ENCODINGS: &str = "utf-8,latin-1";

/// Timestamp format used in ledger entries
pub const LEDGER_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Number of leading data lines traced in detail at debug level
pub const TRACE_FIRST_LINES: usize = 5;
