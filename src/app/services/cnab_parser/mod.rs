//! CNAB400 fixed-width parser
//!
//! This module turns raw return-file bytes into lines and lines into typed
//! views. It knows nothing about configuration or output; the record processor
//! drives it.
//!
//! ## Architecture
//!
//! - [`decoding`] - Encoding fallback, line splitting and re-encoding of outputs
//! - [`field_parsers`] - Positional field extraction and small value parsers
//! - [`bank_identifier`] - Bank detection from the header record
//! - [`record_classifier`] - Structural validity and settlement type of data records
//!
//! ## Usage
//!
//! ```rust
//! use cnab_processor::app::services::cnab_parser::{identify_bank, decode_file, TextEncoding};
//!
//! let bytes = b"header\r\ntrailer\r\n";
//! let file = decode_file(bytes, &[TextEncoding::Utf8, TextEncoding::Latin1], "A.RET").unwrap();
//! assert_eq!(file.lines.len(), 2);
//! let bank = identify_bank(&file.lines[0]);
//! println!("bank: {}", bank);
//! ```

pub mod bank_identifier;
pub mod decoding;
pub mod field_parsers;
pub mod record_classifier;

#[cfg(test)]
pub mod tests;

// Re-export main types for easy access
pub use bank_identifier::identify_bank;
pub use decoding::{DecodedFile, LineEnding, TextEncoding, decode_file};
pub use field_parsers::{Field, extract_field};
pub use record_classifier::{HeaderTrailerRule, classify_settlement, decode_record, validate_record};
