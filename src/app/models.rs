//! Data models for CNAB processing
//!
//! This module contains the core data structures for representing banks,
//! decoded CNAB400 data records and the rows handed to the export sink.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Bank Identification
// =============================================================================

/// Issuing bank of a return file, derived once from the header record
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BankTag {
    /// Banco do Brasil (code 001)
    Bb,
    /// Bradesco (code 237)
    Bradesco,
    /// Header did not match any supported bank
    Unknown,
}

impl BankTag {
    /// Banks with a configuration section
    pub const CONFIGURABLE: [BankTag; 2] = [BankTag::Bb, BankTag::Bradesco];

    /// Name used in configuration keys and reports
    pub fn as_str(&self) -> &'static str {
        match self {
            BankTag::Bb => "BB",
            BankTag::Bradesco => "BRADESCO",
            BankTag::Unknown => "UNKNOWN",
        }
    }

    /// Check whether the header was matched to a supported bank
    pub fn is_identified(&self) -> bool {
        !matches!(self, BankTag::Unknown)
    }
}

impl fmt::Display for BankTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BankTag {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BB" => Ok(BankTag::Bb),
            "BRADESCO" => Ok(BankTag::Bradesco),
            "UNKNOWN" => Ok(BankTag::Unknown),
            other => Err(Error::configuration(format!("Unknown bank tag: '{}'", other))),
        }
    }
}

// =============================================================================
// Record Classification
// =============================================================================

/// Settlement type carried by the flag at position 319
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettlementType {
    Normal,
    Advance,
    Unknown,
}

impl fmt::Display for SettlementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SettlementType::Normal => "normal",
            SettlementType::Advance => "advance",
            SettlementType::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Why a data line failed structural validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidReason {
    TooShort,
    HeaderOrTrailer,
    MissingDocumentId,
    InvalidDocumentId,
    InvalidAmount,
    InvalidDueDate,
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            InvalidReason::TooShort => "line too short",
            InvalidReason::HeaderOrTrailer => "header or trailer record",
            InvalidReason::MissingDocumentId => "missing document id",
            InvalidReason::InvalidDocumentId => "invalid document id",
            InvalidReason::InvalidAmount => "invalid amount",
            InvalidReason::InvalidDueDate => "invalid due date",
        };
        f.write_str(text)
    }
}

/// Result of validating one line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStatus {
    Valid,
    Invalid(InvalidReason),
}

impl LineStatus {
    pub fn is_valid(&self) -> bool {
        matches!(self, LineStatus::Valid)
    }
}

/// Derived view of one data line, computed fresh and never persisted
///
/// Fields the line is too short to contain are `None`; a field that is present
/// but blank is `Some("")`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedRecord {
    pub operation_code: Option<String>,
    pub settlement_type: SettlementType,
    pub status: LineStatus,
    pub document_id: Option<String>,
    pub amount_raw: Option<String>,
    pub due_date_raw: Option<String>,
}

impl DecodedRecord {
    pub fn is_structurally_valid(&self) -> bool {
        self.status.is_valid()
    }
}

// =============================================================================
// Export Records
// =============================================================================

/// One row of the tabular export of advance settlements
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRecord {
    /// Document number, never empty
    #[serde(rename = "n_documento")]
    pub document_id: String,

    /// Amount with two decimals and a comma separator (e.g. "25,00")
    #[serde(rename = "valor")]
    pub amount: String,

    /// Due date as DD/MM/YYYY, or empty when the raw field was malformed
    #[serde(rename = "data_pagamento")]
    pub due_date: String,
}

/// Tabular export format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    Xlsx,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "xlsx" | "excel" => Ok(ExportFormat::Xlsx),
            other => Err(Error::configuration(format!(
                "Unsupported output format '{}' (expected csv or xlsx)",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bank_tag_round_trip_names() {
        for tag in [BankTag::Bb, BankTag::Bradesco, BankTag::Unknown] {
            assert_eq!(tag.as_str().parse::<BankTag>().unwrap(), tag);
        }
        assert!("itau".parse::<BankTag>().is_err());
    }

    #[test]
    fn test_bank_tag_orders_as_map_key() {
        let banks: std::collections::BTreeMap<BankTag, &str> = [
            (BankTag::Unknown, "unknown"),
            (BankTag::Bradesco, "bradesco"),
            (BankTag::Bb, "bb"),
        ]
        .into_iter()
        .collect();
        assert_eq!(
            banks.keys().copied().collect::<Vec<_>>(),
            vec![BankTag::Bb, BankTag::Bradesco, BankTag::Unknown]
        );
    }

    #[test]
    fn test_bank_tag_identified() {
        assert!(BankTag::Bb.is_identified());
        assert!(!BankTag::Unknown.is_identified());
    }

    #[test]
    fn test_export_format_parsing() {
        assert_eq!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!(" xlsx ".parse::<ExportFormat>().unwrap(), ExportFormat::Xlsx);
        assert!("pdf".parse::<ExportFormat>().is_err());
        assert_eq!(ExportFormat::default().extension(), "csv");
    }
}
