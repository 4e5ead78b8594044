//! Structural validation and settlement classification of data records
//!
//! Two rules answer "is this line a header or trailer":
//! - [`HeaderTrailerRule::Positional`]: first or last line of the file. Used by
//!   the record processor, which sees whole files.
//! - [`HeaderTrailerRule::RecordMarker`]: first character '0' (header) or '9'
//!   (trailer). Used by the document extractor, which sees single lines.

use super::field_parsers::{Field, extract_field, line_length, parse_amount_units, parse_due_date};
use crate::app::models::{DecodedRecord, InvalidReason, LineStatus, SettlementType};
use crate::constants::{
    MIN_DATA_RECORD_LENGTH, MIN_DOCUMENT_ID_LENGTH, MIN_SETTLEMENT_RECORD_LENGTH, record_markers,
    settlement_flags,
};

/// How header and trailer records are recognised
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderTrailerRule {
    /// By position within a file of `line_count` lines
    Positional { index: usize, line_count: usize },
    /// By the record type marker in the first character
    RecordMarker,
}

impl HeaderTrailerRule {
    /// Check whether the rule marks this line as header or trailer
    pub fn is_header_or_trailer(&self, line: &str) -> bool {
        match *self {
            HeaderTrailerRule::Positional { index, line_count } => {
                index == 0 || index + 1 == line_count
            }
            HeaderTrailerRule::RecordMarker => matches!(
                line.chars().next(),
                Some(record_markers::HEADER) | Some(record_markers::TRAILER)
            ),
        }
    }
}

/// Validate a line as a data record
///
/// Checks, in order: minimum length, header/trailer exclusion, document id
/// (present, at least 3 characters, not all zeros), amount (digits only and
/// greater than zero) and due date (six digits, day 1-31, month 1-12).
pub fn validate_record(line: &str, rule: HeaderTrailerRule) -> LineStatus {
    match check_record(line, rule) {
        Ok(()) => LineStatus::Valid,
        Err(reason) => LineStatus::Invalid(reason),
    }
}

fn check_record(line: &str, rule: HeaderTrailerRule) -> Result<(), InvalidReason> {
    if line_length(line) < MIN_DATA_RECORD_LENGTH {
        return Err(InvalidReason::TooShort);
    }
    if rule.is_header_or_trailer(line) {
        return Err(InvalidReason::HeaderOrTrailer);
    }

    let document_id = extract_field(line, Field::DocumentId).unwrap_or_default();
    if document_id.is_empty() {
        return Err(InvalidReason::MissingDocumentId);
    }
    if document_id.chars().count() < MIN_DOCUMENT_ID_LENGTH || document_id.chars().all(|c| c == '0')
    {
        return Err(InvalidReason::InvalidDocumentId);
    }

    let amount = extract_field(line, Field::Amount)
        .and_then(parse_amount_units)
        .ok_or(InvalidReason::InvalidAmount)?;
    if amount == 0 {
        return Err(InvalidReason::InvalidAmount);
    }

    let due_date = extract_field(line, Field::DueDate)
        .and_then(parse_due_date)
        .ok_or(InvalidReason::InvalidDueDate)?;
    if !due_date.is_in_range() {
        return Err(InvalidReason::InvalidDueDate);
    }

    Ok(())
}

/// Settlement type from the flag at position 319
pub fn classify_settlement(line: &str) -> SettlementType {
    if line_length(line) < MIN_SETTLEMENT_RECORD_LENGTH {
        return SettlementType::Unknown;
    }
    match extract_field(line, Field::SettlementFlag).and_then(|flag| flag.chars().next()) {
        Some(settlement_flags::ADVANCE) => SettlementType::Advance,
        Some(settlement_flags::NORMAL) => SettlementType::Normal,
        _ => SettlementType::Unknown,
    }
}

/// Build the full decoded view of a line
///
/// The operation code is `None` only when the line ends before it; a blank
/// code is `Some("")` and is subject to the allowlist like any other.
pub fn decode_record(line: &str, rule: HeaderTrailerRule) -> DecodedRecord {
    DecodedRecord {
        operation_code: extract_field(line, Field::OperationCode).map(str::to_string),
        settlement_type: classify_settlement(line),
        status: validate_record(line, rule),
        document_id: extract_field(line, Field::DocumentId).map(str::to_string),
        amount_raw: extract_field(line, Field::Amount).map(str::to_string),
        due_date_raw: extract_field(line, Field::DueDate).map(str::to_string),
    }
}
