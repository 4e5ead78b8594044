//! Positional field extraction for CNAB400 records
//!
//! Offsets are counted in characters of the decoded line, so a Latin-1 file and
//! its UTF-8 transcoding yield the same fields. Extraction never fails: a line
//! too short for a field yields `None` and the caller decides what that means.

use crate::constants::{DUE_DATE_LENGTH, fields};

/// Named fields of the CNAB400 layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    BankCode,
    OperationCode,
    DueDate,
    DocumentId,
    Amount,
    SettlementFlag,
}

impl Field {
    /// Half-open character span of the field
    pub fn span(&self) -> (usize, usize) {
        match self {
            Field::BankCode => fields::BANK_CODE,
            Field::OperationCode => fields::OPERATION_CODE,
            Field::DueDate => fields::DUE_DATE,
            Field::DocumentId => fields::DOCUMENT_ID,
            Field::Amount => fields::AMOUNT,
            Field::SettlementFlag => fields::SETTLEMENT_FLAG,
        }
    }
}

/// Length of a line in characters
pub fn line_length(line: &str) -> usize {
    if line.is_ascii() {
        line.len()
    } else {
        line.chars().count()
    }
}

/// Slice `[start, end)` by character position, or `None` if the line is shorter than `end`
pub fn char_slice(line: &str, start: usize, end: usize) -> Option<&str> {
    if end < start {
        return None;
    }
    if line.is_ascii() {
        return line.get(start..end);
    }

    let mut boundaries = line
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(line.len()));
    let byte_start = boundaries.nth(start)?;
    let byte_end = if end == start {
        byte_start
    } else {
        boundaries.nth(end - start - 1)?
    };
    Some(&line[byte_start..byte_end])
}

/// Raw (untrimmed) field content
pub fn extract_raw(line: &str, field: Field) -> Option<&str> {
    let (start, end) = field.span();
    char_slice(line, start, end)
}

/// Trimmed field content, `None` when the line is shorter than the field's end offset
pub fn extract_field(line: &str, field: Field) -> Option<&str> {
    extract_raw(line, field).map(str::trim)
}

/// Non-empty and ASCII digits only
pub fn is_all_digits(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

/// Parse an all-digit amount field into its raw integer value (scaled by 1000)
pub fn parse_amount_units(raw: &str) -> Option<u64> {
    if !is_all_digits(raw) {
        return None;
    }
    raw.parse::<u64>().ok()
}

/// Components of a DDMMYY date field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DueDateParts {
    pub day: u32,
    pub month: u32,
    pub year_two_digits: u32,
}

impl DueDateParts {
    /// Day and month fall in the ranges a CNAB date may carry
    ///
    /// Calendar validity (e.g. 31/02) is not checked.
    pub fn is_in_range(&self) -> bool {
        (1..=31).contains(&self.day) && (1..=12).contains(&self.month)
    }
}

/// Split an exactly-six-digit DDMMYY field
pub fn parse_due_date(raw: &str) -> Option<DueDateParts> {
    if raw.len() != DUE_DATE_LENGTH || !is_all_digits(raw) {
        return None;
    }
    let day = raw[0..2].parse().ok()?;
    let month = raw[2..4].parse().ok()?;
    let year_two_digits = raw[4..6].parse().ok()?;
    Some(DueDateParts {
        day,
        month,
        year_two_digits,
    })
}
