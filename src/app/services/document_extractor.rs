//! Export record extraction for advance settlements
//!
//! Turns advance data lines into rows for the tabular export. Lines are
//! re-validated with the record-marker rule since this step sees single lines
//! without their file position; lines that fail are skipped silently.

use crate::app::models::{ExportRecord, SettlementType};
use crate::app::services::cnab_parser::field_parsers::{
    Field, extract_field, parse_amount_units, parse_due_date,
};
use crate::app::services::cnab_parser::{HeaderTrailerRule, classify_settlement, validate_record};
use crate::constants::{AMOUNT_RAW_SCALE, DEFAULT_EXPORT_AMOUNT, EXPORT_AMOUNT_DECIMALS, YEAR_PIVOT};
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::debug;

/// Extract the export row of a single data line
///
/// Returns `None` when the line fails validation or its document id is blank.
pub fn extract_document(line: &str) -> Option<ExportRecord> {
    if !validate_record(line, HeaderTrailerRule::RecordMarker).is_valid() {
        return None;
    }

    let document_id = extract_field(line, Field::DocumentId)?.to_string();
    if document_id.is_empty() {
        return None;
    }

    Some(ExportRecord {
        document_id,
        amount: extract_field(line, Field::Amount)
            .map(format_amount)
            .unwrap_or_else(|| DEFAULT_EXPORT_AMOUNT.to_string()),
        due_date: extract_field(line, Field::DueDate)
            .map(format_due_date)
            .unwrap_or_default(),
    })
}

/// Export rows for the advance lines of a framed sequence
///
/// The first and last lines are treated as header and trailer and skipped,
/// as are lines whose settlement flag is not advance.
pub fn extract_export_records(framed_lines: &[String]) -> Vec<ExportRecord> {
    let last = framed_lines.len().saturating_sub(1);

    let records: Vec<ExportRecord> = framed_lines
        .iter()
        .enumerate()
        .filter(|(index, _)| *index != 0 && *index != last)
        .filter(|(_, line)| classify_settlement(line) == SettlementType::Advance)
        .filter_map(|(_, line)| extract_document(line))
        .collect();

    debug!(
        "Extracted {} export records from {} lines",
        records.len(),
        framed_lines.len()
    );
    records
}

/// Render a raw amount field (value × 1000) as "N,NN"
///
/// Non-numeric fields render as "0,00". Halves round away from zero.
pub fn format_amount(raw: &str) -> String {
    match parse_amount_units(raw) {
        Some(units) => {
            let value = Decimal::from_i128_with_scale(i128::from(units), AMOUNT_RAW_SCALE)
                .round_dp_with_strategy(EXPORT_AMOUNT_DECIMALS, RoundingStrategy::MidpointAwayFromZero);
            format!("{:.2}", value).replace('.', ",")
        }
        None => DEFAULT_EXPORT_AMOUNT.to_string(),
    }
}

/// Render a DDMMYY field as "DD/MM/YYYY", or an empty string if malformed
pub fn format_due_date(raw: &str) -> String {
    match parse_due_date(raw) {
        Some(parts) => format!(
            "{}/{}/{}",
            &raw[0..2],
            &raw[2..4],
            expand_two_digit_year(parts.year_two_digits)
        ),
        None => String::new(),
    }
}

/// Map a two-digit year with a fixed pivot: 00-30 → 2000s, 31-99 → 1900s
pub fn expand_two_digit_year(year: u32) -> u32 {
    if year <= YEAR_PIVOT {
        2000 + year
    } else {
        1900 + year
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::services::cnab_parser::tests::{RecordBuilder, bb_header, trailer_line};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_year_pivot() {
        assert_eq!(expand_two_digit_year(0), 2000);
        assert_eq!(expand_two_digit_year(30), 2030);
        assert_eq!(expand_two_digit_year(31), 1931);
        assert_eq!(expand_two_digit_year(99), 1999);
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount("0000000000012345"), "12,35");
        assert_eq!(format_amount("0000000000025000"), "25,00");
        assert_eq!(format_amount("0000000000010000"), "10,00");
        assert_eq!(format_amount("1234567"), "1234,57");
        assert_eq!(format_amount("0"), "0,00");
        assert_eq!(format_amount("12A4"), "0,00");
        assert_eq!(format_amount(""), "0,00");
    }

    #[test]
    fn test_format_amount_rounds_half_away_from_zero() {
        assert_eq!(format_amount("1005"), "1,01");
        assert_eq!(format_amount("2675"), "2,68");
        assert_eq!(format_amount("0000000000000005"), "0,01");
        assert_eq!(format_amount("1004"), "1,00");
        assert_eq!(format_amount("9999999999999995"), "10000000000000,00");
    }

    #[test]
    fn test_format_due_date() {
        assert_eq!(format_due_date("200740"), "20/07/1940");
        assert_eq!(format_due_date("150625"), "15/06/2025");
        assert_eq!(format_due_date("010100"), "01/01/2000");
        assert_eq!(format_due_date("31129"), "");
        assert_eq!(format_due_date("AB1299"), "");
    }

    #[test]
    fn test_extract_document() {
        let line = RecordBuilder::new()
            .document(" NF-0042 ")
            .amount("0000000025000")
            .due_date("200740")
            .advance()
            .build();

        let record = extract_document(&line).unwrap();
        assert_eq!(
            record,
            ExportRecord {
                document_id: "NF-0042".to_string(),
                amount: "25,00".to_string(),
                due_date: "20/07/1940".to_string(),
            }
        );
    }

    #[test]
    fn test_extract_document_rejects_marker_lines() {
        let header_like = RecordBuilder::new().marker('0').advance().build();
        let trailer_like = RecordBuilder::new().marker('9').advance().build();
        assert!(extract_document(&header_like).is_none());
        assert!(extract_document(&trailer_like).is_none());
    }

    #[test]
    fn test_extract_document_rejects_invalid_lines() {
        assert!(extract_document("short").is_none());
        assert!(extract_document(&RecordBuilder::new().amount("0").build()).is_none());
        assert!(extract_document(&RecordBuilder::new().document("").build()).is_none());
    }

    #[test]
    fn test_extract_export_records_skips_frame_and_normal() {
        let advance = RecordBuilder::new().document("ADV-1").advance().build();
        let normal = RecordBuilder::new().document("NOR-1").normal().build();
        let short_advance = RecordBuilder::new()
            .document("ADV-2")
            .advance()
            .length(318)
            .build();

        let lines = vec![
            bb_header(),
            advance,
            normal,
            short_advance,
            trailer_line(),
        ];
        let records = extract_export_records(&lines);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].document_id, "ADV-1");
        assert_eq!(records[0].amount, "10,00");
        assert_eq!(records[0].due_date, "15/06/2025");
    }

    #[test]
    fn test_extract_export_records_empty_frame() {
        assert!(extract_export_records(&[]).is_empty());
        assert!(extract_export_records(&[bb_header(), trailer_line()]).is_empty());
    }
}
