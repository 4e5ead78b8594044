//! Tests for record validation and settlement classification

use super::*;
use crate::app::models::{InvalidReason, LineStatus, SettlementType};
use crate::app::services::cnab_parser::{
    HeaderTrailerRule, classify_settlement, decode_record, validate_record,
};

const DATA_POSITION: HeaderTrailerRule = HeaderTrailerRule::Positional {
    index: 1,
    line_count: 3,
};

fn invalid(reason: InvalidReason) -> LineStatus {
    LineStatus::Invalid(reason)
}

#[test]
fn test_valid_record() {
    let line = RecordBuilder::new().build();
    assert_eq!(validate_record(&line, DATA_POSITION), LineStatus::Valid);
    assert_eq!(
        validate_record(&line, HeaderTrailerRule::RecordMarker),
        LineStatus::Valid
    );
}

#[test]
fn test_short_lines_always_invalid() {
    for length in [0, 1, 100, 250, 266] {
        let line = RecordBuilder::new().length(length).build();
        assert_eq!(
            validate_record(&line, DATA_POSITION),
            invalid(InvalidReason::TooShort),
            "length {}",
            length
        );
    }
}

#[test]
fn test_length_boundary_is_inclusive() {
    let line = RecordBuilder::new().length(267).build();
    assert_eq!(validate_record(&line, DATA_POSITION), LineStatus::Valid);
}

#[test]
fn test_positional_header_trailer_rule() {
    let line = RecordBuilder::new().build();
    let first = HeaderTrailerRule::Positional {
        index: 0,
        line_count: 3,
    };
    let last = HeaderTrailerRule::Positional {
        index: 2,
        line_count: 3,
    };

    assert_eq!(
        validate_record(&line, first),
        invalid(InvalidReason::HeaderOrTrailer)
    );
    assert_eq!(
        validate_record(&line, last),
        invalid(InvalidReason::HeaderOrTrailer)
    );
}

#[test]
fn test_marker_header_trailer_rule() {
    let header_like = RecordBuilder::new().marker('0').build();
    let trailer_like = RecordBuilder::new().marker('9').build();

    assert_eq!(
        validate_record(&header_like, HeaderTrailerRule::RecordMarker),
        invalid(InvalidReason::HeaderOrTrailer)
    );
    assert_eq!(
        validate_record(&trailer_like, HeaderTrailerRule::RecordMarker),
        invalid(InvalidReason::HeaderOrTrailer)
    );
    // The positional rule ignores the marker
    assert_eq!(
        validate_record(&header_like, DATA_POSITION),
        LineStatus::Valid
    );
}

#[test]
fn test_document_id_rules() {
    let blank = RecordBuilder::new().document("").build();
    let zeros = RecordBuilder::new().document("000000").build();
    let too_short = RecordBuilder::new().document("AB").build();
    let minimal = RecordBuilder::new().document("ABC").build();

    assert_eq!(
        validate_record(&blank, DATA_POSITION),
        invalid(InvalidReason::MissingDocumentId)
    );
    assert_eq!(
        validate_record(&zeros, DATA_POSITION),
        invalid(InvalidReason::InvalidDocumentId)
    );
    assert_eq!(
        validate_record(&too_short, DATA_POSITION),
        invalid(InvalidReason::InvalidDocumentId)
    );
    assert_eq!(validate_record(&minimal, DATA_POSITION), LineStatus::Valid);
}

#[test]
fn test_amount_rules() {
    let zero = RecordBuilder::new().amount("0").build();
    let letters = RecordBuilder::new().amount("00000000000012AB").build();
    let blank = RecordBuilder::new().amount("                ").build();

    for line in [zero, letters, blank] {
        assert_eq!(
            validate_record(&line, DATA_POSITION),
            invalid(InvalidReason::InvalidAmount)
        );
    }
}

#[test]
fn test_due_date_rules() {
    for date in ["000125", "320125", "150025", "151325", "15062", "AB0625"] {
        let line = RecordBuilder::new().due_date(date).build();
        assert_eq!(
            validate_record(&line, DATA_POSITION),
            invalid(InvalidReason::InvalidDueDate),
            "date {}",
            date
        );
    }

    for date in ["010100", "311299", "310225"] {
        let line = RecordBuilder::new().due_date(date).build();
        assert_eq!(
            validate_record(&line, DATA_POSITION),
            LineStatus::Valid,
            "date {}",
            date
        );
    }
}

#[test]
fn test_settlement_classification() {
    assert_eq!(
        classify_settlement(&RecordBuilder::new().advance().build()),
        SettlementType::Advance
    );
    assert_eq!(
        classify_settlement(&RecordBuilder::new().normal().build()),
        SettlementType::Normal
    );
    assert_eq!(
        classify_settlement(&RecordBuilder::new().flag("3").build()),
        SettlementType::Unknown
    );
    assert_eq!(
        classify_settlement(&RecordBuilder::new().flag(" ").build()),
        SettlementType::Unknown
    );
}

#[test]
fn test_settlement_needs_319_characters() {
    let at_boundary = RecordBuilder::new().advance().length(319).build();
    let one_short = RecordBuilder::new().advance().length(318).build();

    assert_eq!(classify_settlement(&at_boundary), SettlementType::Advance);
    assert_eq!(classify_settlement(&one_short), SettlementType::Unknown);
}

#[test]
fn test_decode_record() {
    let line = RecordBuilder::new()
        .operation("02")
        .document("DOC-77")
        .amount("123456")
        .due_date("010130")
        .advance()
        .build();

    let record = decode_record(&line, DATA_POSITION);
    assert_eq!(record.operation_code.as_deref(), Some("02"));
    assert_eq!(record.settlement_type, SettlementType::Advance);
    assert!(record.is_structurally_valid());
    assert_eq!(record.document_id.as_deref(), Some("DOC-77"));
    assert_eq!(record.amount_raw.as_deref(), Some("0000000000123456"));
    assert_eq!(record.due_date_raw.as_deref(), Some("010130"));
}

#[test]
fn test_decode_record_blank_and_short() {
    let blank_code = RecordBuilder::new().operation("  ").build();
    assert_eq!(
        decode_record(&blank_code, DATA_POSITION).operation_code.as_deref(),
        Some("")
    );

    let short = "1".repeat(100);
    let record = decode_record(&short, DATA_POSITION);
    assert_eq!(record.operation_code, None);
    assert_eq!(record.document_id, None);
    assert_eq!(record.amount_raw, None);
    assert_eq!(record.settlement_type, SettlementType::Unknown);
    assert_eq!(record.status, invalid(InvalidReason::TooShort));
}
