//! Tests for encoding fallback and line handling

use crate::Error;
use crate::app::services::cnab_parser::{LineEnding, TextEncoding, decode_file};

const DEFAULT_CANDIDATES: [TextEncoding; 2] = [TextEncoding::Utf8, TextEncoding::Latin1];

#[test]
fn test_utf8_decoded_first() {
    let file = decode_file("HEADER\nSÃO PAULO\nTRAILER\n".as_bytes(), &DEFAULT_CANDIDATES, "a")
        .unwrap();

    assert_eq!(file.encoding, TextEncoding::Utf8);
    assert_eq!(file.lines, vec!["HEADER", "SÃO PAULO", "TRAILER"]);
    assert_eq!(file.line_ending, LineEnding::Lf);
    assert!(file.trailing_newline);
}

#[test]
fn test_latin1_fallback() {
    // 0xC3 0x20 is invalid UTF-8; in Latin-1 it is "Ã "
    let bytes = b"HEADER\r\nS\xC3 O\r\nTRAILER";
    let file = decode_file(bytes, &DEFAULT_CANDIDATES, "b").unwrap();

    assert_eq!(file.encoding, TextEncoding::Latin1);
    assert_eq!(file.lines[1], "SÃ O");
    assert_eq!(file.line_ending, LineEnding::CrLf);
    assert!(!file.trailing_newline);
}

#[test]
fn test_decode_failure_when_no_candidate_fits() {
    let result = decode_file(b"\xFF\xFE\xFD", &[TextEncoding::Utf8], "bad.RET");
    match result {
        Err(Error::Decode { file, .. }) => assert_eq!(file, "bad.RET"),
        other => panic!("expected decode error, got {:?}", other),
    }
}

#[test]
fn test_utf8_bom_stripped_and_written_back() {
    let bytes = b"\xEF\xBB\xBFHEADER\nDATA\nTRAILER\n";
    let file = decode_file(bytes, &DEFAULT_CANDIDATES, "c").unwrap();
    assert_eq!(file.lines[0], "HEADER");
    assert!(file.byte_order_mark);

    assert_eq!(file.render(&file.lines).unwrap(), bytes.to_vec());
    let subset = vec![file.lines[0].clone(), file.lines[2].clone()];
    assert_eq!(
        file.render(&subset).unwrap(),
        b"\xEF\xBB\xBFHEADER\nTRAILER\n".to_vec()
    );
}

#[test]
fn test_no_bom_for_plain_input() {
    let file = decode_file(b"HEADER\nTRAILER\n", &DEFAULT_CANDIDATES, "c").unwrap();
    assert!(!file.byte_order_mark);
    assert_eq!(file.render(&file.lines).unwrap(), b"HEADER\nTRAILER\n".to_vec());
}

#[test]
fn test_mixed_endings_follow_first_line() {
    let file = decode_file(b"HEADER\nDATA\r\nTRAILER\n", &DEFAULT_CANDIDATES, "f").unwrap();
    assert_eq!(file.line_ending, LineEnding::Lf);
    assert_eq!(file.lines, vec!["HEADER", "DATA", "TRAILER"]);
    assert_eq!(
        file.render(&file.lines).unwrap(),
        b"HEADER\nDATA\nTRAILER\n".to_vec()
    );

    let file = decode_file(b"HEADER\r\nDATA\nTRAILER\r\n", &DEFAULT_CANDIDATES, "g").unwrap();
    assert_eq!(file.line_ending, LineEnding::CrLf);
}

#[test]
fn test_render_preserves_encoding_and_endings() {
    let bytes = b"H\xC9ADER\r\nDATA\r\nTRAILER\r\n";
    let file = decode_file(bytes, &DEFAULT_CANDIDATES, "d").unwrap();
    assert_eq!(file.encoding, TextEncoding::Latin1);

    let rendered = file.render(&file.lines).unwrap();
    assert_eq!(rendered, bytes.to_vec());

    let subset = vec![file.lines[0].clone(), file.lines[2].clone()];
    assert_eq!(
        file.render(&subset).unwrap(),
        b"H\xC9ADER\r\nTRAILER\r\n".to_vec()
    );
}

#[test]
fn test_latin1_encode_rejects_wide_characters() {
    assert!(TextEncoding::Latin1.encode("Ação").is_ok());
    assert!(TextEncoding::Latin1.encode("€").is_err());
}

#[test]
fn test_encoding_names() {
    assert_eq!("UTF8".parse::<TextEncoding>().unwrap(), TextEncoding::Utf8);
    assert_eq!(
        "iso-8859-1".parse::<TextEncoding>().unwrap(),
        TextEncoding::Latin1
    );
    assert!("cp437".parse::<TextEncoding>().is_err());
    assert_eq!(TextEncoding::Latin1.to_string(), "latin-1");
}

#[test]
fn test_empty_input_has_no_lines() {
    let file = decode_file(b"", &DEFAULT_CANDIDATES, "e").unwrap();
    assert!(file.lines.is_empty());
}
