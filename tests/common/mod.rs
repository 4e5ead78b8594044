//! Shared fixtures for integration tests
//!
//! Builds CNAB400 return files line by line so each test controls exactly
//! which fields sit at which offsets.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

pub const RECORD_LENGTH: usize = 400;

fn place(chars: &mut [char], start: usize, value: &str) {
    for (offset, c) in value.chars().enumerate() {
        chars[start + offset] = c;
    }
}

/// Header with the bank code at [76,79) and the bank name right after it
pub fn header(bank_code: &str, bank_name: &str) -> String {
    let mut chars = vec![' '; RECORD_LENGTH];
    place(&mut chars, 0, "02RETORNO01COBRANCA");
    place(&mut chars, 76, bank_code);
    place(&mut chars, 79, bank_name);
    chars.into_iter().collect()
}

pub fn bradesco_header() -> String {
    header("237", "BRADESCO")
}

pub fn bb_header() -> String {
    header("001", "BANCO DO BRASIL")
}

pub fn unknown_header() -> String {
    header("341", "ITAU")
}

pub fn trailer() -> String {
    let mut chars = vec![' '; RECORD_LENGTH];
    place(&mut chars, 0, "9201");
    chars.into_iter().collect()
}

/// Data record with the fields the pipeline reads
///
/// `amount` is zero padded to 16 digits; `flag` is the settlement flag
/// at offset 318 ('1' advance, '2' normal).
pub fn data_line(operation: &str, due_date: &str, document: &str, amount: &str, flag: &str) -> String {
    let mut chars = vec![' '; RECORD_LENGTH];
    chars[0] = '1';
    place(&mut chars, 108, operation);
    place(&mut chars, 110, due_date);
    place(&mut chars, 116, document);
    place(&mut chars, 251, &format!("{:0>16}", amount));
    place(&mut chars, 318, flag);
    chars.into_iter().collect()
}

/// The reference file: a normal "01" record and an advance "99" record
pub fn scenario_lines(header_line: String) -> Vec<String> {
    vec![
        header_line,
        data_line("01", "150625", "DOC0001", "10000", "2"),
        data_line("99", "200740", "DOC0002", "25000", "1"),
        trailer(),
    ]
}

/// Write lines joined by `ending`, with a final terminator
pub fn write_file(dir: &Path, name: &str, lines: &[String], ending: &str) -> PathBuf {
    let path = dir.join(name);
    let mut text = lines.join(ending);
    text.push_str(ending);
    fs::write(&path, text).expect("write fixture");
    path
}

/// Read an output file back as lines
pub fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .expect("read output")
        .lines()
        .map(str::to_string)
        .collect()
}

/// Names of the files in a directory, sorted
pub fn dir_listing(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .expect("read dir")
        .map(|entry| entry.expect("dir entry").file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
