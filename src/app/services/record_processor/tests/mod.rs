//! Test utilities for record processor testing
//!
//! This module provides file fixtures built from the parser's record builders
//! and the bank configurations used across the processor tests.

pub use crate::app::services::cnab_parser::tests::{
    RecordBuilder, bb_header, bradesco_header, trailer_line,
};
use crate::config::BankConfig;


/// Enabled config with the given allowlist and split flag
pub fn bank_config(operations: &str, split: bool) -> BankConfig {
    BankConfig::new(operations, true, split)
}

/// Frame data lines with a Bradesco header and a trailer
pub fn framed(data: &[String]) -> Vec<String> {
    let mut lines = vec![bradesco_header()];
    lines.extend(data.iter().cloned());
    lines.push(trailer_line());
    lines
}

/// Normal settlement, operation "01", amount 10.000, due 15/06/25
pub fn scenario_normal_line() -> String {
    RecordBuilder::new()
        .operation("01")
        .document("DOC0001")
        .amount("0000000010000")
        .due_date("150625")
        .normal()
        .build()
}

/// Advance settlement, operation "99", amount 25.000, due 20/07/40
pub fn scenario_advance_line() -> String {
    RecordBuilder::new()
        .operation("99")
        .document("DOC0002")
        .amount("0000000025000")
        .due_date("200740")
        .advance()
        .build()
}

/// The four-line file: header, normal "01" line, advance "99" line, trailer
pub fn scenario_file() -> Vec<String> {
    framed(&[scenario_normal_line(), scenario_advance_line()])
}
