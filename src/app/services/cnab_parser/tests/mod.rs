//! Test utilities for CNAB400 parser testing
//!
//! This module provides builders for fixed-width header, data and trailer
//! records used across the parser and record processor tests.

use crate::constants::fields;

mod classifier_tests;
mod decoding_tests;

/// Standard CNAB400 record length
pub const RECORD_LENGTH: usize = 400;

/// Builder for a fixed-width data record
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    marker: char,
    operation_code: String,
    due_date: String,
    document_id: String,
    amount: String,
    settlement_flag: String,
    length: usize,
}

impl Default for RecordBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordBuilder {
    /// Valid normal-settlement record with operation 06
    pub fn new() -> Self {
        Self {
            marker: '1',
            operation_code: "06".to_string(),
            due_date: "150625".to_string(),
            document_id: "DOC0000001".to_string(),
            amount: "10000".to_string(),
            settlement_flag: "2".to_string(),
            length: RECORD_LENGTH,
        }
    }

    pub fn marker(mut self, marker: char) -> Self {
        self.marker = marker;
        self
    }

    pub fn operation(mut self, code: &str) -> Self {
        self.operation_code = code.to_string();
        self
    }

    pub fn due_date(mut self, date: &str) -> Self {
        self.due_date = date.to_string();
        self
    }

    pub fn document(mut self, document_id: &str) -> Self {
        self.document_id = document_id.to_string();
        self
    }

    /// Digits are right-aligned and zero padded to 16 characters
    pub fn amount(mut self, amount: &str) -> Self {
        self.amount = amount.to_string();
        self
    }

    pub fn flag(mut self, flag: &str) -> Self {
        self.settlement_flag = flag.to_string();
        self
    }

    pub fn advance(self) -> Self {
        self.flag("1")
    }

    pub fn normal(self) -> Self {
        self.flag("2")
    }

    pub fn length(mut self, length: usize) -> Self {
        self.length = length;
        self
    }

    pub fn build(&self) -> String {
        let mut chars = vec![' '; RECORD_LENGTH.max(self.length)];
        chars[0] = self.marker;
        place(&mut chars, fields::OPERATION_CODE, &self.operation_code);
        place(&mut chars, fields::DUE_DATE, &self.due_date);
        place(&mut chars, fields::DOCUMENT_ID, &self.document_id);

        let width = fields::AMOUNT.1 - fields::AMOUNT.0;
        let amount = if self.amount.chars().all(|c| c.is_ascii_digit()) {
            format!("{:0>width$}", self.amount, width = width)
        } else {
            self.amount.clone()
        };
        place(&mut chars, fields::AMOUNT, &amount);
        place(&mut chars, fields::SETTLEMENT_FLAG, &self.settlement_flag);

        chars.truncate(self.length);
        chars.into_iter().collect()
    }
}

/// Header record with a bank code at [76,79) and a bank name after it
pub fn header_line(bank_code: &str, bank_name: &str) -> String {
    let mut chars = vec![' '; RECORD_LENGTH];
    place(&mut chars, (0, 19), "02RETORNO01COBRANCA");
    place(&mut chars, fields::BANK_CODE, bank_code);
    place(&mut chars, (79, 94), bank_name);
    chars.into_iter().collect()
}

pub fn bradesco_header() -> String {
    header_line("237", "BRADESCO")
}

pub fn bb_header() -> String {
    header_line("001", "BANCO DO BRASIL")
}

pub fn trailer_line() -> String {
    let mut chars = vec![' '; RECORD_LENGTH];
    place(&mut chars, (0, 4), "9201");
    chars.into_iter().collect()
}

fn place(chars: &mut [char], span: (usize, usize), value: &str) {
    let (start, end) = span;
    for (offset, c) in value.chars().take(end - start).enumerate() {
        chars[start + offset] = c;
    }
}
