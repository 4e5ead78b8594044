//! Run statistics and result structures for the filter and split pipeline
//!
//! This module provides the per-file counters accumulated while records are
//! classified, and the outcome handed to the output writers.

use crate::app::models::{BankTag, DecodedRecord, InvalidReason, SettlementType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Counters for one file run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStatistics {
    /// Number of data lines examined (header and trailer excluded)
    pub total_lines: usize,
    /// Data lines that passed structural validation
    pub valid_data_lines: usize,
    /// Data lines that failed structural validation
    pub invalid_lines: usize,
    /// Data lines kept in the filtered file
    pub retained_lines: usize,
    /// Valid data lines per operation code
    pub operation_counts: BTreeMap<String, usize>,
    /// Valid data lines with settlement flag '2'
    pub normal_count: usize,
    /// Valid data lines with settlement flag '1'
    pub advance_count: usize,
    /// Valid data lines with any other settlement flag
    pub unknown_type_count: usize,
    /// Invalid data lines per failure reason
    pub invalid_reasons: BTreeMap<InvalidReason, usize>,
}

impl RunStatistics {
    /// Create new empty statistics
    pub fn new() -> Self {
        Self {
            total_lines: 0,
            valid_data_lines: 0,
            invalid_lines: 0,
            retained_lines: 0,
            operation_counts: BTreeMap::new(),
            normal_count: 0,
            advance_count: 0,
            unknown_type_count: 0,
            invalid_reasons: BTreeMap::new(),
        }
    }

    /// Tally a line that failed validation
    pub fn record_invalid(&mut self, reason: InvalidReason) {
        self.total_lines += 1;
        self.invalid_lines += 1;
        *self.invalid_reasons.entry(reason).or_insert(0) += 1;
    }

    /// Tally a valid line's operation code and settlement type
    pub fn record_valid(&mut self, record: &DecodedRecord) {
        self.total_lines += 1;
        self.valid_data_lines += 1;

        if let Some(code) = &record.operation_code {
            *self.operation_counts.entry(code.clone()).or_insert(0) += 1;
        }

        match record.settlement_type {
            SettlementType::Normal => self.normal_count += 1,
            SettlementType::Advance => self.advance_count += 1,
            SettlementType::Unknown => self.unknown_type_count += 1,
        }
    }

    pub fn record_retained(&mut self) {
        self.retained_lines += 1;
    }

    /// Percentage of examined data lines that were retained
    pub fn retention_rate(&self) -> f64 {
        if self.total_lines == 0 {
            0.0
        } else {
            (self.retained_lines as f64 / self.total_lines as f64) * 100.0
        }
    }

    /// Get summary string for logging
    pub fn summary(&self) -> String {
        format!(
            "{} data lines: {} valid, {} invalid, {} retained ({:.2}%) | \
             normal: {} advance: {} unknown: {}",
            self.total_lines,
            self.valid_data_lines,
            self.invalid_lines,
            self.retained_lines,
            self.retention_rate(),
            self.normal_count,
            self.advance_count,
            self.unknown_type_count
        )
    }
}

impl Default for RunStatistics {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of filtering and splitting one file
///
/// Every line sequence is framed by the input's header and trailer and keeps
/// the input's relative order. With splitting disabled, `normal_lines` and
/// `advance_lines` both equal `retained_lines`.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessingOutcome {
    pub bank: BankTag,
    pub retained_lines: Vec<String>,
    pub normal_lines: Vec<String>,
    pub advance_lines: Vec<String>,
    pub split_enabled: bool,
    pub statistics: RunStatistics,
}

impl ProcessingOutcome {
    pub fn summary(&self) -> String {
        self.statistics.summary()
    }
}
