//! Filter and split pipeline for one return file
//!
//! This module contains the RecordProcessor, which walks a file's lines once,
//! validates and classifies every data record, applies the bank's operation
//! allowlist and routes retained records into the normal and advance subsets.

use crate::app::models::{BankTag, DecodedRecord, LineStatus, SettlementType};
use crate::app::services::cnab_parser::{HeaderTrailerRule, decode_record};
use crate::config::BankConfig;
use crate::constants::TRACE_FIRST_LINES;
use crate::{Error, Result};
use tracing::{debug, info};

use super::stats::{ProcessingOutcome, RunStatistics};

/// Record processor for a single bank's return file
///
/// # Example
///
/// ```rust
/// use cnab_processor::app::models::BankTag;
/// use cnab_processor::app::services::record_processor::RecordProcessor;
/// use cnab_processor::config::BankConfig;
///
/// let lines = vec!["HEADER".to_string(), "TRAILER".to_string()];
/// let processor = RecordProcessor::new(BankTag::Bb, BankConfig::new("06", true, true));
/// let outcome = processor.process(&lines).unwrap();
/// assert_eq!(outcome.retained_lines, lines);
/// ```
#[derive(Debug, Clone)]
pub struct RecordProcessor {
    bank: BankTag,
    bank_config: BankConfig,
    source_name: String,
}

impl RecordProcessor {
    pub fn new(bank: BankTag, bank_config: BankConfig) -> Self {
        Self {
            bank,
            bank_config,
            source_name: "input".to_string(),
        }
    }

    /// Name used in errors and log lines
    pub fn with_source_name(mut self, name: impl Into<String>) -> Self {
        self.source_name = name.into();
        self
    }

    pub fn bank_config(&self) -> &BankConfig {
        &self.bank_config
    }

    /// Filter and split the ordered lines of one file
    ///
    /// Fails with `EmptyFile` when there are no lines and with `BankDisabled`
    /// when the bank is not enabled; nothing is produced in either case.
    /// Per-line problems never fail the run.
    pub fn process(&self, lines: &[String]) -> Result<ProcessingOutcome> {
        if lines.is_empty() {
            return Err(Error::empty_file(&self.source_name));
        }
        if !self.bank_config.enabled {
            return Err(Error::bank_disabled(self.bank.as_str()));
        }

        let split = self.bank_config.split_advance;
        let line_count = lines.len();
        let mut stats = RunStatistics::new();

        info!(
            "Processing {} as {} ({} lines, allowed operations: {:?}, split: {})",
            self.source_name, self.bank, line_count, self.bank_config.allowed_operations, split
        );

        let header = &lines[0];
        let mut retained = vec![header.clone()];
        let mut normal = vec![header.clone()];
        let mut advance = vec![header.clone()];

        let data_end = line_count.saturating_sub(1).max(1);
        for (index, line) in lines.iter().enumerate().take(data_end).skip(1) {
            let rule = HeaderTrailerRule::Positional { index, line_count };
            let record = decode_record(line, rule);

            if index <= TRACE_FIRST_LINES {
                trace_line(index, line, &record, &self.bank_config);
            }

            if let LineStatus::Invalid(reason) = record.status {
                debug!("Line {} skipped: {}", index + 1, reason);
                stats.record_invalid(reason);
                continue;
            }

            stats.record_valid(&record);

            if !self
                .bank_config
                .allows(record.operation_code.as_deref())
            {
                continue;
            }

            stats.record_retained();
            retained.push(line.clone());

            if split {
                if record.settlement_type == SettlementType::Advance {
                    advance.push(line.clone());
                } else {
                    normal.push(line.clone());
                }
            } else {
                normal.push(line.clone());
                advance.push(line.clone());
            }
        }

        if line_count > 1 {
            let trailer = &lines[line_count - 1];
            retained.push(trailer.clone());
            normal.push(trailer.clone());
            advance.push(trailer.clone());
        }

        info!("{}: {}", self.source_name, stats.summary());

        Ok(ProcessingOutcome {
            bank: self.bank,
            retained_lines: retained,
            normal_lines: normal,
            advance_lines: advance,
            split_enabled: split,
            statistics: stats,
        })
    }
}

/// Filter and split with a one-off processor
pub fn process(lines: &[String], bank: BankTag, bank_config: &BankConfig) -> Result<ProcessingOutcome> {
    RecordProcessor::new(bank, bank_config.clone()).process(lines)
}

fn trace_line(index: usize, line: &str, record: &DecodedRecord, bank_config: &BankConfig) {
    debug!(
        "Line {}: operation {:?}, settlement {}, status {:?}, allowed: {} | {}",
        index,
        record.operation_code,
        record.settlement_type,
        record.status,
        bank_config.allows(record.operation_code.as_deref()),
        line.trim_end()
    );
}
