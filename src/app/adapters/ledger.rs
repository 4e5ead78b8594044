//! Processed-files ledger
//!
//! The ledger remembers which input files were processed successfully so the
//! watcher never processes them twice. Entries are keyed by file name.

use crate::constants::LEDGER_TIMESTAMP_FORMAT;
use crate::{Error, Result};
use chrono::Local;
use regex::Regex;
use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::debug;

/// Storage for processed file names
pub trait ProcessedLedger {
    /// Whether `file_name` was recorded before
    fn contains(&self, file_name: &str) -> Result<bool>;

    /// Record `file_name` as processed
    fn record(&mut self, file_name: &str) -> Result<()>;
}

fn entry_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^- (.+?) \(processado em (.+)\)$").expect("ledger entry pattern is valid")
    })
}

/// Parse the file name out of one ledger line
pub fn parse_entry(line: &str) -> Option<&str> {
    entry_pattern()
        .captures(line.trim_end())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Append-only Markdown ledger
///
/// Lines look like `- CB010101.RET (processado em 2025-06-15 10:00:00)`.
/// Lookups parse each line, so `CB01.RET` does not match `CB010101.RET`.
#[derive(Debug, Clone)]
pub struct MarkdownLedger {
    path: PathBuf,
}

impl MarkdownLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All recorded file names, in file order
    pub fn entries(&self) -> Result<Vec<String>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(Error::ledger(format!(
                    "Failed to read {}: {}",
                    self.path.display(),
                    e
                )));
            }
        };

        Ok(content
            .lines()
            .filter_map(parse_entry)
            .map(str::to_string)
            .collect())
    }
}

impl ProcessedLedger for MarkdownLedger {
    fn contains(&self, file_name: &str) -> Result<bool> {
        Ok(self.entries()?.iter().any(|entry| entry == file_name))
    }

    fn record(&mut self, file_name: &str) -> Result<()> {
        let timestamp = Local::now().format(LEDGER_TIMESTAMP_FORMAT);
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| {
                Error::ledger(format!("Failed to open {}: {}", self.path.display(), e))
            })?;
        writeln!(file, "- {} (processado em {})", file_name, timestamp).map_err(|e| {
            Error::ledger(format!("Failed to append to {}: {}", self.path.display(), e))
        })?;

        debug!("Recorded {} in {}", file_name, self.path.display());
        Ok(())
    }
}

/// In-memory ledger for tests and dry runs
#[derive(Debug, Clone, Default)]
pub struct MemoryLedger {
    entries: HashSet<String>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ProcessedLedger for MemoryLedger {
    fn contains(&self, file_name: &str) -> Result<bool> {
        Ok(self.entries.contains(file_name))
    }

    fn record(&mut self, file_name: &str) -> Result<()> {
        self.entries.insert(file_name.to_string());
        Ok(())
    }
}
