//! Directory polling
//!
//! The watcher scans its directories for return files, runs each file that is
//! not in the ledger through the [`FileRunner`], and records successes. Cycles
//! run one after another with a fixed sleep in between. Cancellation is
//! checked between files and during the sleep, never in the middle of a file.

use crate::app::adapters::ledger::ProcessedLedger;
use crate::app::services::file_runner::{FileRunReport, FileRunner};
use crate::{Error, Result};
use glob::{MatchOptions, Pattern};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Counters for one polling cycle, or for a whole watch session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CycleSummary {
    /// Candidate files found
    pub scanned: usize,
    /// Candidates already in the ledger
    pub already_processed: usize,
    pub processed: usize,
    /// Files left alone (bank disabled, unidentified or empty)
    pub skipped: usize,
    pub failed: usize,
    /// Files processed with at least one failed destination or export
    pub with_warnings: usize,
    /// Whether cancellation stopped the cycle early
    pub interrupted: bool,
}

impl CycleSummary {
    /// Add another cycle's counters to this one
    pub fn absorb(&mut self, other: &CycleSummary) {
        self.scanned += other.scanned;
        self.already_processed += other.already_processed;
        self.processed += other.processed;
        self.skipped += other.skipped;
        self.failed += other.failed;
        self.with_warnings += other.with_warnings;
        self.interrupted |= other.interrupted;
    }

    pub fn summary(&self) -> String {
        format!(
            "{} found, {} new: {} processed, {} skipped, {} failed",
            self.scanned,
            self.scanned - self.already_processed,
            self.processed,
            self.skipped,
            self.failed
        )
    }
}

/// Totals for a watch session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WatchSummary {
    pub cycles: usize,
    pub totals: CycleSummary,
}

/// Polls directories and processes new return files
pub struct Watcher<L: ProcessedLedger> {
    runner: FileRunner,
    ledger: L,
    dirs: Vec<PathBuf>,
    extension: String,
    interval: Duration,
    reports: Vec<FileRunReport>,
}

impl<L: ProcessedLedger> Watcher<L> {
    /// Watcher over the runner's configured directories
    pub fn new(runner: FileRunner, ledger: L) -> Self {
        let config = runner.config();
        let dirs = config.watch_dirs();
        let extension = config.file_extension.clone();
        let interval = config.check_interval();
        Self {
            runner,
            ledger,
            dirs,
            extension,
            interval,
            reports: Vec::new(),
        }
    }

    pub fn with_dirs(mut self, dirs: Vec<PathBuf>) -> Self {
        self.dirs = dirs;
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    /// Reports of the files processed in the latest cycle
    pub fn reports(&self) -> &[FileRunReport] {
        &self.reports
    }

    /// Candidate files in all directories, sorted within each directory
    ///
    /// A candidate has the configured extension (any case) and no underscore
    /// in its name; derived artifacts and backups always carry one. Missing
    /// directories are logged and skipped.
    pub fn scan(&self) -> Result<Vec<PathBuf>> {
        let mut candidates = Vec::new();
        for dir in &self.dirs {
            if !dir.is_dir() {
                warn!("Watch directory not found: {}", dir.display());
                continue;
            }
            candidates.extend(scan_dir(dir, &self.extension)?);
        }
        debug!("Scan found {} candidate file(s)", candidates.len());
        Ok(candidates)
    }

    /// Process every candidate that is not in the ledger
    pub fn run_cycle(&mut self, token: Option<&CancellationToken>) -> CycleSummary {
        let mut summary = CycleSummary::default();
        self.reports.clear();

        let candidates = match self.scan() {
            Ok(candidates) => candidates,
            Err(e) => {
                error!("Scan failed: {}", e);
                return summary;
            }
        };
        summary.scanned = candidates.len();

        for path in candidates {
            if token.is_some_and(CancellationToken::is_cancelled) {
                info!("Cancellation requested, stopping cycle");
                summary.interrupted = true;
                break;
            }

            let file_name = match path.file_name() {
                Some(name) => name.to_string_lossy().into_owned(),
                None => continue,
            };

            match self.ledger.contains(&file_name) {
                Ok(true) => {
                    debug!("{} already processed, skipping", file_name);
                    summary.already_processed += 1;
                    continue;
                }
                Ok(false) => {}
                Err(e) => {
                    error!("Ledger lookup failed for {}: {}", file_name, e);
                    summary.failed += 1;
                    continue;
                }
            }

            match self.runner.run(&path) {
                Ok(report) => {
                    if let Err(e) = self.ledger.record(&file_name) {
                        error!("Processed {} but could not record it: {}", file_name, e);
                    }
                    if report.has_failures() {
                        summary.with_warnings += 1;
                    }
                    info!("{} processed successfully", file_name);
                    summary.processed += 1;
                    self.reports.push(report);
                }
                Err(e) if e.is_skip() => {
                    info!("Skipping {}: {}", file_name, e);
                    summary.skipped += 1;
                }
                Err(e) => {
                    error!("Failed to process {}: {}", file_name, e);
                    summary.failed += 1;
                }
            }
        }

        info!("Cycle finished: {}", summary.summary());
        summary
    }

    /// Run cycles until the token is cancelled
    pub async fn run(&mut self, token: CancellationToken) -> WatchSummary {
        info!(
            "Watching {} every {}s",
            self.dirs
                .iter()
                .map(|d| d.display().to_string())
                .collect::<Vec<_>>()
                .join(", "),
            self.interval.as_secs()
        );

        let mut watch = WatchSummary::default();
        while !token.is_cancelled() {
            let summary = self.run_cycle(Some(&token));
            watch.cycles += 1;
            watch.totals.absorb(&summary);
            if summary.interrupted {
                break;
            }

            debug!("Sleeping {}s before next cycle", self.interval.as_secs());
            tokio::select! {
                _ = token.cancelled() => break,
                _ = tokio::time::sleep(self.interval) => {}
            }
        }

        info!(
            "Watcher stopped after {} cycle(s): {}",
            watch.cycles,
            watch.totals.summary()
        );
        watch
    }
}

fn scan_dir(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let pattern = format!(
        "{}/*.{}",
        Pattern::escape(&dir.to_string_lossy()),
        Pattern::escape(extension)
    );
    let options = MatchOptions {
        case_sensitive: false,
        require_literal_separator: true,
        require_literal_leading_dot: false,
    };

    let entries = glob::glob_with(&pattern, options)
        .map_err(|e| Error::configuration(format!("Invalid scan pattern '{}': {}", pattern, e)))?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(e) => {
                warn!("Unreadable entry while scanning {}: {}", dir.display(), e);
                None
            }
        })
        .filter(|path| path.is_file())
        .filter(|path| {
            path.file_name()
                .map(|name| !name.to_string_lossy().contains('_'))
                .unwrap_or(false)
        })
        .collect();
    files.sort();
    Ok(files)
}
