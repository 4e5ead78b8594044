//! Per-file orchestration
//!
//! Runs one return file through the whole pipeline: read, decode, identify
//! the bank, filter and split, then write every artifact to every output
//! directory and finish with the report. The pure steps are exposed through
//! [`FileRunner::analyze`] so callers can inspect a file without writing.
//!
//! A run succeeds when the filtered file lands in at least one directory.
//! Failures of other artifacts or other destinations are logged and listed in
//! the returned [`FileRunReport`].

use crate::app::adapters::filesystem::{
    DestinationWrite, OutputNames, backup_original, output_dirs, write_to_dirs,
};
use crate::app::models::{BankTag, ExportRecord};
use crate::app::services::cnab_parser::{DecodedFile, TextEncoding, decode_file, identify_bank};
use crate::app::services::document_extractor::extract_export_records;
use crate::app::services::export_writer::render_export;
use crate::app::services::record_processor::{ProcessingOutcome, RecordProcessor, RunStatistics};
use crate::app::services::report::{ExportStatus, Report, ReportContext, aggregate, render_text};
use crate::config::{BankConfig, Config};
use crate::constants::LEDGER_TIMESTAMP_FORMAT;
use crate::{Error, Result};
use chrono::{Local, Utc};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// A decoded input with its detected bank
#[derive(Debug, Clone)]
pub struct LoadedFile {
    pub path: PathBuf,
    pub file_name: String,
    pub decoded: DecodedFile,
    pub bank: BankTag,
}

/// Everything the pipeline computes for a file, before anything is written
#[derive(Debug, Clone)]
pub struct FileAnalysis {
    pub file: LoadedFile,
    pub bank_config: BankConfig,
    pub outcome: ProcessingOutcome,
    pub export_records: Vec<ExportRecord>,
}

/// Result of a completed file run
#[derive(Debug, Clone, Serialize)]
pub struct FileRunReport {
    pub source: PathBuf,
    pub bank: BankTag,
    pub encoding: TextEncoding,
    pub statistics: RunStatistics,
    pub export: ExportStatus,
    /// Every artifact written, across all directories
    pub written: Vec<PathBuf>,
    /// Backups of the original created in this run
    pub backups: Vec<PathBuf>,
    /// Destinations that failed, with the reason
    pub failures: Vec<String>,
    pub report: Report,
}

impl FileRunReport {
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty() || matches!(self.export, ExportStatus::Failed { .. })
    }
}

/// Runs single files through the pipeline
#[derive(Debug, Clone)]
pub struct FileRunner {
    config: Config,
    mirror_dirs: Vec<PathBuf>,
}

impl FileRunner {
    /// Runner that mirrors outputs into the configured watch directories
    pub fn new(config: Config) -> Self {
        let mirror_dirs = config.watch_dirs();
        Self {
            config,
            mirror_dirs,
        }
    }

    /// Replace the mirror directories; the input's own directory is always used
    pub fn with_mirror_dirs(mut self, dirs: Vec<PathBuf>) -> Self {
        self.mirror_dirs = dirs;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Read, decode and identify the bank of a file
    pub fn load(&self, path: &Path) -> Result<LoadedFile> {
        let file_name = display_name(path);
        let bytes = fs::read(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Error::file_not_found(path.display().to_string()),
            _ => Error::io(format!("Failed to read {}", path.display()), e),
        })?;

        let decoded = decode_file(&bytes, &self.config.encodings, &file_name)?;
        let bank = decoded
            .lines
            .first()
            .map(|header| identify_bank(header.as_str()))
            .unwrap_or(BankTag::Unknown);

        Ok(LoadedFile {
            path: path.to_path_buf(),
            file_name,
            decoded,
            bank,
        })
    }

    /// Run the pure pipeline on a loaded file
    pub fn analyze_loaded(&self, file: LoadedFile) -> Result<FileAnalysis> {
        if file.decoded.lines.is_empty() {
            return Err(Error::empty_file(&file.file_name));
        }

        let bank_config = self
            .config
            .resolve_bank_config(file.bank, &file.file_name)?;
        let outcome = RecordProcessor::new(file.bank, bank_config.clone())
            .with_source_name(&file.file_name)
            .process(&file.decoded.lines)?;
        let export_records = extract_export_records(&outcome.advance_lines);

        Ok(FileAnalysis {
            file,
            bank_config,
            outcome,
            export_records,
        })
    }

    /// Load and run the pure pipeline without writing anything
    pub fn analyze(&self, path: &Path) -> Result<FileAnalysis> {
        let file = self.load(path)?;
        self.analyze_loaded(file)
    }

    /// Process one file and write all of its artifacts
    pub fn run(&self, path: &Path) -> Result<FileRunReport> {
        let names = OutputNames::from_input(path)?;
        let analysis = self.analyze(path)?;
        let dirs = output_dirs(path, &self.mirror_dirs);
        let file = &analysis.file;
        let outcome = &analysis.outcome;

        info!(
            "Writing outputs for {} ({}) to {} director{}",
            file.file_name,
            file.bank,
            dirs.len(),
            if dirs.len() == 1 { "y" } else { "ies" }
        );

        let mut artifacts: Vec<(PathBuf, u64)> = Vec::new();
        let mut failures: Vec<String> = Vec::new();

        let backups = if self.config.backup_original {
            let results = backup_original(path, &names, &dirs, Utc::now().timestamp());
            collect_writes(results, &mut Vec::new(), &mut failures)
        } else {
            Vec::new()
        };

        let filtered = write_to_dirs(
            &dirs,
            &names.filtered(),
            &file.decoded.render(&outcome.retained_lines)?,
        );
        if !filtered.iter().any(DestinationWrite::is_ok) {
            let first_error = filtered.into_iter().find_map(|write| write.result.err());
            return Err(first_error.unwrap_or_else(|| {
                Error::processing_interrupted(format!(
                    "no output directory available for {}",
                    file.file_name
                ))
            }));
        }
        collect_writes(filtered, &mut artifacts, &mut failures);

        if outcome.split_enabled {
            let normal = write_to_dirs(
                &dirs,
                &names.normal(),
                &file.decoded.render(&outcome.normal_lines)?,
            );
            collect_writes(normal, &mut artifacts, &mut failures);

            let advance = write_to_dirs(
                &dirs,
                &names.advance(),
                &file.decoded.render(&outcome.advance_lines)?,
            );
            collect_writes(advance, &mut artifacts, &mut failures);
        }

        let export = self.write_export(
            &names,
            &dirs,
            &analysis.export_records,
            &mut artifacts,
            &mut failures,
        );

        let context = ReportContext {
            source_file: file.file_name.clone(),
            bank: file.bank,
            allowed_operations: analysis
                .bank_config
                .allowed_operations
                .iter()
                .cloned()
                .collect(),
            split_enabled: outcome.split_enabled,
            encoding: file.decoded.encoding.to_string(),
            processed_at: Local::now().format(LEDGER_TIMESTAMP_FORMAT).to_string(),
        };
        let report = aggregate(&context, &outcome.statistics, &artifacts, export.clone());

        let report_writes = write_to_dirs(&dirs, &names.report(), render_text(&report).as_bytes());
        collect_writes(report_writes, &mut artifacts, &mut failures);

        if failures.is_empty() {
            info!("{} processed: {}", file.file_name, outcome.summary());
        } else {
            warn!(
                "{} processed with {} failed destination(s)",
                file.file_name,
                failures.len()
            );
        }

        Ok(FileRunReport {
            source: path.to_path_buf(),
            bank: file.bank,
            encoding: file.decoded.encoding,
            statistics: outcome.statistics.clone(),
            export,
            written: artifacts.into_iter().map(|(path, _)| path).collect(),
            backups,
            failures,
            report,
        })
    }

    fn write_export(
        &self,
        names: &OutputNames,
        dirs: &[PathBuf],
        records: &[ExportRecord],
        artifacts: &mut Vec<(PathBuf, u64)>,
        failures: &mut Vec<String>,
    ) -> ExportStatus {
        if records.is_empty() {
            info!("No advance records to export");
            return ExportStatus::NoRecords;
        }

        let format = self.config.output_format;
        let bytes = match render_export(format, records) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Export failed: {}", e);
                return ExportStatus::Failed {
                    message: e.to_string(),
                };
            }
        };

        let writes = write_to_dirs(dirs, &names.export(format), &bytes);
        let first_error = writes
            .iter()
            .find_map(|write| write.result.as_ref().err().map(|e| e.to_string()));
        let written = collect_writes(writes, artifacts, failures);

        match (written.is_empty(), first_error) {
            (true, Some(message)) => ExportStatus::Failed { message },
            _ => ExportStatus::Written {
                records: records.len(),
            },
        }
    }
}

/// Split destination results into written artifacts and failure messages
///
/// Returns the paths written by this batch.
fn collect_writes(
    writes: Vec<DestinationWrite>,
    artifacts: &mut Vec<(PathBuf, u64)>,
    failures: &mut Vec<String>,
) -> Vec<PathBuf> {
    let mut written = Vec::new();
    for write in writes {
        match write.result {
            Ok(size) => {
                written.push(write.path.clone());
                artifacts.push((write.path, size));
            }
            Err(e) => failures.push(format!("{}: {}", write.path.display(), e)),
        }
    }
    written
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
