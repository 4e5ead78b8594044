//! Structured report built from run statistics
//!
//! Aggregation is a pure function of the statistics, the run context and the
//! list of written artifacts. Rendering lives in [`super::formatter`].

use crate::app::models::BankTag;
use crate::app::services::record_processor::RunStatistics;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Facts about the run that are not counters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportContext {
    pub source_file: String,
    pub bank: BankTag,
    pub allowed_operations: Vec<String>,
    pub split_enabled: bool,
    pub encoding: String,
    /// Local timestamp of the run, already formatted
    pub processed_at: String,
}

/// General section of the report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneralInfo {
    pub source_file: String,
    pub bank: BankTag,
    pub processed_at: String,
    pub encoding: String,
    pub allowed_operations: Vec<String>,
    pub split_enabled: bool,
    pub total_lines: usize,
    pub valid_data_lines: usize,
    pub invalid_lines: usize,
    pub retained_lines: usize,
    pub retention_rate: f64,
}

/// One row of the per-operation breakdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationCount {
    pub code: String,
    pub count: usize,
    pub allowed: bool,
}

/// Normal / advance / unknown breakdown of valid records
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementBreakdown {
    pub normal: usize,
    pub advance: usize,
    pub unknown: usize,
}

impl SettlementBreakdown {
    pub fn total(&self) -> usize {
        self.normal + self.advance + self.unknown
    }
}

/// A written output file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportArtifact {
    pub file_name: String,
    pub path: PathBuf,
    pub size_bytes: u64,
}

/// Outcome of the tabular export
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExportStatus {
    /// Export written with this many rows
    Written { records: usize },
    /// No advance record survived filtering; nothing written
    NoRecords,
    /// Export failed; the other outputs were still produced
    Failed { message: String },
}

/// Complete processing report for one file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub general: GeneralInfo,
    pub operations: Vec<OperationCount>,
    pub settlement: SettlementBreakdown,
    pub artifacts: Vec<ReportArtifact>,
    pub export: ExportStatus,
}

impl Report {
    pub fn total_artifact_size(&self) -> u64 {
        self.artifacts.iter().map(|a| a.size_bytes).sum()
    }
}

/// Build the structured report
///
/// Operations are sorted by descending count, ties by code. Artifacts are
/// deduplicated by file name, keeping the first occurrence, so a file mirrored
/// into several directories is listed once.
pub fn aggregate(
    context: &ReportContext,
    stats: &RunStatistics,
    artifacts: &[(PathBuf, u64)],
    export: ExportStatus,
) -> Report {
    let general = GeneralInfo {
        source_file: context.source_file.clone(),
        bank: context.bank,
        processed_at: context.processed_at.clone(),
        encoding: context.encoding.clone(),
        allowed_operations: context.allowed_operations.clone(),
        split_enabled: context.split_enabled,
        total_lines: stats.total_lines,
        valid_data_lines: stats.valid_data_lines,
        invalid_lines: stats.invalid_lines,
        retained_lines: stats.retained_lines,
        retention_rate: stats.retention_rate(),
    };

    let mut operations: Vec<OperationCount> = stats
        .operation_counts
        .iter()
        .map(|(code, count)| OperationCount {
            code: code.clone(),
            count: *count,
            allowed: context.allowed_operations.is_empty()
                || context.allowed_operations.contains(code),
        })
        .collect();
    operations.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.code.cmp(&b.code)));

    let settlement = SettlementBreakdown {
        normal: stats.normal_count,
        advance: stats.advance_count,
        unknown: stats.unknown_type_count,
    };

    let mut seen = HashSet::new();
    let artifacts = artifacts
        .iter()
        .filter_map(|(path, size)| {
            let file_name = file_name_of(path);
            seen.insert(file_name.clone()).then(|| ReportArtifact {
                file_name,
                path: path.clone(),
                size_bytes: *size,
            })
        })
        .collect();

    Report {
        general,
        operations,
        settlement,
        artifacts,
        export,
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
