//! Plain-text rendering of processing reports

use super::aggregator::{ExportStatus, Report};
use std::fmt::Write;

const RULE: &str = "================================================================================";
const THIN_RULE: &str = "--------------------------------------------------------------------------------";

/// Format a byte count in human-readable units
pub fn format_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.2} {}", size, UNITS[unit_index])
    }
}

fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

/// Render the report as the text written to `<name>_relatorio.txt`
pub fn render_text(report: &Report) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = write_report(&mut out, report);
    out
}

fn write_report(out: &mut String, report: &Report) -> std::fmt::Result {
    let general = &report.general;

    writeln!(out, "{}", RULE)?;
    writeln!(out, "CNAB PROCESSING REPORT")?;
    writeln!(out, "{}", RULE)?;
    writeln!(out)?;

    writeln!(out, "GENERAL")?;
    writeln!(out, "{}", THIN_RULE)?;
    writeln!(out, "File:                {}", general.source_file)?;
    writeln!(out, "Bank:                {}", general.bank)?;
    writeln!(out, "Processed at:        {}", general.processed_at)?;
    writeln!(out, "Encoding:            {}", general.encoding)?;
    let allowed = if general.allowed_operations.is_empty() {
        "all".to_string()
    } else {
        general.allowed_operations.join(", ")
    };
    writeln!(out, "Allowed operations:  {}", allowed)?;
    writeln!(
        out,
        "Advance split:       {}",
        if general.split_enabled { "enabled" } else { "disabled" }
    )?;
    writeln!(out, "Data lines:          {}", general.total_lines)?;
    writeln!(out, "Valid lines:         {}", general.valid_data_lines)?;
    writeln!(out, "Invalid lines:       {}", general.invalid_lines)?;
    writeln!(
        out,
        "Retained lines:      {} ({:.2}%)",
        general.retained_lines, general.retention_rate
    )?;
    writeln!(out)?;

    writeln!(out, "OPERATIONS")?;
    writeln!(out, "{}", THIN_RULE)?;
    if report.operations.is_empty() {
        writeln!(out, "No valid records")?;
    }
    for operation in &report.operations {
        writeln!(
            out,
            "{:<4} {:>8}  {:>6.2}%  {}",
            operation.code,
            operation.count,
            percentage(operation.count, general.valid_data_lines),
            if operation.allowed { "kept" } else { "dropped" }
        )?;
    }
    writeln!(out)?;

    let settlement = &report.settlement;
    let total = settlement.total();
    writeln!(out, "SETTLEMENT TYPES")?;
    writeln!(out, "{}", THIN_RULE)?;
    writeln!(
        out,
        "Normal:   {:>8}  {:>6.2}%",
        settlement.normal,
        percentage(settlement.normal, total)
    )?;
    writeln!(
        out,
        "Advance:  {:>8}  {:>6.2}%",
        settlement.advance,
        percentage(settlement.advance, total)
    )?;
    writeln!(
        out,
        "Unknown:  {:>8}  {:>6.2}%",
        settlement.unknown,
        percentage(settlement.unknown, total)
    )?;
    writeln!(out)?;

    writeln!(out, "EXPORT")?;
    writeln!(out, "{}", THIN_RULE)?;
    match &report.export {
        ExportStatus::Written { records } => writeln!(out, "Written: {} records", records)?,
        ExportStatus::NoRecords => writeln!(out, "Skipped: no advance records to export")?,
        ExportStatus::Failed { message } => writeln!(out, "FAILED: {}", message)?,
    }
    writeln!(out)?;

    writeln!(out, "GENERATED FILES")?;
    writeln!(out, "{}", THIN_RULE)?;
    for artifact in &report.artifacts {
        writeln!(
            out,
            "{:<50} {:>12}",
            artifact.file_name,
            format_size(artifact.size_bytes)
        )?;
    }
    writeln!(out, "{}", RULE)?;

    Ok(())
}
