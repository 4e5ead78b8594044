//! Processing reports
//!
//! - [`aggregator`] - Pure aggregation of run statistics into a [`Report`]
//! - [`formatter`] - Plain-text rendering of a report

pub mod aggregator;
pub mod formatter;

pub use aggregator::{
    ExportStatus, GeneralInfo, OperationCount, Report, ReportArtifact, ReportContext,
    SettlementBreakdown, aggregate,
};
pub use formatter::{format_size, render_text};
