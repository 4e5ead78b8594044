//! Tabular export of advance settlement records
//!
//! CSV is always available. XLSX needs the `xlsx` cargo feature; without it an
//! xlsx request fails with an export error so the caller can record it.

use crate::app::models::{ExportFormat, ExportRecord};
use crate::constants::EXPORT_COLUMNS;
use crate::{Error, Result};
use csv::{Terminator, WriterBuilder};
use std::io::Write;

/// Write records as CSV with the `n_documento,valor,data_pagamento` header
///
/// The header row is written even when `records` is empty.
pub fn write_csv<W: Write>(writer: W, records: &[ExportRecord]) -> Result<()> {
    let mut wrt = WriterBuilder::new()
        .has_headers(false)
        .terminator(Terminator::CRLF)
        .from_writer(writer);

    wrt.write_record(EXPORT_COLUMNS)?;
    for record in records {
        wrt.serialize(record)?;
    }
    wrt.flush()?;
    Ok(())
}

/// Render records as a single-sheet workbook
#[cfg(feature = "xlsx")]
pub fn render_xlsx(records: &[ExportRecord]) -> Result<Vec<u8>> {
    use rust_xlsxwriter::{Workbook, XlsxError};

    let xlsx_error = |e: XlsxError| Error::export(format!("Failed to build workbook: {}", e));

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (col, name) in EXPORT_COLUMNS.iter().enumerate() {
        worksheet
            .write_string(0, col as u16, *name)
            .map_err(xlsx_error)?;
    }
    for (index, record) in records.iter().enumerate() {
        let row = index as u32 + 1;
        worksheet
            .write_string(row, 0, &record.document_id)
            .map_err(xlsx_error)?;
        worksheet
            .write_string(row, 1, &record.amount)
            .map_err(xlsx_error)?;
        worksheet
            .write_string(row, 2, &record.due_date)
            .map_err(xlsx_error)?;
    }

    workbook.save_to_buffer().map_err(xlsx_error)
}

#[cfg(not(feature = "xlsx"))]
pub fn render_xlsx(_records: &[ExportRecord]) -> Result<Vec<u8>> {
    Err(Error::export(
        "built without xlsx support (enable the `xlsx` feature)",
    ))
}

/// Render the export file contents in the requested format
pub fn render_export(format: ExportFormat, records: &[ExportRecord]) -> Result<Vec<u8>> {
    match format {
        ExportFormat::Csv => {
            let mut buffer = Vec::new();
            write_csv(&mut buffer, records)?;
            Ok(buffer)
        }
        ExportFormat::Xlsx => render_xlsx(records),
    }
}
