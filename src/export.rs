use std::path::Path;

use rust_xlsxwriter::{Workbook, XlsxError};
use thiserror::Error;
use tracing::info;

use crate::parser::table::{ExpressionRecord, COLUMNS};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("xlsx error: {0}")]
    Xlsx(#[from] XlsxError),
    #[error("too many rows for a worksheet: {0}")]
    TooManyRows(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Xlsx,
    Csv,
}

impl Format {
    /// `.csv` selects CSV; every other extension gets a workbook.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => Format::Csv,
            _ => Format::Xlsx,
        }
    }
}

/// Write a header row and one row per record, replacing any existing file.
pub fn write_records(records: &[ExpressionRecord], path: &Path) -> Result<(), ExportError> {
    match Format::from_path(path) {
        Format::Csv => write_csv(records, path)?,
        Format::Xlsx => write_xlsx(records, path)?,
    }
    info!("Wrote {} records to {:?}", records.len(), path);
    Ok(())
}

fn write_csv(records: &[ExpressionRecord], path: &Path) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(COLUMNS)?;
    for record in records {
        writer.write_record(record.fields())?;
    }
    writer.flush()?;
    Ok(())
}

fn write_xlsx(records: &[ExpressionRecord], path: &Path) -> Result<(), ExportError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    for (col, name) in COLUMNS.iter().enumerate() {
        sheet.write_string(0, col as u16, *name)?;
    }
    for (i, record) in records.iter().enumerate() {
        let row = u32::try_from(i + 1).map_err(|_| ExportError::TooManyRows(records.len()))?;
        for (col, value) in record.fields().iter().enumerate() {
            sheet.write_string(row, col as u16, *value)?;
        }
    }

    workbook.save(path)?;
    Ok(())
}
