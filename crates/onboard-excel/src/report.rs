/// The onboarding status report.
///
/// One worksheet, `Onboarding_Status`, with a header row and one row per
/// input record in input order. Input fields are written back as read, with
/// recognised risk profiles and countries in their canonical spelling; absent
/// values are left as blank cells. `Client_ID` is written as a number,
/// or as text when it is too large for a number cell to hold exactly.
use std::io::Write;

use chrono::NaiveDateTime;
use rust_xlsxwriter::{Workbook, Worksheet, XlsxError};

use onboard_core::{ClientRecord, ValidationOutcome};

use crate::error::ExportError;
use crate::table::INPUT_COLUMNS;

/// Worksheet name of the report.
pub const REPORT_SHEET: &str = "Onboarding_Status";

/// Default directory reports are written to.
pub const DEFAULT_REPORT_DIR: &str = "processed_reports";

/// Columns appended after the eight input columns.
pub const OUTCOME_COLUMNS: [&str; 3] = ["Validation_Status", "Error_Details", "Audit_Timestamp"];

/// Formats the audit timestamp stamped on every report row.
pub fn audit_timestamp(at: NaiveDateTime) -> String {
    at.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Default report file name for a run started at `at`.
pub fn report_file_name(at: NaiveDateTime) -> String {
    format!("SMA_Onboarding_Report_{}.xlsx", at.format("%Y%m%d_%H%M%S"))
}

/// Writes the report workbook for `records` and their `outcomes` to `writer`.
///
/// `outcomes[i]` must be the outcome for `records[i]`. Every row carries the
/// same `audit_timestamp`.
///
/// # Errors
///
/// Returns [`ExportError::LengthMismatch`] when the slices are not aligned,
/// and [`ExportError::ExcelWrite`] or [`ExportError::Io`] when the workbook
/// cannot be built or written.
pub fn write_report<W: Write>(
    records: &[ClientRecord],
    outcomes: &[ValidationOutcome],
    audit_timestamp: &str,
    mut writer: W,
) -> Result<(), ExportError> {
    if records.len() != outcomes.len() {
        return Err(ExportError::LengthMismatch {
            records: records.len(),
            outcomes: outcomes.len(),
        });
    }

    let mut wb = Workbook::new();
    wb.add_worksheet()
        .set_name(REPORT_SHEET)
        .map_err(|e: XlsxError| ExportError::ExcelWrite {
            detail: e.to_string(),
        })?;
    let ws = wb
        .worksheet_from_name(REPORT_SHEET)
        .map_err(|e: XlsxError| ExportError::ExcelWrite {
            detail: e.to_string(),
        })?;

    write_header(ws)?;
    for (idx, (record, outcome)) in records.iter().zip(outcomes).enumerate() {
        let row = u32::try_from(idx + 1).map_err(|_| ExportError::ExcelWrite {
            detail: format!("row {} exceeds the worksheet row limit", idx + 1),
        })?;
        write_row(ws, row, record, outcome, audit_timestamp)?;
    }

    let xlsx_bytes = wb
        .save_to_buffer()
        .map_err(|e: XlsxError| ExportError::ExcelWrite {
            detail: e.to_string(),
        })?;

    writer.write_all(&xlsx_bytes).map_err(|e| ExportError::Io {
        detail: e.to_string(),
    })?;
    writer.flush().map_err(|e| ExportError::Io {
        detail: e.to_string(),
    })?;

    tracing::debug!(rows = records.len(), bytes = xlsx_bytes.len(), "report written");
    Ok(())
}

fn write_header(ws: &mut Worksheet) -> Result<(), ExportError> {
    for (col, name) in INPUT_COLUMNS.iter().chain(OUTCOME_COLUMNS.iter()).enumerate() {
        ws_write(ws, 0, col as u16, Some(*name))?;
    }
    Ok(())
}

fn write_row(
    ws: &mut Worksheet,
    row: u32,
    record: &ClientRecord,
    outcome: &ValidationOutcome,
    audit_timestamp: &str,
) -> Result<(), ExportError> {
    write_client_id(ws, row, record.client_id)?;
    ws_write(ws, row, 1, Some(record.full_name.as_str()))?;
    ws_write(ws, row, 2, record.dob.as_deref())?;
    ws_write(ws, row, 3, record.tax_id.as_deref())?;
    ws_write(ws, row, 4, record.email.as_deref())?;
    ws_write(ws, row, 5, record.investment_amount.as_deref())?;
    ws_write(ws, row, 6, Some(record.risk_profile.as_str()))?;
    ws_write(ws, row, 7, Some(record.country.as_str()))?;

    let message = outcome.message();
    ws_write(ws, row, 8, Some(outcome.status().as_str()))?;
    ws_write(ws, row, 9, Some(message.as_str()))?;
    ws_write(ws, row, 10, Some(audit_timestamp))
}

/// Largest magnitude an `f64` cell holds without rounding an integer.
const MAX_EXACT_NUMERIC_ID: i64 = 1 << 53;

/// Writes `Client_ID` as a number, or as text when a number cell would round it.
fn write_client_id(ws: &mut Worksheet, row: u32, client_id: i64) -> Result<(), ExportError> {
    let written = if client_id.unsigned_abs() <= MAX_EXACT_NUMERIC_ID.unsigned_abs() {
        #[allow(clippy::cast_precision_loss)]
        let numeric = client_id as f64;
        ws.write(row, 0, numeric).map(|_| ())
    } else {
        ws.write(row, 0, client_id.to_string()).map(|_| ())
    };
    written.map_err(|e: XlsxError| ExportError::ExcelWrite {
        detail: e.to_string(),
    })
}

/// Writes a string cell; absent or empty values leave the cell blank.
fn ws_write(ws: &mut Worksheet, row: u32, col: u16, val: Option<&str>) -> Result<(), ExportError> {
    let Some(val) = val.filter(|v| !v.is_empty()) else {
        return Ok(());
    };
    ws.write(row, col, val)
        .map(|_| ())
        .map_err(|e: XlsxError| ExportError::ExcelWrite {
            detail: e.to_string(),
        })
}
