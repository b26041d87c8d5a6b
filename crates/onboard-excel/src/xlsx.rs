/// Workbook input.
use std::io::{Read, Seek};

use calamine::{Reader, Xlsx, open_workbook_from_rs};

use crate::error::ImportError;
use crate::sheet::table_from_range;
use crate::table::Table;

/// Reads one worksheet of an `.xlsx` workbook into a [`Table`].
///
/// `sheet` selects a worksheet by exact name; `None` takes the first sheet
/// in workbook order.
///
/// # Errors
///
/// Returns [`ImportError::MissingSheet`] when the named sheet does not exist,
/// [`ImportError::EmptyInput`] when the chosen sheet has no cells, and
/// [`ImportError::ExcelRead`] for workbook-level read failures.
pub fn read_xlsx<R: Read + Seek>(reader: R, sheet: Option<&str>) -> Result<Table, ImportError> {
    let mut workbook: Xlsx<R> =
        open_workbook_from_rs(reader).map_err(|e: calamine::XlsxError| ImportError::ExcelRead {
            detail: e.to_string(),
        })?;

    let sheet_names: Vec<String> = workbook.sheet_names();
    let name = match sheet {
        Some(requested) => sheet_names
            .iter()
            .find(|s| *s == requested)
            .cloned()
            .ok_or_else(|| ImportError::MissingSheet {
                sheet: requested.to_owned(),
            })?,
        None => sheet_names.first().cloned().ok_or(ImportError::EmptyInput)?,
    };

    let range = workbook
        .worksheet_range(&name)
        .map_err(|e| ImportError::ExcelRead {
            detail: format!("failed to read sheet {name:?}: {e}"),
        })?;
    tracing::debug!(sheet = %name, sheets = sheet_names.len(), "worksheet selected");

    table_from_range(&range, &name).ok_or(ImportError::EmptyInput)
}
