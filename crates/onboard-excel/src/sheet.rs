/// Shared helpers for reading calamine worksheet ranges.
///
/// Lowers a worksheet into a [`Table`] with `{Sheet}!{Column}{Row}`
/// positions preserved for error messages.
use calamine::{Data, Range};

use crate::table::{Table, TableRow, TableSource};

/// Converts a `calamine::Data` cell to its text, or `None` when empty.
///
/// String cells are returned untouched, so whitespace survives to the
/// validation engine. Whole floats render without a fractional part and
/// date cells render as `YYYY-MM-DD`.
pub fn cell_to_text(cell: &Data) -> Option<String> {
    match cell {
        Data::String(s) => (!s.is_empty()).then(|| s.clone()),
        Data::Float(f) => Some(float_to_text(*f)),
        Data::Int(i) => Some(i.to_string()),
        Data::Bool(b) => Some(b.to_string()),
        Data::DateTime(dt) => Some(
            dt.as_datetime()
                .map_or_else(|| dt.to_string(), |d| d.format("%Y-%m-%d").to_string()),
        ),
        Data::DateTimeIso(s) => Some(s.split('T').next().unwrap_or(s).to_owned()),
        Data::DurationIso(s) => Some(s.clone()),
        Data::Error(_) | Data::Empty => None,
    }
}

fn float_to_text(f: f64) -> String {
    if f.is_finite() && f == f.floor() && f.abs() < 1e15 {
        format!("{}", f as i64)
    } else {
        f.to_string()
    }
}

/// Builds a column reference string like `"B"` from a zero-based column index.
pub fn col_letter(col_idx: usize) -> String {
    let mut n = col_idx + 1;
    let mut letters = Vec::new();
    while n > 0 {
        n -= 1;
        letters.push((b'A' + (n % 26) as u8) as char);
        n /= 26;
    }
    letters.iter().rev().collect()
}

/// Formats a cell reference as `"{Sheet}!{Col}{Row}"` with a 1-based row.
pub fn cell_ref(sheet_name: &str, col_idx: usize, row_number: usize) -> String {
    format!("{}!{}{}", sheet_name, col_letter(col_idx), row_number)
}

/// Lowers a worksheet range into a [`Table`].
///
/// The first row of the used range is the header. Returns `None` for a
/// sheet with no cells at all.
pub fn table_from_range(range: &Range<Data>, sheet_name: &str) -> Option<Table> {
    let (start_row, start_col) = range.start()?;
    let mut rows = range.rows();
    let header_row = rows.next()?;
    let headers = header_row
        .iter()
        .map(|c| cell_to_text(c).unwrap_or_default())
        .collect();

    let first_row_number = start_row as usize + 1;
    let rows = rows
        .enumerate()
        .map(|(idx, cells)| TableRow {
            position: first_row_number + idx + 1,
            cells: trim_trailing_empty(cells.iter().map(cell_to_text).collect()),
        })
        .collect();

    Some(Table {
        source: TableSource::Sheet(sheet_name.to_owned()),
        headers,
        first_column: start_col as usize,
        rows,
    })
}

/// Drops empty cells past the last populated one.
///
/// A range is as wide as its widest row, so stray cells far to the right
/// would otherwise make every row look ragged.
fn trim_trailing_empty(mut cells: Vec<Option<String>>) -> Vec<Option<String>> {
    while matches!(cells.last(), Some(None)) {
        cells.pop();
    }
    cells
}
