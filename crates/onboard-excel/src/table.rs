/// Format-neutral rows and the mapping from rows to [`ClientRecord`]s.
///
/// Both readers (CSV and xlsx) lower their input into a [`Table`]: a header
/// row plus data rows of optional cell text, where `None` is an empty cell.
/// Record assembly, column lookup, and the structural checks on
/// `Client_ID` live here so the two formats behave identically.
use std::collections::HashMap;

use onboard_core::{ClientRecord, CountryTag, RiskProfileTag};

use crate::error::ImportError;
use crate::sheet::cell_ref;

/// Input column names, in report order.
pub const INPUT_COLUMNS: [&str; 8] = [
    "Client_ID",
    "Full_Name",
    "DOB",
    "Tax_ID",
    "Email",
    "Investment_Amount",
    "Risk_Profile",
    "Country",
];

/// Where a table came from; decides how cell locations are rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableSource {
    /// A CSV document. Locations render as `line N, column NAME`.
    Csv,
    /// A worksheet. Locations render as `Sheet!B7`.
    Sheet(String),
}

impl TableSource {
    fn name(&self) -> String {
        match self {
            Self::Csv => "csv".to_owned(),
            Self::Sheet(name) => format!("sheet {name:?}"),
        }
    }
}

/// One data row and the 1-based physical line or row it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    /// Physical position in the source (CSV line number or worksheet row number).
    pub position: usize,
    /// Cell text; `None` marks an empty cell.
    pub cells: Vec<Option<String>>,
}

/// A header plus data rows, independent of the source format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    /// Origin of the rows.
    pub source: TableSource,
    /// Header labels as written in the source.
    pub headers: Vec<String>,
    /// Zero-based column index of the first header cell in the source.
    pub first_column: usize,
    /// Data rows in source order.
    pub rows: Vec<TableRow>,
}

impl Table {
    /// Renders the location of a cell for error messages.
    pub fn locate(&self, col_idx: usize, position: usize) -> String {
        match &self.source {
            TableSource::Csv => {
                let column = self.headers.get(col_idx).map_or("?", String::as_str);
                format!("line {position}, column {column}")
            }
            TableSource::Sheet(name) => cell_ref(name, self.first_column + col_idx, position),
        }
    }

    /// Builds a lower-cased, trimmed header → column index map.
    fn header_index(&self) -> HashMap<String, usize> {
        let mut map = HashMap::new();
        for (idx, header) in self.headers.iter().enumerate() {
            let key = header.trim().to_lowercase();
            if !key.is_empty() {
                // Duplicate headers: first one wins.
                map.entry(key).or_insert(idx);
            }
        }
        map
    }
}

/// Resolved column positions for the eight input columns.
struct Columns {
    client_id: usize,
    full_name: usize,
    dob: usize,
    tax_id: usize,
    email: usize,
    investment_amount: usize,
    risk_profile: usize,
    country: usize,
}

impl Columns {
    fn resolve(table: &Table) -> Result<Self, ImportError> {
        let headers = table.header_index();
        let require = |column: &str| {
            headers
                .get(&column.to_lowercase())
                .copied()
                .ok_or_else(|| ImportError::MissingColumn {
                    source_name: table.source.name(),
                    column: column.to_owned(),
                })
        };
        Ok(Self {
            client_id: require("Client_ID")?,
            full_name: require("Full_Name")?,
            dob: require("DOB")?,
            tax_id: require("Tax_ID")?,
            email: require("Email")?,
            investment_amount: require("Investment_Amount")?,
            risk_profile: require("Risk_Profile")?,
            country: require("Country")?,
        })
    }
}

fn cell(row: &TableRow, col: usize) -> Option<String> {
    row.cells.get(col).cloned().flatten()
}

/// Converts every data row of `table` into a [`ClientRecord`], in order.
///
/// Rows whose cells are all empty are skipped. Field values are passed
/// through untouched; only `Client_ID` is interpreted here.
///
/// # Errors
///
/// Returns [`ImportError`] for:
/// - a missing required column
/// - a row wider than the header
/// - a `Client_ID` that is empty or not an integer
/// - a `Client_ID` that repeats an earlier row
pub fn records_from_table(table: &Table) -> Result<Vec<ClientRecord>, ImportError> {
    let cols = Columns::resolve(table)?;
    let width = table.headers.len();

    let mut seen: HashMap<i64, String> = HashMap::new();
    let mut records = Vec::with_capacity(table.rows.len());

    for row in &table.rows {
        if row.cells.iter().all(Option::is_none) {
            continue;
        }
        if row.cells.len() > width {
            return Err(ImportError::RaggedRow {
                location: table.locate(0, row.position),
                expected: width,
                got: row.cells.len(),
            });
        }

        let id_ref = table.locate(cols.client_id, row.position);
        let raw_id = cell(row, cols.client_id).unwrap_or_default();
        let client_id = parse_client_id(&raw_id).ok_or_else(|| ImportError::InvalidCell {
            cell_ref: id_ref.clone(),
            expected: "integer client id".to_owned(),
            got: raw_id.clone(),
        })?;
        if let Some(first_ref) = seen.get(&client_id) {
            return Err(ImportError::DuplicateClientId {
                cell_ref: id_ref,
                first_ref: first_ref.clone(),
                client_id,
            });
        }
        seen.insert(client_id, id_ref);

        records.push(ClientRecord {
            client_id,
            full_name: cell(row, cols.full_name).unwrap_or_default(),
            dob: cell(row, cols.dob),
            tax_id: cell(row, cols.tax_id),
            email: cell(row, cols.email),
            investment_amount: cell(row, cols.investment_amount),
            risk_profile: cell(row, cols.risk_profile)
                .as_deref()
                .map(RiskProfileTag::from)
                .unwrap_or_default(),
            country: cell(row, cols.country)
                .as_deref()
                .map(CountryTag::from)
                .unwrap_or_default(),
        });
    }

    tracing::debug!(
        source = %table.source.name(),
        rows = table.rows.len(),
        records = records.len(),
        "table converted to records"
    );
    Ok(records)
}

fn parse_client_id(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok()
}
