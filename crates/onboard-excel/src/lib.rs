/// Record-set input and report output for the onboarding validator.
///
/// This crate reads client records from CSV text or an `.xlsx` workbook and
/// writes the `Onboarding_Status` report workbook. The `calamine` and
/// `rust_xlsxwriter` dependencies are confined to this crate and do not bleed
/// into `onboard-core`.
///
/// # Input columns
///
/// | Column | Notes |
/// |---|---|
/// | `Client_ID` | Integer, unique within the file |
/// | `Full_Name` | Carried through, never validated |
/// | `DOB` | Raw text; `YYYY-MM-DD` expected |
/// | `Tax_ID` | Raw text |
/// | `Email` | Raw text |
/// | `Investment_Amount` | Raw text; numeric expected |
/// | `Risk_Profile` | `High`, `Medium` or `Low` |
/// | `Country` | `India`, `USA`, `UK` or `Singapore` |
///
/// Header matching ignores case and surrounding whitespace. Extra columns
/// are ignored. Only structural problems are errors; malformed field values
/// are handed to the validation engine unchanged.
use std::io::Cursor;

use onboard_core::ClientRecord;

mod csv;
pub mod error;
pub mod report;
mod sheet;
mod table;
mod xlsx;

pub use error::{ExportError, ImportError};
pub use report::{
    DEFAULT_REPORT_DIR, OUTCOME_COLUMNS, REPORT_SHEET, audit_timestamp, report_file_name,
    write_report,
};
pub use table::INPUT_COLUMNS;

/// Zip local-file-header magic; every `.xlsx` starts with it.
const XLSX_MAGIC: &[u8] = b"PK\x03\x04";

/// The container format of an input record set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// Comma-separated UTF-8 text.
    Csv,
    /// Office Open XML workbook.
    Xlsx,
}

impl std::fmt::Display for InputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Csv => f.write_str("csv"),
            Self::Xlsx => f.write_str("xlsx"),
        }
    }
}

/// Detects the input format from the leading bytes.
///
/// Anything that does not start with the zip magic is treated as CSV.
pub fn detect_format(bytes: &[u8]) -> InputFormat {
    if bytes.starts_with(XLSX_MAGIC) {
        InputFormat::Xlsx
    } else {
        InputFormat::Csv
    }
}

/// Reads a complete record set from raw input bytes.
///
/// The format is detected from the content. `sheet` selects a worksheet by
/// name for workbook input and is ignored for CSV.
///
/// # Errors
///
/// Returns [`ImportError`] for:
/// - Empty input or CSV that is not valid UTF-8
/// - A missing worksheet or required column
/// - Malformed CSV structure (unterminated quotes, ragged rows)
/// - A non-integer or duplicate `Client_ID`
/// - Workbook read failures
pub fn read_records(bytes: &[u8], sheet: Option<&str>) -> Result<Vec<ClientRecord>, ImportError> {
    let format = detect_format(bytes);
    let _span = tracing::debug_span!("read_records", %format, bytes = bytes.len()).entered();

    let table = match format {
        InputFormat::Xlsx => xlsx::read_xlsx(Cursor::new(bytes), sheet)?,
        InputFormat::Csv => {
            let text = std::str::from_utf8(bytes).map_err(|e| ImportError::UnrecognizedFormat {
                byte_offset: e.valid_up_to(),
            })?;
            csv::parse_csv(text)?
        }
    };
    table::records_from_table(&table)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]
    #![allow(clippy::panic)]
    #![allow(clippy::wildcard_enum_match_arm)]

    use super::*;

    const HEADER: &str =
        "Client_ID,Full_Name,DOB,Tax_ID,Email,Investment_Amount,Risk_Profile,Country\n";

    #[test]
    fn detects_xlsx_by_magic() {
        assert_eq!(detect_format(b"PK\x03\x04rest"), InputFormat::Xlsx);
        assert_eq!(detect_format(b"Client_ID,Full_Name"), InputFormat::Csv);
        assert_eq!(detect_format(b""), InputFormat::Csv);
    }

    #[test]
    fn reads_csv_records() {
        let input = format!(
            "{HEADER}101,Ananya Iyer,1990-05-20,ABCDE1234F,ananya.iyer@gmail.com,750000,High,India\n\
             102,Kabir Shah,2016-01-01,MISSING,kabir@,abc,Low,Singapore\n"
        );
        let records = read_records(input.as_bytes(), None).expect("read");
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].tax_id.as_deref(), Some("MISSING"));
        assert_eq!(records[1].investment_amount.as_deref(), Some("abc"));
        assert_eq!(records[1].country.as_str(), "Singapore");
    }

    #[test]
    fn invalid_utf8_is_unrecognized() {
        let mut input = HEADER.as_bytes().to_vec();
        input.extend_from_slice(&[0xff, 0xfe]);
        match read_records(&input, None) {
            Err(ImportError::UnrecognizedFormat { byte_offset }) => {
                assert_eq!(byte_offset, HEADER.len());
            }
            other => panic!("expected UnrecognizedFormat, got {other:?}"),
        }
    }

    #[test]
    fn header_only_input_has_no_records() {
        let records = read_records(HEADER.as_bytes(), None).expect("read");
        assert!(records.is_empty());
    }

    #[test]
    fn corrupt_workbook_is_an_excel_read_error() {
        assert!(matches!(
            read_records(b"PK\x03\x04not really a zip", None),
            Err(ImportError::ExcelRead { .. })
        ));
    }
}
