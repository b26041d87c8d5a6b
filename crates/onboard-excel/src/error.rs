/// Errors produced while reading a record set or writing a report.
///
/// Every variant is structural: it describes a source or sink the run cannot
/// use at all. Malformed field values inside an otherwise well-shaped row are
/// never errors here; they reach the validation engine as raw text.

/// All error conditions that can occur while importing a record set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImportError {
    /// The input contains no header row.
    #[error("input is empty: expected a header row")]
    EmptyInput,

    /// The input is neither an xlsx workbook nor UTF-8 text.
    #[error("unrecognized input: not an xlsx workbook and not UTF-8 text (invalid byte at offset {byte_offset})")]
    UnrecognizedFormat {
        /// Offset of the first byte that is not valid UTF-8.
        byte_offset: usize,
    },

    /// The requested worksheet does not exist in the workbook.
    #[error("missing sheet: {sheet:?}")]
    MissingSheet {
        /// Name of the requested sheet.
        sheet: String,
    },

    /// A required column header is missing.
    #[error("missing required column {column:?} in {source_name}")]
    MissingColumn {
        /// `"csv"` or the worksheet name.
        source_name: String,
        /// Name of the missing column.
        column: String,
    },

    /// A data row has more cells than the header declares.
    #[error("{location}: row has {got} fields but the header has {expected}")]
    RaggedRow {
        /// Where the row starts.
        location: String,
        /// Number of header columns.
        expected: usize,
        /// Number of fields found.
        got: usize,
    },

    /// A quoted CSV field was never closed.
    #[error("{location}: unterminated quoted field")]
    UnterminatedQuote {
        /// Where the field starts.
        location: String,
    },

    /// A cell that must hold a specific kind of value does not.
    #[error("{cell_ref}: expected {expected}, got {got:?}")]
    InvalidCell {
        /// Cell reference (`Sheet!B7` or `line 7, column Client_ID`).
        cell_ref: String,
        /// Human-readable description of the expected value.
        expected: String,
        /// The raw value that was rejected.
        got: String,
    },

    /// Two rows share a client identifier.
    #[error("{cell_ref}: duplicate client id {client_id} (first seen at {first_ref})")]
    DuplicateClientId {
        /// Where the repeat occurs.
        cell_ref: String,
        /// Where the identifier first appeared.
        first_ref: String,
        /// The repeated identifier.
        client_id: i64,
    },

    /// An error from the calamine workbook reader.
    #[error("Excel read error: {detail}")]
    ExcelRead {
        /// Human-readable description of the error.
        detail: String,
    },
}

/// All error conditions that can occur while writing a report.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExportError {
    /// Records and outcomes are not aligned 1:1.
    #[error("report rows misaligned: {records} records but {outcomes} outcomes")]
    LengthMismatch {
        /// Number of records supplied.
        records: usize,
        /// Number of outcomes supplied.
        outcomes: usize,
    },

    /// An error from the xlsx writer.
    #[error("Excel write error: {detail}")]
    ExcelWrite {
        /// Human-readable description of the error.
        detail: String,
    },

    /// Writing the finished workbook bytes failed.
    #[error("I/O error: {detail}")]
    Io {
        /// Human-readable description of the error.
        detail: String,
    },
}
