/// CLI error types with associated exit codes.
///
/// [`CliError`] is the top-level error type for the `onboard` binary. Every
/// variant maps to a stable exit code (1 or 2) via [`CliError::exit_code`]:
///
/// - Exit code **2**: input failure. The tool could not read or parse the
///   record set at all, or could not write the report.
/// - Exit code **1**: logical failure. The run completed but at least one
///   record failed validation, or an argument was rejected.
use std::fmt;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// CliError
// ---------------------------------------------------------------------------

/// All error conditions that the `onboard` CLI can produce.
#[derive(Debug)]
pub enum CliError {
    // --- Exit code 2: input failures ---
    /// A file argument could not be found on the filesystem.
    FileNotFound {
        /// The path that was not found.
        path: PathBuf,
    },

    /// The process lacks permission to read or write a file.
    PermissionDenied {
        /// The path that could not be accessed.
        path: PathBuf,
    },

    /// The input exceeds the configured `--max-file-size` limit.
    FileTooLarge {
        /// `"-"` for stdin, or the filesystem path.
        source: String,
        /// The configured size limit in bytes.
        limit: u64,
        /// The actual size in bytes; `None` for stdin.
        actual: Option<u64>,
    },

    /// An I/O error occurred while reading from stdin.
    StdinReadError {
        /// The underlying I/O error message.
        detail: String,
    },

    /// A generic I/O error not covered by the more specific variants above.
    IoError {
        /// A human-readable label for the source or destination.
        source: String,
        /// The underlying I/O error message.
        detail: String,
    },

    /// The record set could not be parsed into client records.
    ParseFailed {
        /// Description including the offending location.
        detail: String,
    },

    /// The report workbook could not be produced.
    ReportFailed {
        /// Description of the write failure.
        detail: String,
    },

    // --- Exit code 1: logical failures ---
    /// A flag value was accepted by the parser but rejected as policy.
    InvalidArgument {
        /// Why the value was rejected.
        detail: String,
    },

    /// One or more records failed validation.
    ///
    /// The diagnostics have already been printed; this variant exists so
    /// `main` can exit with code 1 cleanly.
    ValidationErrors {
        /// Records with status FAIL.
        failed: usize,
        /// Records evaluated.
        total: usize,
    },
}

impl CliError {
    /// Returns the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::FileNotFound { .. }
            | Self::PermissionDenied { .. }
            | Self::FileTooLarge { .. }
            | Self::StdinReadError { .. }
            | Self::IoError { .. }
            | Self::ParseFailed { .. }
            | Self::ReportFailed { .. } => 2,

            Self::InvalidArgument { .. } | Self::ValidationErrors { .. } => 1,
        }
    }

    /// Returns a human-readable error message suitable for printing to stderr.
    pub fn message(&self) -> String {
        match self {
            Self::FileNotFound { path } => {
                format!("error: file not found: {}", path.display())
            }
            Self::PermissionDenied { path } => {
                format!("error: permission denied: {}", path.display())
            }
            Self::FileTooLarge {
                source,
                limit,
                actual: Some(actual),
            } => {
                format!("error: file too large: {source} is {actual} bytes, limit is {limit} bytes")
            }
            Self::FileTooLarge {
                source,
                limit,
                actual: None,
            } => {
                format!("error: file too large: {source} exceeded limit of {limit} bytes")
            }
            Self::StdinReadError { detail } => {
                format!("error: failed to read stdin: {detail}")
            }
            Self::IoError { source, detail } => {
                format!("error: I/O error on {source}: {detail}")
            }
            Self::ParseFailed { detail } => format!("error: cannot read records: {detail}"),
            Self::ReportFailed { detail } => format!("error: cannot write report: {detail}"),
            Self::InvalidArgument { detail } => format!("error: invalid argument: {detail}"),
            Self::ValidationErrors { failed, total } => {
                format!("error: {failed} of {total} records failed validation")
            }
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl std::error::Error for CliError {}

impl From<onboard_excel::ImportError> for CliError {
    fn from(e: onboard_excel::ImportError) -> Self {
        Self::ParseFailed {
            detail: e.to_string(),
        }
    }
}

impl From<onboard_excel::ExportError> for CliError {
    fn from(e: onboard_excel::ExportError) -> Self {
        Self::ReportFailed {
            detail: e.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
