/// File and stdin I/O with size enforcement.
///
/// This module is the single place the `onboard` binary touches the
/// filesystem. Neither `onboard-core` nor `onboard-excel` open files.
///
/// - Disk files: size checked via `std::fs::metadata` before any read.
/// - Stdin: buffered with a `Read::take` cap so allocation is bounded.
/// - Input is returned as raw bytes; `.xlsx` workbooks are binary.
/// - Output is staged in a sibling temporary file and renamed into place.
/// - All I/O errors are converted to [`CliError`] variants with exit code 2.
use std::io::{Read as _, Write as _};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::PathOrStdin;
use crate::error::CliError;

// ---------------------------------------------------------------------------
// Reading
// ---------------------------------------------------------------------------

/// Reads the entire contents of `source`.
///
/// # Errors
///
/// Returns [`CliError`] (exit code 2) for:
/// - file not found
/// - permission denied
/// - file or stdin stream exceeds `max_size`
/// - any other I/O error
pub fn read_input(source: &PathOrStdin, max_size: u64) -> Result<Vec<u8>, CliError> {
    let bytes = match source {
        PathOrStdin::Path(path) => read_file(path, max_size)?,
        PathOrStdin::Stdin => read_stdin(max_size)?,
    };
    tracing::debug!(source = %source, bytes = bytes.len(), "input read");
    Ok(bytes)
}

fn read_file(path: &Path, max_size: u64) -> Result<Vec<u8>, CliError> {
    let file_size = std::fs::metadata(path)
        .map_err(|e| io_error_to_cli(&e, path))?
        .len();

    if file_size > max_size {
        return Err(CliError::FileTooLarge {
            source: path.display().to_string(),
            limit: max_size,
            actual: Some(file_size),
        });
    }

    std::fs::read(path).map_err(|e| io_error_to_cli(&e, path))
}

/// Reads the entire stdin stream, capped at `max_size` bytes.
///
/// A stream of exactly `max_size` bytes gets one extra probe read to tell
/// "at the limit" from "over the limit".
fn read_stdin(max_size: u64) -> Result<Vec<u8>, CliError> {
    let stdin = std::io::stdin();
    let mut handle = stdin.lock();

    let mut buf: Vec<u8> = Vec::new();
    (&mut handle)
        .take(max_size)
        .read_to_end(&mut buf)
        .map_err(|e| CliError::StdinReadError {
            detail: e.to_string(),
        })?;

    if buf.len() as u64 == max_size {
        let mut probe = [0u8; 1];
        let extra = handle
            .read(&mut probe)
            .map_err(|e| CliError::StdinReadError {
                detail: e.to_string(),
            })?;
        if extra > 0 {
            return Err(CliError::FileTooLarge {
                source: "-".to_owned(),
                limit: max_size,
                actual: None,
            });
        }
    }

    Ok(buf)
}

// ---------------------------------------------------------------------------
// Writing
// ---------------------------------------------------------------------------

/// Writes `bytes` to `path`, creating its parent directory first.
///
/// The bytes go to a temporary file in the same directory, which is then
/// renamed over `path`. A failed write leaves `path` untouched.
///
/// # Errors
///
/// Returns [`CliError`] (exit code 2) when the directory, the temporary file,
/// or the final rename fails.
pub fn write_output(path: &Path, bytes: &[u8]) -> Result<(), CliError> {
    let dir = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => {
            std::fs::create_dir_all(parent).map_err(|e| io_error_to_cli(&e, parent))?;
            parent
        }
        None => Path::new("."),
    };

    let mut staged = NamedTempFile::new_in(dir).map_err(|e| io_error_to_cli(&e, dir))?;
    staged
        .write_all(bytes)
        .and_then(|()| staged.as_file().sync_all())
        .map_err(|e| io_error_to_cli(&e, path))?;
    staged
        .persist(path)
        .map_err(|e| io_error_to_cli(&e.error, path))?;

    tracing::debug!(path = %path.display(), bytes = bytes.len(), "output written");
    Ok(())
}

/// Maps a `std::io::Error` arising from a disk-file operation to a [`CliError`].
#[allow(clippy::wildcard_enum_match_arm)]
fn io_error_to_cli(e: &std::io::Error, path: &Path) -> CliError {
    match e.kind() {
        std::io::ErrorKind::NotFound => CliError::FileNotFound {
            path: path.to_path_buf(),
        },
        std::io::ErrorKind::PermissionDenied => CliError::PermissionDenied {
            path: path.to_path_buf(),
        },
        _ => CliError::IoError {
            source: path.display().to_string(),
            detail: e.to_string(),
        },
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]
    #![allow(clippy::panic)]
    #![allow(clippy::wildcard_enum_match_arm)]

    use std::io::Write as _;

    use super::*;

    // ── helpers ──────────────────────────────────────────────────────────────

    /// Creates a named temporary file with the given contents.
    fn temp_file_with(contents: &[u8]) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().expect("create temp file");
        f.write_all(contents).expect("write temp file");
        f
    }

    // ── reading ──────────────────────────────────────────────────────────────

    #[test]
    fn read_file_returns_raw_bytes() {
        let content = b"PK\x03\x04\xff\x00binary";
        let f = temp_file_with(content);
        let source = PathOrStdin::Path(f.path().to_path_buf());
        let result = read_input(&source, 1024).expect("should read file");
        assert_eq!(result, content);
    }

    #[test]
    fn read_file_exactly_at_limit_succeeds() {
        let f = temp_file_with(b"hello");
        let source = PathOrStdin::Path(f.path().to_path_buf());
        assert_eq!(read_input(&source, 5).expect("at limit"), b"hello");
    }

    #[test]
    fn read_file_over_limit_reports_actual_size() {
        let f = temp_file_with(b"hello world");
        let source = PathOrStdin::Path(f.path().to_path_buf());
        match read_input(&source, 4) {
            Err(CliError::FileTooLarge {
                actual: Some(n), ..
            }) => assert_eq!(n, 11),
            other => panic!("expected FileTooLarge, got {other:?}"),
        }
    }

    #[test]
    fn read_nonexistent_file_returns_file_not_found() {
        let source = PathOrStdin::Path(PathBuf::from("/no/such/file/ever.csv"));
        let err = read_input(&source, 1024).expect_err("should fail");
        assert_eq!(err.exit_code(), 2);
        assert!(matches!(err, CliError::FileNotFound { .. }));
    }

    // ── writing ──────────────────────────────────────────────────────────────

    #[test]
    fn write_output_makes_missing_directories() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("processed_reports").join("report.xlsx");
        write_output(&path, b"PK\x03\x04").expect("write output");
        assert_eq!(std::fs::read(&path).expect("read back"), b"PK\x03\x04");
    }

    #[test]
    fn write_output_replaces_existing_file_without_leftovers() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("report.xlsx");
        std::fs::write(&path, b"old report").expect("seed file");

        write_output(&path, b"new").expect("write output");

        assert_eq!(std::fs::read(&path).expect("read back"), b"new");
        let entries = std::fs::read_dir(dir.path()).expect("list dir").count();
        assert_eq!(entries, 1, "no staging file should remain");
    }

    #[test]
    fn write_output_into_missing_parent_that_is_a_file_fails() {
        let dir = tempfile::tempdir().expect("temp dir");
        let blocker = dir.path().join("not_a_dir");
        std::fs::write(&blocker, b"x").expect("seed file");
        let path = blocker.join("report.xlsx");

        let err = write_output(&path, b"bytes").expect_err("should fail");
        assert_eq!(err.exit_code(), 2);
        assert!(!path.exists());
    }
}
