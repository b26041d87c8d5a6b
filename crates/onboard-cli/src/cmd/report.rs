//! Implementation of `onboard report <file>`.
//!
//! Evaluates every record and writes the `Onboarding_Status` workbook. The
//! report path is printed to stdout and the summary to stderr. Failing
//! records are report content, so the command exits 0 once the workbook is
//! written.
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};
use onboard_core::{ClientRecord, ValidationOutcome};
use onboard_excel::{audit_timestamp, report_file_name, write_report};

use crate::cli::EvalSettings;
use crate::cmd::{emit_diagnostics, load_and_evaluate};
use crate::error::CliError;
use crate::format::FormatterConfig;
use crate::io::write_output;

/// Where the report goes.
#[derive(Debug, Clone, Copy)]
pub struct ReportTarget<'a> {
    /// Explicit output path; wins over `dir`.
    pub output: Option<&'a Path>,
    /// Directory for a timestamped file name.
    pub dir: &'a Path,
}

impl ReportTarget<'_> {
    /// Resolves the final report path for a run started at `now`.
    pub fn resolve(&self, now: NaiveDateTime) -> PathBuf {
        match self.output {
            Some(path) => path.to_path_buf(),
            None => self.dir.join(report_file_name(now)),
        }
    }
}

/// Runs the `report` command.
///
/// # Errors
///
/// - [`CliError::ParseFailed`]: the input is not a usable record set.
/// - [`CliError::ReportFailed`] or an I/O variant: the workbook could not be written.
pub fn run(
    bytes: &[u8],
    sheet: Option<&str>,
    target: ReportTarget<'_>,
    settings: &EvalSettings,
    fmt_config: &FormatterConfig,
) -> Result<(), CliError> {
    let stderr = std::io::stderr();
    let mut err_out = stderr.lock();
    let path = run_with(
        bytes,
        sheet,
        target,
        settings,
        fmt_config,
        Local::now().naive_local(),
        &mut err_out,
    )?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "{}", path.display()).map_err(|e| CliError::IoError {
        source: "stdout".to_owned(),
        detail: e.to_string(),
    })
}

fn run_with(
    bytes: &[u8],
    sheet: Option<&str>,
    target: ReportTarget<'_>,
    settings: &EvalSettings,
    fmt_config: &FormatterConfig,
    now: NaiveDateTime,
    err_out: &mut impl Write,
) -> Result<PathBuf, CliError> {
    let evaluated = load_and_evaluate(bytes, sheet, settings, fmt_config, err_out)?;

    let path = target.resolve(now);
    save_report(
        &path,
        &evaluated.records,
        &evaluated.outcomes,
        &audit_timestamp(now),
    )?;
    tracing::info!(path = %path.display(), rows = evaluated.records.len(), "report saved");

    emit_diagnostics(&evaluated, fmt_config, err_out)?;
    Ok(path)
}

/// Builds the workbook in memory, then writes it to `path` in one step.
///
/// Nothing is created at `path` unless the whole workbook was built.
fn save_report(
    path: &Path,
    records: &[ClientRecord],
    outcomes: &[ValidationOutcome],
    stamp: &str,
) -> Result<(), CliError> {
    let mut bytes = Vec::new();
    write_report(records, outcomes, stamp, &mut bytes)?;
    write_output(path, &bytes)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]
    #![allow(clippy::panic)]
    #![allow(clippy::wildcard_enum_match_arm)]

    use std::num::NonZeroUsize;

    use chrono::NaiveDate;
    use onboard_core::ValidationPolicy;

    use super::*;
    use crate::OutputFormat;

    const INPUT: &str = "Client_ID,Full_Name,DOB,Tax_ID,Email,Investment_Amount,Risk_Profile,Country\n\
                         101,Ananya Iyer,1990-05-20,ABCDE1234F,ananya.iyer@gmail.com,750000,High,India\n\
                         102,Kabir Shah,2016-01-01,MISSING,kabir@,100,Low,Singapore\n";

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 16)
            .and_then(|d| d.and_hms_opt(14, 3, 9))
            .expect("valid datetime")
    }

    fn settings() -> EvalSettings {
        EvalSettings {
            policy: ValidationPolicy::default(),
            as_of: now().date(),
            jobs: NonZeroUsize::MIN,
        }
    }

    fn fmt() -> FormatterConfig {
        FormatterConfig {
            mode: OutputFormat::Human,
            colors: false,
            quiet: false,
            verbose: false,
        }
    }

    #[test]
    fn explicit_output_wins_over_dir() {
        let target = ReportTarget {
            output: Some(Path::new("out/custom.xlsx")),
            dir: Path::new("processed_reports"),
        };
        assert_eq!(target.resolve(now()), PathBuf::from("out/custom.xlsx"));
    }

    #[test]
    fn default_name_is_timestamped_inside_dir() {
        let target = ReportTarget {
            output: None,
            dir: Path::new("processed_reports"),
        };
        assert_eq!(
            target.resolve(now()),
            PathBuf::from("processed_reports/SMA_Onboarding_Report_20261016_140309.xlsx")
        );
    }

    #[test]
    fn writes_report_into_new_directory_and_succeeds_despite_failures() {
        let dir = tempfile::tempdir().expect("temp dir");
        let report_dir = dir.path().join("processed_reports");
        let target = ReportTarget {
            output: None,
            dir: &report_dir,
        };
        let mut err_out = Vec::new();
        let path = run_with(
            INPUT.as_bytes(),
            None,
            target,
            &settings(),
            &fmt(),
            now(),
            &mut err_out,
        )
        .expect("report should be written");

        assert!(path.starts_with(&report_dir));
        let bytes = std::fs::read(&path).expect("read report");
        assert!(bytes.starts_with(b"PK\x03\x04"));

        let stderr = String::from_utf8(err_out).expect("utf-8");
        assert!(stderr.contains("2 records: 1 passed, 1 failed"), "{stderr}");
    }

    #[test]
    fn unreadable_input_writes_nothing() {
        let dir = tempfile::tempdir().expect("temp dir");
        let output = dir.path().join("report.xlsx");
        let target = ReportTarget {
            output: Some(&output),
            dir: dir.path(),
        };
        let result = run_with(
            b"",
            None,
            target,
            &settings(),
            &fmt(),
            now(),
            &mut Vec::new(),
        );
        match result {
            Err(CliError::ParseFailed { .. }) => {}
            other => panic!("expected ParseFailed, got {other:?}"),
        }
        assert!(!output.exists());
    }

    #[test]
    fn failed_export_creates_no_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let output = dir.path().join("processed_reports").join("report.xlsx");
        let records = vec![ClientRecord::default()];

        let result = save_report(&output, &records, &[], "2026-10-16 14:03:09");
        match result {
            Err(CliError::ReportFailed { .. }) => {}
            other => panic!("expected ReportFailed, got {other:?}"),
        }
        assert!(!output.exists());
    }

    #[test]
    fn failed_export_keeps_previous_report() {
        let dir = tempfile::tempdir().expect("temp dir");
        let output = dir.path().join("report.xlsx");
        std::fs::write(&output, b"previous report").expect("seed report");
        let records = vec![ClientRecord::default()];

        let result = save_report(&output, &records, &[], "2026-10-16 14:03:09");
        assert!(result.is_err());
        assert_eq!(
            std::fs::read(&output).expect("read back"),
            b"previous report"
        );
        let entries = std::fs::read_dir(dir.path()).expect("list dir").count();
        assert_eq!(entries, 1, "no staging file should remain");
    }
}
