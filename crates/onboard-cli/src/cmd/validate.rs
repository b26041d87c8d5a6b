//! Implementation of `onboard validate <file>`.
//!
//! Reads a client record set, runs the rule battery over every record, and
//! emits one diagnostic per failing record to stderr.
//!
//! Exit codes:
//! - 0 = every record passed
//! - 1 = at least one record failed
//! - 2 = the record set could not be read
use std::io::Write;

use crate::cli::EvalSettings;
use crate::cmd::{emit_diagnostics, load_and_evaluate};
use crate::error::CliError;
use crate::format::FormatterConfig;

// ---------------------------------------------------------------------------
// run
// ---------------------------------------------------------------------------

/// Runs the `validate` command, writing diagnostics to stderr.
///
/// # Errors
///
/// - [`CliError::ParseFailed`]: the input is not a usable record set.
/// - [`CliError::ValidationErrors`]: one or more records failed.
pub fn run(
    bytes: &[u8],
    sheet: Option<&str>,
    settings: &EvalSettings,
    fmt_config: &FormatterConfig,
) -> Result<(), CliError> {
    let stderr = std::io::stderr();
    let mut err_out = stderr.lock();
    run_with(bytes, sheet, settings, fmt_config, &mut err_out)
}

fn run_with(
    bytes: &[u8],
    sheet: Option<&str>,
    settings: &EvalSettings,
    fmt_config: &FormatterConfig,
    err_out: &mut impl Write,
) -> Result<(), CliError> {
    let evaluated = load_and_evaluate(bytes, sheet, settings, fmt_config, err_out)?;
    emit_diagnostics(&evaluated, fmt_config, err_out)?;

    if evaluated.summary.failed > 0 {
        Err(CliError::ValidationErrors {
            failed: evaluated.summary.failed,
            total: evaluated.summary.total,
        })
    } else {
        Ok(())
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

    use std::num::NonZeroUsize;

    use chrono::NaiveDate;
    use onboard_core::ValidationPolicy;

    use super::*;
    use crate::OutputFormat;

    const HEADER: &str =
        "Client_ID,Full_Name,DOB,Tax_ID,Email,Investment_Amount,Risk_Profile,Country\n";
    const GOOD_ROW: &str =
        "101,Ananya Iyer,1990-05-20,ABCDE1234F,ananya.iyer@gmail.com,750000,High,India\n";
    const BAD_ROW: &str = "102,Kabir Shah,2016-01-01,MISSING,kabir@,100,Low,Singapore\n";

    fn settings() -> EvalSettings {
        EvalSettings {
            policy: ValidationPolicy::default(),
            as_of: NaiveDate::from_ymd_opt(2026, 10, 16).expect("valid date"),
            jobs: NonZeroUsize::MIN,
        }
    }

    fn fmt(mode: OutputFormat) -> FormatterConfig {
        FormatterConfig {
            mode,
            colors: false,
            quiet: false,
            verbose: false,
        }
    }

    fn run_capture(input: &str, mode: OutputFormat) -> (Result<(), CliError>, String) {
        let mut out = Vec::new();
        let result = run_with(input.as_bytes(), None, &settings(), &fmt(mode), &mut out);
        (result, String::from_utf8(out).expect("utf-8"))
    }

    #[test]
    fn all_passing_is_ok() {
        let (result, out) = run_capture(&format!("{HEADER}{GOOD_ROW}"), OutputFormat::Human);
        assert!(result.is_ok());
        assert_eq!(out, "1 record: 1 passed, 0 failed\n");
    }

    #[test]
    fn failing_record_is_reported_and_exits_1() {
        let (result, out) =
            run_capture(&format!("{HEADER}{GOOD_ROW}{BAD_ROW}"), OutputFormat::Human);
        match result {
            Err(e @ CliError::ValidationErrors { .. }) => assert_eq!(e.exit_code(), 1),
            other => panic!("expected ValidationErrors, got {other:?}"),
        }
        assert!(
            out.contains(
                "[FAIL] 102 Kabir Shah: Minor (Age: 10); Missing Tax ID; Invalid Email; Below Min (₹100)"
            ),
            "{out}"
        );
        assert!(out.contains("2 records: 1 passed, 1 failed"), "{out}");
    }

    #[test]
    fn json_mode_emits_ndjson() {
        let (_, out) = run_capture(&format!("{HEADER}{BAD_ROW}"), OutputFormat::Json);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        for line in &lines {
            serde_json::from_str::<serde_json::Value>(line).expect("each line is JSON");
        }
    }

    #[test]
    fn structural_problem_is_parse_failure() {
        let (result, _) = run_capture("Client_ID,Full_Name\n1,x\n", OutputFormat::Human);
        match result {
            Err(e @ CliError::ParseFailed { .. }) => assert_eq!(e.exit_code(), 2),
            other => panic!("expected ParseFailed, got {other:?}"),
        }
    }
}
