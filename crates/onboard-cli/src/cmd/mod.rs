/// Command modules for the `onboard` CLI.
///
/// Each submodule implements one subcommand. The `run` function in each
/// module takes the parsed arguments and returns `Ok(())` on success or
/// a [`crate::error::CliError`] on failure.
pub mod report;
pub mod rules;
pub mod validate;

use std::io::Write;
use std::time::Instant;

use onboard_core::{BatchSummary, ClientRecord, ValidationOutcome, Validator, evaluate_batch};

use crate::cli::EvalSettings;
use crate::error::CliError;
use crate::format::{FormatterConfig, write_outcome, write_summary, write_timing};

/// A record set and its outcomes, aligned by index.
pub struct Evaluated {
    /// Records in input order.
    pub records: Vec<ClientRecord>,
    /// `outcomes[i]` is the verdict for `records[i]`.
    pub outcomes: Vec<ValidationOutcome>,
    /// Pass/fail tallies.
    pub summary: BatchSummary,
}

/// Parses `bytes` into records and evaluates the whole batch.
///
/// # Errors
///
/// Returns [`CliError::ParseFailed`] when the input is structurally unusable.
pub fn load_and_evaluate(
    bytes: &[u8],
    sheet: Option<&str>,
    settings: &EvalSettings,
    fmt_config: &FormatterConfig,
    err_out: &mut impl Write,
) -> Result<Evaluated, CliError> {
    let started = Instant::now();
    let records = onboard_excel::read_records(bytes, sheet)?;

    let validator = Validator::new(settings.policy.clone());
    let outcomes = evaluate_batch(&validator, &records, settings.as_of, settings.jobs);
    let summary = BatchSummary::from_outcomes(&outcomes);

    write_timing(err_out, "evaluated", started.elapsed(), fmt_config).map_err(stderr_error)?;
    tracing::info!(
        total = summary.total,
        failed = summary.failed,
        as_of = %settings.as_of,
        "record set evaluated"
    );

    Ok(Evaluated {
        records,
        outcomes,
        summary,
    })
}

/// Writes per-record diagnostics followed by the summary.
///
/// # Errors
///
/// Returns [`CliError::IoError`] if stderr cannot be written.
pub fn emit_diagnostics(
    evaluated: &Evaluated,
    fmt_config: &FormatterConfig,
    err_out: &mut impl Write,
) -> Result<(), CliError> {
    for (record, outcome) in evaluated.records.iter().zip(&evaluated.outcomes) {
        write_outcome(err_out, record, outcome, fmt_config).map_err(stderr_error)?;
    }
    write_summary(err_out, &evaluated.summary, fmt_config).map_err(stderr_error)
}

fn stderr_error(e: std::io::Error) -> CliError {
    CliError::IoError {
        source: "stderr".to_owned(),
        detail: e.to_string(),
    }
}
