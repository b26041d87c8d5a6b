/// Record diagnostics: human-readable and JSON (NDJSON) modes.
///
/// - **Human mode** (default): one line per failing record, with a colored
///   status tag, to stderr. Colors are disabled when `--no-color` is set, the
///   `NO_COLOR` environment variable is present (per <https://no-color.org>),
///   or stderr is not a TTY.
/// - **JSON mode**: each record diagnostic is one JSON object per line.
///
/// Failing records are always written. `--quiet` drops the summary;
/// `--verbose` adds passing records and timing.
use std::io::{IsTerminal as _, Write};
use std::time::Duration;

use onboard_core::{BatchSummary, ClientRecord, ValidationOutcome};

use crate::OutputFormat;

// ---------------------------------------------------------------------------
// Color support detection
// ---------------------------------------------------------------------------

/// Returns `true` if ANSI color codes should be emitted to stderr.
pub fn colors_enabled(no_color_flag: bool) -> bool {
    if no_color_flag {
        return false;
    }
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    std::io::stderr().is_terminal()
}

const ANSI_RED: &str = "\x1b[31m";
const ANSI_GREEN: &str = "\x1b[32m";
const ANSI_RESET: &str = "\x1b[0m";

// ---------------------------------------------------------------------------
// FormatterConfig
// ---------------------------------------------------------------------------

/// Configuration for the diagnostic formatter, derived from CLI flags.
#[derive(Debug, Clone, Copy)]
pub struct FormatterConfig {
    /// Human or NDJSON output.
    pub mode: OutputFormat,
    /// Whether ANSI colors are enabled.
    pub colors: bool,
    /// Suppress the summary line.
    pub quiet: bool,
    /// Also report passing records and timing.
    pub verbose: bool,
}

impl FormatterConfig {
    /// Constructs a [`FormatterConfig`] from the raw CLI flags.
    pub fn from_flags(mode: OutputFormat, no_color_flag: bool, quiet: bool, verbose: bool) -> Self {
        Self {
            mode,
            colors: colors_enabled(no_color_flag),
            quiet,
            verbose,
        }
    }
}

// ---------------------------------------------------------------------------
// Per-record diagnostics
// ---------------------------------------------------------------------------

/// Writes the diagnostic for one record, if the configuration calls for one.
///
/// Human format: `[FAIL] 102 Kabir Shah: Invalid DOB; Missing Tax ID`
///
/// JSON format:
/// `{"client_id":102,"full_name":"Kabir Shah","status":"FAIL","message":"...","findings":[...]}`
///
/// # Errors
///
/// Returns an error only if writing to `writer` fails.
pub fn write_outcome<W: Write>(
    writer: &mut W,
    record: &ClientRecord,
    outcome: &ValidationOutcome,
    config: &FormatterConfig,
) -> std::io::Result<()> {
    if outcome.is_pass() && !config.verbose {
        return Ok(());
    }
    match config.mode {
        OutputFormat::Human => write_outcome_human(writer, record, outcome, config),
        OutputFormat::Json => write_outcome_json(writer, record, outcome),
    }
}

fn write_outcome_human<W: Write>(
    writer: &mut W,
    record: &ClientRecord,
    outcome: &ValidationOutcome,
    config: &FormatterConfig,
) -> std::io::Result<()> {
    let tag = format!("[{}]", outcome.status().as_str());
    let name = if record.full_name.is_empty() {
        String::new()
    } else {
        format!(" {}", record.full_name)
    };

    if config.colors {
        let color = if outcome.is_pass() { ANSI_GREEN } else { ANSI_RED };
        writeln!(
            writer,
            "{color}{tag}{ANSI_RESET} {id}{name}: {message}",
            id = record.client_id,
            message = outcome.message(),
        )
    } else {
        writeln!(
            writer,
            "{tag} {id}{name}: {message}",
            id = record.client_id,
            message = outcome.message(),
        )
    }
}

fn write_outcome_json<W: Write>(
    writer: &mut W,
    record: &ClientRecord,
    outcome: &ValidationOutcome,
) -> std::io::Result<()> {
    let line = serde_json::json!({
        "client_id": record.client_id,
        "full_name": record.full_name,
        "status": outcome.status().as_str(),
        "message": outcome.message(),
        "findings": outcome.findings(),
    });
    writeln!(writer, "{line}")
}

// ---------------------------------------------------------------------------
// Summary and timing
// ---------------------------------------------------------------------------

/// Writes the batch summary.
///
/// Human format: `3 records: 1 passed, 2 failed`
///
/// JSON format: `{"summary":{"total":3,"passed":1,"failed":2}}`
///
/// Suppressed in quiet mode.
///
/// # Errors
///
/// Returns an error only if writing to `writer` fails.
pub fn write_summary<W: Write>(
    writer: &mut W,
    summary: &BatchSummary,
    config: &FormatterConfig,
) -> std::io::Result<()> {
    if config.quiet {
        return Ok(());
    }
    match config.mode {
        OutputFormat::Human => writeln!(
            writer,
            "{} {}: {} passed, {} failed",
            summary.total,
            pluralize(summary.total, "record", "records"),
            summary.passed,
            summary.failed,
        ),
        OutputFormat::Json => {
            let line = serde_json::json!({ "summary": summary });
            writeln!(writer, "{line}")
        }
    }
}

/// Writes timing information in verbose human mode.
///
/// # Errors
///
/// Returns an error only if writing to `writer` fails.
pub fn write_timing<W: Write>(
    writer: &mut W,
    label: &str,
    duration: Duration,
    config: &FormatterConfig,
) -> std::io::Result<()> {
    match config.mode {
        OutputFormat::Human if config.verbose => {
            writeln!(writer, "{label} in {}ms", duration.as_millis())
        }
        OutputFormat::Human | OutputFormat::Json => Ok(()),
    }
}

fn pluralize<'a>(count: usize, singular: &'a str, plural: &'a str) -> &'a str {
    if count == 1 { singular } else { plural }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
