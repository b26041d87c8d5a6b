//! Implementation of `onboard rules`.
//!
//! Prints the rule battery in the order findings appear in a FAIL message,
//! each with its PASS condition under the active thresholds.
use std::io::Write;

use onboard_core::Validator;

use crate::OutputFormat;
use crate::cli::EvalSettings;
use crate::error::CliError;

/// Runs the `rules` command, writing the battery to stdout.
///
/// # Errors
///
/// Returns [`CliError::IoError`] if stdout cannot be written.
pub fn run(settings: &EvalSettings, mode: OutputFormat) -> Result<(), CliError> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    write_rules(&mut out, settings, mode).map_err(|e| CliError::IoError {
        source: "stdout".to_owned(),
        detail: e.to_string(),
    })
}

fn write_rules<W: Write>(
    out: &mut W,
    settings: &EvalSettings,
    mode: OutputFormat,
) -> std::io::Result<()> {
    let validator = Validator::new(settings.policy.clone());
    let policy = validator.policy();
    match mode {
        OutputFormat::Human => {
            writeln!(out, "Rules (evaluated as of {}):", settings.as_of)?;
            for (n, rule) in validator.rules().iter().enumerate() {
                writeln!(
                    out,
                    "  {}. {:<20} {}",
                    n + 1,
                    rule.id().code(),
                    rule.describe(policy)
                )?;
            }
            Ok(())
        }
        OutputFormat::Json => {
            for rule in validator.rules() {
                let line = serde_json::json!({
                    "rule_id": rule.id(),
                    "description": rule.describe(policy),
                });
                writeln!(out, "{line}")?;
            }
            let line = serde_json::json!({
                "policy": policy,
                "as_of": settings.as_of.to_string(),
            });
            writeln!(out, "{line}")
        }
    }
}
