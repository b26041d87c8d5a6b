//! Clap CLI definition: root struct, subcommands, and shared argument types.
use std::num::NonZeroUsize;
use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand, ValueEnum};
use onboard_core::ValidationPolicy;

use crate::error::CliError;

/// A CLI argument that is either a filesystem path or the stdin sentinel `"-"`.
///
/// Parsing `"-"` yields [`PathOrStdin::Stdin`]; anything else yields
/// [`PathOrStdin::Path`].
#[derive(Clone, Debug)]
pub enum PathOrStdin {
    /// Read from standard input.
    Stdin,
    /// Read from the given filesystem path.
    Path(PathBuf),
}

impl std::str::FromStr for PathOrStdin {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "-" {
            Ok(PathOrStdin::Stdin)
        } else {
            Ok(PathOrStdin::Path(PathBuf::from(s)))
        }
    }
}

impl std::fmt::Display for PathOrStdin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stdin => f.write_str("-"),
            Self::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Output format for CLI commands.
///
/// `Human` emits colored lines to stderr. `Json` emits NDJSON.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable, optionally colored output (default).
    Human,
    /// Structured NDJSON output.
    Json,
}

/// All top-level subcommands exposed by the `onboard` binary.
#[derive(Subcommand)]
pub enum Command {
    /// Validate a client record set and report failing records.
    Validate {
        /// Path to a .csv or .xlsx file, or `-` for stdin.
        #[arg(value_name = "FILE")]
        file: PathOrStdin,
        /// Worksheet to read from an .xlsx input (default: the first sheet).
        #[arg(long, value_name = "NAME")]
        sheet: Option<String>,
    },

    /// Validate a client record set and write the onboarding status workbook.
    Report {
        /// Path to a .csv or .xlsx file, or `-` for stdin.
        #[arg(value_name = "FILE")]
        file: PathOrStdin,
        /// Worksheet to read from an .xlsx input (default: the first sheet).
        #[arg(long, value_name = "NAME")]
        sheet: Option<String>,
        /// Exact path of the report to write (overrides --report-dir).
        #[arg(long, short = 'o', value_name = "PATH")]
        output: Option<PathBuf>,
        /// Directory for timestamped reports; created if missing.
        #[arg(long, value_name = "DIR", default_value = onboard_excel::DEFAULT_REPORT_DIR)]
        report_dir: PathBuf,
    },

    /// List the validation rules with the active thresholds.
    Rules,
}

/// Thresholds and evaluation settings shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct PolicyArgs {
    /// Minimum investment amount.
    #[arg(
        long,
        global = true,
        env = "ONBOARD_MIN_INVESTMENT",
        default_value_t = onboard_core::DEFAULT_MIN_INVESTMENT
    )]
    pub min_investment: f64,

    /// Minimum client age in whole years.
    #[arg(
        long,
        global = true,
        env = "ONBOARD_MIN_AGE",
        default_value_t = onboard_core::DEFAULT_MIN_AGE,
        allow_negative_numbers = true
    )]
    pub min_age: i32,

    /// Required tax identifier length in characters.
    #[arg(
        long,
        global = true,
        env = "ONBOARD_TAX_ID_LENGTH",
        default_value_t = onboard_core::DEFAULT_TAX_ID_LENGTH
    )]
    pub tax_id_length: usize,

    /// Currency symbol used in below-minimum messages.
    #[arg(
        long,
        global = true,
        env = "ONBOARD_CURRENCY_SYMBOL",
        default_value = onboard_core::DEFAULT_CURRENCY_SYMBOL
    )]
    pub currency_symbol: String,

    /// Evaluation date (YYYY-MM-DD) ages are computed against (default: today).
    #[arg(long, global = true, value_name = "DATE")]
    pub as_of: Option<NaiveDate>,

    /// Number of worker threads used to evaluate records.
    #[arg(long, short = 'j', global = true, env = "ONBOARD_JOBS", default_value = "1")]
    pub jobs: NonZeroUsize,
}

/// Evaluation settings resolved from [`PolicyArgs`].
#[derive(Debug, Clone)]
pub struct EvalSettings {
    /// Validated thresholds.
    pub policy: ValidationPolicy,
    /// The date ages are computed against.
    pub as_of: NaiveDate,
    /// Worker thread count.
    pub jobs: NonZeroUsize,
}

impl PolicyArgs {
    /// Validates the thresholds and fills in today's date when `--as-of` is absent.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::InvalidArgument`] when the thresholds are rejected.
    pub fn resolve(&self) -> Result<EvalSettings, CliError> {
        let policy = ValidationPolicy::new(
            self.min_investment,
            self.tax_id_length,
            self.min_age,
            self.currency_symbol.clone(),
        )
        .map_err(|e| CliError::InvalidArgument {
            detail: e.to_string(),
        })?;
        Ok(EvalSettings {
            policy,
            as_of: self.as_of.unwrap_or_else(|| Local::now().date_naive()),
            jobs: self.jobs,
        })
    }
}

/// Root CLI struct for the `onboard` binary.
///
/// All global flags are defined here and marked `global = true` so that clap
/// propagates them to every subcommand.
#[derive(Parser)]
#[command(
    name = "onboard",
    version,
    about = "Client onboarding validator",
    long_about = "Validates client onboarding records against the investment eligibility\n\
                  rules (age, tax identifier, email, minimum investment) and writes\n\
                  an onboarding status report."
)]
pub struct Cli {
    /// Active subcommand.
    #[command(subcommand)]
    pub command: Command,

    /// Output format: human (default) or json.
    #[arg(long, short = 'f', default_value = "human", global = true)]
    pub format: OutputFormat,

    /// Suppress all stderr output except errors and failing records
    /// (incompatible with `--verbose`).
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Increase stderr verbosity: passing records, timing, debug logs
    /// (incompatible with `--quiet`).
    #[arg(long, short = 'v', global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Maximum input file size in bytes.
    ///
    /// Can also be set via the `ONBOARD_MAX_FILE_SIZE` environment variable.
    /// Default: 268435456 (256 MB).
    #[arg(
        long,
        global = true,
        env = "ONBOARD_MAX_FILE_SIZE",
        default_value = "268435456"
    )]
    pub max_file_size: u64,

    /// Disable ANSI color codes in human output.
    ///
    /// Also respects the `NO_COLOR` environment variable per
    /// <https://no-color.org>.
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    #[command(flatten)]
    pub policy: PolicyArgs,
}
