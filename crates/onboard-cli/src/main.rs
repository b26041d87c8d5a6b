use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod cmd;
mod error;
mod format;
mod io;

pub use cli::{Cli, Command, OutputFormat, PathOrStdin};

use cmd::report::ReportTarget;
use error::CliError;
use format::FormatterConfig;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.quiet, cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("{}", e.message());
        std::process::exit(e.exit_code());
    }
}

/// Installs the stderr log subscriber. `RUST_LOG` overrides the flag-derived level.
fn init_tracing(quiet: bool, verbose: bool) {
    let default_level = if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_level.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let settings = cli.policy.resolve()?;
    let fmt_config = FormatterConfig::from_flags(cli.format, cli.no_color, cli.quiet, cli.verbose);

    match &cli.command {
        Command::Validate { file, sheet } => {
            let bytes = io::read_input(file, cli.max_file_size)?;
            cmd::validate::run(&bytes, sheet.as_deref(), &settings, &fmt_config)
        }
        Command::Report {
            file,
            sheet,
            output,
            report_dir,
        } => {
            let bytes = io::read_input(file, cli.max_file_size)?;
            let target = ReportTarget {
                output: output.as_deref(),
                dir: report_dir,
            };
            cmd::report::run(&bytes, sheet.as_deref(), target, &settings, &fmt_config)
        }
        Command::Rules => cmd::rules::run(&settings, cli.format),
    }
}
