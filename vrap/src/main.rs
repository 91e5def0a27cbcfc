mod commands;
mod ops;
mod reports;
mod target;

use std::process::ExitCode;

use clap::Parser;
use eyre::Result;
use tracing_subscriber::{filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::commands::Cli;

/// Initialize logging to stderr.
///
/// Verbosity levels:
/// - 0 (default): warnings and errors
/// - 1 (-v): generation lifecycle
/// - 2 (-vv): every unit
/// - 3+ (-vvv): everything, with file and line numbers
///
/// `RUST_LOG` replaces the filter entirely.
fn init_tracing(verbose: u8) {
    let base_filter = match std::env::var("RUST_LOG") {
        Ok(filter) => filter,
        Err(_) => match verbose {
            0 => "warn".to_string(),
            1 => "warn,vrap=info,vrap_codegen=info,vrap_core=info".to_string(),
            2 => "info,vrap=debug,vrap_codegen=debug,vrap_core=debug".to_string(),
            _ => "debug,vrap=trace,vrap_codegen=trace,vrap_core=trace".to_string(),
        },
    };

    let filter = EnvFilter::try_new(&base_filter).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(verbose >= 2)
                .with_level(true)
                .with_file(verbose >= 3)
                .with_line_number(verbose >= 3)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}

fn main() -> Result<ExitCode> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_tracing(cli.verbose);
    cli.run()
}
