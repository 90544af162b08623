use anyhow::Result;
use clap::Parser;
use exam_assembly::cli::{Cli, Commands};
use exam_assembly::commands::{run_assemble, run_check_config, AssembleConfig};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.command.verbosity());

    match cli.command {
        Commands::Assemble {
            catalog,
            exams,
            config,
            seed,
            output,
            verbosity: _,
        } => run_assemble(AssembleConfig {
            catalog,
            exams,
            config,
            seed,
            output,
        }),
        Commands::CheckConfig { config } => run_check_config(config.as_deref()),
    }
}

// RUST_LOG wins over -v; log records from the config loader are bridged by the
// subscriber's tracing-log integration.
fn init_tracing(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
