use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "exam-assembly")]
#[command(about = "Assemble test segments and seed field-test items", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Assemble segments for every exam in a batch
    Assemble {
        /// JSON catalog with assessments, accommodations and field-test history
        #[arg(long)]
        catalog: PathBuf,

        /// JSON array of exams to assemble
        #[arg(long)]
        exams: PathBuf,

        /// Configuration file (defaults to the nearest .exam-assembly.toml)
        #[arg(short, long, env = "EXAM_ASSEMBLY_CONFIG")]
        config: Option<PathBuf>,

        /// Seed for reproducible field-test positions
        #[arg(long)]
        seed: Option<u64>,

        /// Output file for the manifests (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Increase verbosity level (can be repeated: -v, -vv, -vvv)
        /// -v: Show per-exam summaries
        /// -vv: Show per-segment decisions
        /// -vvv: Show all trace information
        #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
        verbosity: u8,
    },

    /// Print the effective configuration
    CheckConfig {
        /// Configuration file (defaults to the nearest .exam-assembly.toml)
        #[arg(short, long, env = "EXAM_ASSEMBLY_CONFIG")]
        config: Option<PathBuf>,
    },
}

impl Commands {
    pub fn verbosity(&self) -> u8 {
        match self {
            Commands::Assemble { verbosity, .. } => *verbosity,
            Commands::CheckConfig { .. } => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_assemble_arguments() {
        let cli = Cli::try_parse_from([
            "exam-assembly",
            "assemble",
            "--catalog",
            "catalog.json",
            "--exams",
            "exams.json",
            "--seed",
            "7",
            "-vv",
        ])
        .unwrap();
        match cli.command {
            Commands::Assemble {
                ref catalog,
                seed,
                verbosity,
                ref output,
                ..
            } => {
                assert_eq!(catalog, &PathBuf::from("catalog.json"));
                assert_eq!(seed, Some(7));
                assert_eq!(verbosity, 2);
                assert!(output.is_none());
            }
            Commands::CheckConfig { .. } => panic!("expected assemble"),
        }
        assert_eq!(cli.command.verbosity(), 2);
    }

    #[test]
    fn test_assemble_requires_catalog() {
        assert!(Cli::try_parse_from(["exam-assembly", "assemble", "--exams", "e.json"]).is_err());
    }
}
