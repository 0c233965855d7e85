use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use tern::config::CheckConfig;
use tern::diagnostics::Severity;
use tern::repl;
use tern::types::check_source;

#[derive(Parser)]
#[command(name = "tern")]
#[command(about = "Type checker for the Tern language")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Type check a Tern source file
    Check {
        /// The file to check
        file: PathBuf,

        /// Print the inferred type of every top-level binding
        #[arg(long)]
        report_types: bool,

        /// Fail when any warning is reported
        #[arg(long)]
        deny_warnings: bool,
    },

    /// Start an interactive session
    Repl,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("TERN_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Check {
            file,
            report_types,
            deny_warnings,
        } => {
            let source = std::fs::read_to_string(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let config = CheckConfig::default()
                .with_report_types(report_types)
                .with_warnings_as_errors(deny_warnings);

            let result = check_source(&source, &config);
            for diagnostic in &result.diagnostics {
                match diagnostic.severity {
                    Severity::Info => println!("{diagnostic}"),
                    Severity::Error | Severity::Warning => eprintln!("{diagnostic}"),
                }
            }

            if !result.passed {
                eprintln!(
                    "{}: {} error(s), {} warning(s)",
                    file.display(),
                    result.diagnostics.error_count(),
                    result.diagnostics.warning_count()
                );
                std::process::exit(1);
            }
        }
        Commands::Repl => repl::run()?,
    }

    Ok(())
}
