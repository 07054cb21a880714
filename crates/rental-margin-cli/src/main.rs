mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::report::ReportArgs;

/// Client margin reporting for rental contract portfolios
#[derive(Parser)]
#[command(
    name = "rmr",
    version,
    about = "Client margin reporting for rental contract portfolios",
    long_about = "Computes window-bounded revenue recognition, deduplicated supply \
                  costs, pro-rata cost allocation, and client margin aggregates for \
                  a portfolio of rental contracts."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute client and portfolio margin aggregates for a reporting window
    MarginReport(ReportArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    // Engine data-quality warnings go to stderr, keeping stdout clean
    // for the formatted report.
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::MarginReport(args) => commands::report::run_margin_report(args),
        Commands::Version => {
            println!("rmr {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(report) => {
            output::format_output(&cli.output, &report);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
