use clap::Args;

use rental_margin_core::allocation::aggregate;
use rental_margin_core::{MarginReport, MarginReportInput};

use crate::input;

/// Arguments for the margin report
#[derive(Args)]
pub struct ReportArgs {
    /// Path to a JSON file with contracts, supply invoices, and the
    /// reporting window
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_margin_report(args: ReportArgs) -> Result<MarginReport, Box<dyn std::error::Error>> {
    let report_input: MarginReportInput = if let Some(ref path) = args.input {
        input::read_json(path)?
    } else if let Some(data) = input::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("--input <file.json> or stdin required for margin-report".into());
    };
    Ok(aggregate::margin_report(&report_input)?)
}
