use rental_margin_core::MarginReport;

/// Pretty-print the full report as JSON.
pub fn print_json(report: &MarginReport) {
    match serde_json::to_string_pretty(report) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("JSON serialization error: {}", e),
    }
}
