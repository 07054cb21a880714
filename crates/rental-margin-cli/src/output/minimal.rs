use rental_margin_core::MarginReport;

/// Print just the portfolio margin.
pub fn print_minimal(report: &MarginReport) {
    println!("{}", report.totals.margin);
}
