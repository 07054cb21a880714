use tabled::{builder::Builder, Table};

use rental_margin_core::MarginReport;

/// One row per client, ordered as the engine returns them (descending
/// revenue), with a trailing portfolio total row. Display rounding to
/// two decimal places happens here only.
pub fn print_table(report: &MarginReport) {
    let mut builder = Builder::default();
    builder.push_record(["Client", "Contracts", "Revenue", "Supply cost", "Margin", "Margin %"]);

    for client in &report.clients {
        builder.push_record(vec![
            client.client_name.clone(),
            client.contracts.len().to_string(),
            client.revenue.round_dp(2).to_string(),
            client.allocated_cost.round_dp(2).to_string(),
            client.margin.round_dp(2).to_string(),
            client.margin_percent.round_dp(1).to_string(),
        ]);
    }

    let totals = &report.totals;
    builder.push_record(vec![
        "TOTAL".to_string(),
        report
            .clients
            .iter()
            .map(|c| c.contracts.len())
            .sum::<usize>()
            .to_string(),
        totals.revenue.round_dp(2).to_string(),
        totals.allocated_cost.round_dp(2).to_string(),
        totals.margin.round_dp(2).to_string(),
        totals.margin_percent.round_dp(1).to_string(),
    ]);

    println!("{}", Table::from(builder));

    if !report.warnings.is_empty() {
        println!("\nWarnings:");
        for warning in &report.warnings {
            println!("  - {}", warning);
        }
    }
}
