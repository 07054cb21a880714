use std::io;

use rental_margin_core::MarginReport;

/// One CSV row per contract allocation, flattened with its client.
pub fn print_csv(report: &MarginReport) {
    let mut writer = csv::Writer::from_writer(io::stdout());
    if let Err(e) = write_rows(&mut writer, report) {
        eprintln!("CSV output error: {}", e);
    }
}

fn write_rows(writer: &mut csv::Writer<io::Stdout>, report: &MarginReport) -> Result<(), csv::Error> {
    writer.write_record([
        "client_id",
        "client_name",
        "contract_id",
        "label",
        "revenue",
        "allocated_cost",
        "margin",
        "margin_percent",
    ])?;

    for client in &report.clients {
        for contract in &client.contracts {
            let revenue = contract.revenue.to_string();
            let allocated_cost = contract.allocated_cost.to_string();
            let margin = contract.margin.to_string();
            let margin_percent = contract.margin_percent.to_string();
            writer.write_record([
                client.client_id.as_str(),
                client.client_name.as_str(),
                contract.contract_id.as_str(),
                contract.label.as_str(),
                revenue.as_str(),
                allocated_cost.as_str(),
                margin.as_str(),
                margin_percent.as_str(),
            ])?;
        }
    }

    writer.flush()?;
    Ok(())
}
