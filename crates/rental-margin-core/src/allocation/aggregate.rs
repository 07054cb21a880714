//! The full margin-report pipeline.
//!
//! Validates and normalizes the inputs, clamps and prorates every
//! contract, groups survivors by client, deduplicates and allocates
//! each client's supply cost, and rolls the results up into client
//! aggregates and portfolio totals ordered by descending revenue.
//!
//! Each client's aggregation is independent of every other client's,
//! so the per-client build can fan out across threads behind the
//! `parallel` feature. The final sort always runs after the join.

use std::collections::HashMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::allocation::{costs, dedup, interval, proration};
use crate::error::{MarginError, StructuralViolation};
use crate::types::{
    ClientAggregate, ContractAllocation, DataQualityWarning, MarginReport, MarginReportInput,
    Money, PortfolioTotals, SupplyInvoice,
};
use crate::MarginResult;

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Compute the margin report for one reporting window.
///
/// The computation is a pure, re-entrant batch pass: all derived
/// figures are rebuilt from the inputs on every call and no state
/// survives between calls. Structural invalidity fails the whole run
/// with a single error listing every offending entity; tolerable data
/// gaps become warnings attached to the report.
pub fn margin_report(input: &MarginReportInput) -> MarginResult<MarginReport> {
    validate(input)?;

    let mut warnings = Vec::new();
    let mut worksets: Vec<ClientWorkset<'_>> = Vec::new();
    let mut client_index: HashMap<&str, usize> = HashMap::new();
    let mut contract_owner: HashMap<&str, usize> = HashMap::new();

    // Clamp, prorate, and group by client in first-discovery order.
    for contract in &input.contracts {
        let Some(client_id) = contract.client_id.as_deref().filter(|id| !id.is_empty()) else {
            tracing::warn!(
                contract_id = %contract.id,
                "contract has no resolvable client; excluded from aggregates"
            );
            warnings.push(DataQualityWarning::MissingClientReference {
                contract_id: contract.id.clone(),
            });
            continue;
        };

        // Wholly outside the window: expected, excluded silently.
        let Some(effective) =
            interval::overlap(contract.start, contract.effective_end(), &input.window)
        else {
            continue;
        };

        let revenue = proration::prorate(contract.monthly_value, effective.days());

        let idx = match client_index.get(client_id) {
            Some(&idx) => idx,
            None => {
                worksets.push(ClientWorkset {
                    client_id: client_id.to_string(),
                    client_name: contract
                        .client_name
                        .clone()
                        .unwrap_or_else(|| client_id.to_string()),
                    contracts: Vec::new(),
                    invoices: Vec::new(),
                });
                client_index.insert(client_id, worksets.len() - 1);
                worksets.len() - 1
            }
        };
        contract_owner.insert(contract.id.as_str(), idx);
        worksets[idx].contracts.push(ProratedContract {
            contract_id: contract.id.clone(),
            label: contract.label.clone().unwrap_or_else(|| contract.id.clone()),
            revenue,
        });
    }

    // Attach each invoice once per client whose surviving contracts it
    // references. The per-client seen-set handles upstream duplicates.
    for invoice in &input.supply_invoices {
        let mut attached: Vec<usize> = Vec::new();
        for contract_id in &invoice.contract_ids {
            if let Some(&idx) = contract_owner.get(contract_id.as_str()) {
                if !attached.contains(&idx) {
                    attached.push(idx);
                    worksets[idx].invoices.push(invoice);
                }
            }
        }
    }

    // Dedup, allocate, and margin per client. Worksets own their slice
    // of the data exclusively, so the fan-out shares nothing mutable.
    #[cfg(feature = "parallel")]
    let built: Vec<(ClientAggregate, Vec<DataQualityWarning>)> =
        worksets.par_iter().map(build_client).collect();
    #[cfg(not(feature = "parallel"))]
    let built: Vec<(ClientAggregate, Vec<DataQualityWarning>)> =
        worksets.iter().map(build_client).collect();

    let mut clients = Vec::with_capacity(built.len());
    for (aggregate, client_warnings) in built {
        warnings.extend(client_warnings);
        clients.push(aggregate);
    }

    // Descending revenue; stable, so ties keep first-discovery order.
    clients.sort_by(|a, b| b.revenue.cmp(&a.revenue));

    let totals = portfolio_totals(&clients);

    Ok(MarginReport {
        clients,
        totals,
        warnings,
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Single normalization/validation pass over the raw inputs. Collects
/// every structural violation before failing so the caller sees all
/// offending entities at once. Dates are never guessed or swapped.
fn validate(input: &MarginReportInput) -> MarginResult<()> {
    let mut violations = Vec::new();

    if input.window.to < input.window.from {
        violations.push(StructuralViolation {
            entity: "reporting window".to_string(),
            reason: format!(
                "'to' {} precedes 'from' {}",
                input.window.to, input.window.from
            ),
        });
    }

    for contract in &input.contracts {
        if let Some(end) = contract.end {
            if end < contract.start {
                violations.push(StructuralViolation {
                    entity: format!("contract '{}'", contract.id),
                    reason: format!("end {} precedes start {}", end, contract.start),
                });
            }
        }
        if contract.monthly_value < Decimal::ZERO {
            violations.push(StructuralViolation {
                entity: format!("contract '{}'", contract.id),
                reason: format!("negative monthly value {}", contract.monthly_value),
            });
        }
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(MarginError::InvalidData { violations })
    }
}

// ---------------------------------------------------------------------------
// Per-client build
// ---------------------------------------------------------------------------

/// A surviving contract with its window-bounded revenue.
#[derive(Debug, Clone)]
struct ProratedContract {
    contract_id: String,
    label: String,
    revenue: Money,
}

/// One client's exclusive slice of contracts and candidate invoices.
#[derive(Debug)]
struct ClientWorkset<'a> {
    client_id: String,
    client_name: String,
    contracts: Vec<ProratedContract>,
    invoices: Vec<&'a SupplyInvoice>,
}

fn build_client(workset: &ClientWorkset<'_>) -> (ClientAggregate, Vec<DataQualityWarning>) {
    let deduped = dedup::dedupe_client_invoices(&workset.invoices);

    let revenues: Vec<Money> = workset.contracts.iter().map(|c| c.revenue).collect();
    let allocated = costs::allocate(deduped.total, &revenues);

    let mut contracts = Vec::with_capacity(workset.contracts.len());
    let mut revenue_sum = Decimal::ZERO;
    for (contract, allocated_cost) in workset.contracts.iter().zip(allocated) {
        let margin = contract.revenue - allocated_cost;
        revenue_sum += contract.revenue;
        contracts.push(ContractAllocation {
            contract_id: contract.contract_id.clone(),
            label: contract.label.clone(),
            revenue: contract.revenue,
            allocated_cost,
            margin,
            margin_percent: margin_percent(margin, contract.revenue),
        });
    }

    // For zero-revenue clients the per-contract shares are all zero
    // but the full cost stays attributed at this level, so the client
    // margin is the full negative cost.
    let margin = revenue_sum - deduped.total;
    let aggregate = ClientAggregate {
        client_id: workset.client_id.clone(),
        client_name: workset.client_name.clone(),
        contracts,
        revenue: revenue_sum,
        allocated_cost: deduped.total,
        margin,
        margin_percent: margin_percent(margin, revenue_sum),
    };
    (aggregate, deduped.warnings)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Margin as a percentage of revenue; zero when revenue is not
/// positive, never NaN or infinite.
fn margin_percent(margin: Money, revenue: Money) -> Decimal {
    if revenue > Decimal::ZERO {
        margin / revenue * dec!(100)
    } else {
        Decimal::ZERO
    }
}

fn portfolio_totals(clients: &[ClientAggregate]) -> PortfolioTotals {
    let mut revenue = Decimal::ZERO;
    let mut allocated_cost = Decimal::ZERO;
    let mut margin = Decimal::ZERO;
    for client in clients {
        revenue += client.revenue;
        allocated_cost += client.allocated_cost;
        margin += client.margin;
    }
    PortfolioTotals {
        revenue,
        allocated_cost,
        margin,
        margin_percent: margin_percent(margin, revenue),
    }
}
