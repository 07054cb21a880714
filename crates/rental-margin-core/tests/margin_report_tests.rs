use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use rental_margin_core::allocation::aggregate::margin_report;
use rental_margin_core::{
    Contract, DataQualityWarning, MarginError, MarginReportInput, ReportingWindow, SupplyInvoice,
};

// ===========================================================================
// End-to-end margin report tests covering the engine's contract:
// window clamping, proration, invoice dedup, pro-rata allocation,
// ordering, warnings, and structural validation.
// ===========================================================================

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn contract(id: &str, client: &str, monthly: Decimal, start: NaiveDate, end: NaiveDate) -> Contract {
    Contract {
        id: id.to_string(),
        client_id: Some(client.to_string()),
        client_name: Some(format!("{} GmbH", client)),
        monthly_value: monthly,
        start,
        end: Some(end),
        label: None,
    }
}

fn invoice(id: &str, value: Decimal, contract_ids: &[&str]) -> SupplyInvoice {
    SupplyInvoice {
        id: Some(id.to_string()),
        value,
        issue_date: date(2024, 1, 20),
        contract_ids: contract_ids.iter().map(|s| s.to_string()).collect(),
    }
}

fn january() -> ReportingWindow {
    ReportingWindow {
        from: date(2024, 1, 1),
        to: date(2024, 1, 31),
    }
}

// ---------------------------------------------------------------------------
// Exclusion of non-overlapping contracts
// ---------------------------------------------------------------------------

#[test]
fn test_contract_outside_window_never_appears() {
    let input = MarginReportInput {
        contracts: vec![
            contract("C-1", "A", dec!(1000), date(2023, 1, 1), date(2023, 12, 31)),
            contract("C-2", "A", dec!(1000), date(2024, 2, 1), date(2024, 12, 31)),
            contract("C-3", "A", dec!(1000), date(2024, 1, 1), date(2024, 6, 30)),
        ],
        supply_invoices: vec![],
        window: january(),
    };
    let report = margin_report(&input).unwrap();

    assert_eq!(report.clients.len(), 1);
    let client = &report.clients[0];
    assert_eq!(client.contracts.len(), 1);
    assert_eq!(client.contracts[0].contract_id, "C-3");
}

#[test]
fn test_invoice_for_inactive_contract_not_attributed() {
    let input = MarginReportInput {
        contracts: vec![
            contract("C-1", "A", dec!(1000), date(2023, 1, 1), date(2023, 12, 31)),
            contract("C-2", "B", dec!(1000), date(2024, 1, 1), date(2024, 6, 30)),
        ],
        supply_invoices: vec![invoice("INV-1", dec!(400), &["C-1"])],
        window: january(),
    };
    let report = margin_report(&input).unwrap();

    // Client A has no active contract, so it has no aggregate and the
    // invoice lands nowhere.
    assert_eq!(report.clients.len(), 1);
    assert_eq!(report.clients[0].client_id, "B");
    assert_eq!(report.clients[0].allocated_cost, Decimal::ZERO);
    assert_eq!(report.totals.allocated_cost, Decimal::ZERO);
}

// ---------------------------------------------------------------------------
// Single-day and open-ended contracts
// ---------------------------------------------------------------------------

#[test]
fn test_single_day_contract_still_contributes() {
    let input = MarginReportInput {
        contracts: vec![contract(
            "C-1",
            "A",
            dec!(1000),
            date(2024, 1, 31),
            date(2024, 1, 31),
        )],
        supply_invoices: vec![],
        window: january(),
    };
    let report = margin_report(&input).unwrap();

    // One effective day, floored at 0.1 months.
    assert_eq!(report.clients[0].revenue, dec!(100.0));
}

#[test]
fn test_open_ended_contract_is_active() {
    let input = MarginReportInput {
        contracts: vec![Contract {
            id: "C-1".into(),
            client_id: Some("A".into()),
            client_name: None,
            monthly_value: dec!(1000),
            start: date(2023, 6, 1),
            end: None,
            label: None,
        }],
        supply_invoices: vec![],
        window: january(),
    };
    let report = margin_report(&input).unwrap();

    assert_eq!(report.clients.len(), 1);
    // Clamped to the full window: 30 effective days.
    let revenue = report.clients[0].revenue;
    assert!(
        (revenue - dec!(985.5453)).abs() < dec!(0.001),
        "expected ~985.5453, got {}",
        revenue
    );
}

// ---------------------------------------------------------------------------
// Deduplication
// ---------------------------------------------------------------------------

#[test]
fn test_invoice_referenced_by_three_contracts_counts_once() {
    let contracts = vec![
        contract("C-1", "A", dec!(1000), date(2024, 1, 1), date(2024, 6, 30)),
        contract("C-2", "A", dec!(2000), date(2024, 1, 1), date(2024, 6, 30)),
        contract("C-3", "A", dec!(3000), date(2024, 1, 1), date(2024, 6, 30)),
    ];

    // The matcher returned the same invoice once per matched contract.
    let triple = MarginReportInput {
        contracts: contracts.clone(),
        supply_invoices: vec![
            invoice("INV-1", dec!(600), &["C-1"]),
            invoice("INV-1", dec!(600), &["C-2"]),
            invoice("INV-1", dec!(600), &["C-3"]),
        ],
        window: january(),
    };
    let single = MarginReportInput {
        contracts,
        supply_invoices: vec![invoice("INV-1", dec!(600), &["C-1", "C-2", "C-3"])],
        window: january(),
    };

    let triple_report = margin_report(&triple).unwrap();
    let single_report = margin_report(&single).unwrap();

    assert_eq!(triple_report.clients[0].allocated_cost, dec!(600));
    assert_eq!(
        triple_report.clients[0].allocated_cost,
        single_report.clients[0].allocated_cost
    );
}

#[test]
fn test_unidentifiable_invoice_counted_and_warned() {
    let input = MarginReportInput {
        contracts: vec![contract(
            "C-1",
            "A",
            dec!(1000),
            date(2024, 1, 1),
            date(2024, 6, 30),
        )],
        supply_invoices: vec![
            SupplyInvoice {
                id: None,
                value: dec!(150),
                issue_date: date(2024, 1, 10),
                contract_ids: vec!["C-1".into()],
            },
            SupplyInvoice {
                id: None,
                value: dec!(150),
                issue_date: date(2024, 1, 11),
                contract_ids: vec!["C-1".into()],
            },
        ],
        window: january(),
    };
    let report = margin_report(&input).unwrap();

    // Both counted: no identifier means no safe dedup.
    assert_eq!(report.clients[0].allocated_cost, dec!(300));
    let unidentifiable = report
        .warnings
        .iter()
        .filter(|w| matches!(w, DataQualityWarning::UnidentifiableInvoice { .. }))
        .count();
    assert_eq!(unidentifiable, 2);
}

// ---------------------------------------------------------------------------
// Allocation
// ---------------------------------------------------------------------------

#[test]
fn test_allocation_conserves_client_cost() {
    let input = MarginReportInput {
        contracts: vec![
            contract("C-1", "A", dec!(1234.56), date(2024, 1, 1), date(2024, 6, 30)),
            contract("C-2", "A", dec!(777.77), date(2024, 1, 10), date(2024, 3, 1)),
            contract("C-3", "A", dec!(50), date(2024, 1, 29), date(2024, 1, 31)),
        ],
        supply_invoices: vec![
            invoice("INV-1", dec!(400.40), &["C-1"]),
            invoice("INV-2", dec!(599.60), &["C-2", "C-3"]),
        ],
        window: january(),
    };
    let report = margin_report(&input).unwrap();

    let client = &report.clients[0];
    let allocated_sum: Decimal = client.contracts.iter().map(|c| c.allocated_cost).sum();
    assert!(
        (allocated_sum - dec!(1000.00)).abs() < dec!(0.000001),
        "allocated shares should sum to the client cost, got {}",
        allocated_sum
    );
    assert_eq!(client.allocated_cost, dec!(1000.00));
}

#[test]
fn test_zero_revenue_client_is_safe() {
    let input = MarginReportInput {
        contracts: vec![contract(
            "C-1",
            "A",
            Decimal::ZERO,
            date(2024, 1, 1),
            date(2024, 6, 30),
        )],
        supply_invoices: vec![invoice("INV-1", dec!(250), &["C-1"])],
        window: january(),
    };
    let report = margin_report(&input).unwrap();

    let client = &report.clients[0];
    assert_eq!(client.revenue, Decimal::ZERO);
    assert_eq!(client.contracts[0].allocated_cost, Decimal::ZERO);
    // Cost is retained at the client level, never discarded.
    assert_eq!(client.allocated_cost, dec!(250));
    assert_eq!(client.margin, dec!(-250));
    // No NaN/Infinity: percent is plain zero.
    assert_eq!(client.margin_percent, Decimal::ZERO);
    assert_eq!(report.totals.margin_percent, Decimal::ZERO);
}

// ---------------------------------------------------------------------------
// Ordering
// ---------------------------------------------------------------------------

#[test]
fn test_clients_ordered_by_descending_revenue() {
    let input = MarginReportInput {
        contracts: vec![
            contract("C-1", "small", dec!(100), date(2024, 1, 1), date(2024, 6, 30)),
            contract("C-2", "big", dec!(9000), date(2024, 1, 1), date(2024, 6, 30)),
            contract("C-3", "mid", dec!(500), date(2024, 1, 1), date(2024, 6, 30)),
        ],
        supply_invoices: vec![],
        window: january(),
    };
    let report = margin_report(&input).unwrap();

    let order: Vec<&str> = report.clients.iter().map(|c| c.client_id.as_str()).collect();
    assert_eq!(order, vec!["big", "mid", "small"]);
}

#[test]
fn test_revenue_ties_keep_discovery_order() {
    let input = MarginReportInput {
        contracts: vec![
            contract("C-1", "first", dec!(1000), date(2024, 1, 1), date(2024, 6, 30)),
            contract("C-2", "second", dec!(1000), date(2024, 1, 1), date(2024, 6, 30)),
        ],
        supply_invoices: vec![],
        window: january(),
    };
    let report = margin_report(&input).unwrap();

    assert_eq!(report.clients[0].client_id, "first");
    assert_eq!(report.clients[1].client_id, "second");
}

// ---------------------------------------------------------------------------
// Warnings and exclusions
// ---------------------------------------------------------------------------

#[test]
fn test_missing_client_reference_excluded_with_warning() {
    let input = MarginReportInput {
        contracts: vec![
            Contract {
                id: "C-orphan".into(),
                client_id: None,
                client_name: None,
                monthly_value: dec!(1000),
                start: date(2024, 1, 1),
                end: Some(date(2024, 6, 30)),
                label: None,
            },
            contract("C-1", "A", dec!(1000), date(2024, 1, 1), date(2024, 6, 30)),
        ],
        supply_invoices: vec![],
        window: january(),
    };
    let report = margin_report(&input).unwrap();

    // Never merged into a "null" client bucket.
    assert_eq!(report.clients.len(), 1);
    assert_eq!(report.clients[0].client_id, "A");
    assert_eq!(
        report.warnings,
        vec![DataQualityWarning::MissingClientReference {
            contract_id: "C-orphan".into()
        }]
    );
}

// ---------------------------------------------------------------------------
// Structural validation
// ---------------------------------------------------------------------------

#[test]
fn test_structural_violations_aggregated_into_one_error() {
    let input = MarginReportInput {
        contracts: vec![
            contract("C-1", "A", dec!(1000), date(2024, 6, 1), date(2024, 1, 1)),
            contract("C-2", "A", dec!(-50), date(2024, 1, 1), date(2024, 6, 30)),
        ],
        supply_invoices: vec![],
        window: ReportingWindow {
            from: date(2024, 2, 1),
            to: date(2024, 1, 1),
        },
    };
    let err = margin_report(&input).unwrap_err();

    let MarginError::InvalidData { violations } = err;
    assert_eq!(violations.len(), 3);
    let entities: Vec<&str> = violations.iter().map(|v| v.entity.as_str()).collect();
    assert!(entities.contains(&"reporting window"));
    assert!(entities.contains(&"contract 'C-1'"));
    assert!(entities.contains(&"contract 'C-2'"));
}

// ---------------------------------------------------------------------------
// End-to-end scenario
// ---------------------------------------------------------------------------

#[test]
fn test_two_contract_client_end_to_end() {
    // Client A: C1 at 1000/month active all of January, C2 at
    // 2000/month starting mid-month. Two distinct invoices of 300 and
    // 500 give a client cost of 800 split pro-rata by revenue.
    let input = MarginReportInput {
        contracts: vec![
            contract("C-1", "A", dec!(1000), date(2024, 1, 1), date(2024, 1, 31)),
            contract("C-2", "A", dec!(2000), date(2024, 1, 16), date(2024, 2, 15)),
        ],
        supply_invoices: vec![
            invoice("INV-1", dec!(300), &["C-1"]),
            invoice("INV-2", dec!(500), &["C-2"]),
        ],
        window: january(),
    };
    let report = margin_report(&input).unwrap();

    assert_eq!(report.clients.len(), 1);
    let client = &report.clients[0];
    assert_eq!(client.contracts.len(), 2);

    // C1: 30 effective days => 1000 * 30/30.44 ~= 985.55
    let c1 = &client.contracts[0];
    assert!(
        (c1.revenue - dec!(985.5453)).abs() < dec!(0.001),
        "C1 revenue ~985.5453, got {}",
        c1.revenue
    );
    // C2: clamped to [01-16, 01-31], 15 effective days =>
    // 2000 * 15/30.44 ~= 985.55 as well.
    let c2 = &client.contracts[1];
    assert!(
        (c2.revenue - dec!(985.5453)).abs() < dec!(0.001),
        "C2 revenue ~985.5453, got {}",
        c2.revenue
    );

    // Equal revenue shares split the 800 cost evenly.
    assert_eq!(client.allocated_cost, dec!(800));
    assert!(
        (c1.allocated_cost - dec!(400)).abs() < dec!(0.000001),
        "C1 share ~400, got {}",
        c1.allocated_cost
    );
    assert!(
        (c2.allocated_cost - dec!(400)).abs() < dec!(0.000001),
        "C2 share ~400, got {}",
        c2.allocated_cost
    );

    // Margin = total revenue - client cost.
    let expected_margin = c1.revenue + c2.revenue - dec!(800);
    assert!(
        (client.margin - expected_margin).abs() < dec!(0.000001),
        "client margin should be revenue minus cost, got {}",
        client.margin
    );
    assert_eq!(report.totals.revenue, client.revenue);
    assert_eq!(report.totals.margin, client.margin);
}

// ---------------------------------------------------------------------------
// Re-entrancy
// ---------------------------------------------------------------------------

#[test]
fn test_recomputation_is_pure() {
    let input = MarginReportInput {
        contracts: vec![
            contract("C-1", "A", dec!(1000), date(2024, 1, 1), date(2024, 1, 31)),
            contract("C-2", "B", dec!(2000), date(2024, 1, 16), date(2024, 2, 15)),
        ],
        supply_invoices: vec![invoice("INV-1", dec!(300), &["C-1"])],
        window: january(),
    };

    let first = margin_report(&input).unwrap();
    let second = margin_report(&input).unwrap();
    assert_eq!(first, second);
}
