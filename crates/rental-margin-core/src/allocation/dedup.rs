//! Per-client supply invoice deduplication.
//!
//! The upstream matcher returns the same physical invoice once per
//! contract it matched, so a client with several contracts can see one
//! invoice several times. The identifier seen-set makes each invoice
//! count exactly once toward the client total.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::HashSet;

use crate::types::{DataQualityWarning, Money, SupplyInvoice};

/// First counted occurrence of a client invoice, retained for display.
#[derive(Debug, Clone, PartialEq)]
pub struct CountedInvoice {
    pub id: Option<String>,
    pub value: Money,
    pub issue_date: NaiveDate,
}

/// Deduplicated supply spend for one client.
#[derive(Debug, Clone, Default)]
pub struct DedupedInvoices {
    pub total: Money,
    pub invoices: Vec<CountedInvoice>,
    pub warnings: Vec<DataQualityWarning>,
}

/// Collapse a client's invoice list into unique occurrences.
///
/// Invoices are processed in the order received; the total is
/// order-independent because it sums over unique identifiers, order
/// only decides which occurrence is retained for display. An invoice
/// without an identifier cannot be deduplicated safely and is always
/// counted, with a data-quality warning rather than a drop.
pub fn dedupe_client_invoices(invoices: &[&SupplyInvoice]) -> DedupedInvoices {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut out = DedupedInvoices {
        total: Decimal::ZERO,
        invoices: Vec::new(),
        warnings: Vec::new(),
    };

    for invoice in invoices {
        match invoice.id.as_deref().filter(|id| !id.is_empty()) {
            Some(id) => {
                if !seen.insert(id) {
                    continue;
                }
            }
            None => {
                tracing::warn!(
                    value = %invoice.value,
                    issue_date = %invoice.issue_date,
                    "supply invoice has no identifier; counted without deduplication"
                );
                out.warnings.push(DataQualityWarning::UnidentifiableInvoice {
                    value: invoice.value,
                    issue_date: invoice.issue_date,
                });
            }
        }
        out.total += invoice.value;
        out.invoices.push(CountedInvoice {
            id: invoice.id.clone(),
            value: invoice.value,
            issue_date: invoice.issue_date,
        });
    }

    out
}
