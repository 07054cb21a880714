//! Pro-rata distribution of a client's shared supply cost across its
//! contracts, weighted by each contract's recognised revenue.

use rust_decimal::Decimal;

use crate::types::Money;

/// Distribute `client_total_cost` across contracts in proportion to
/// each contract's share of the summed revenue. The result is aligned
/// index-for-index with `revenues`.
///
/// When the revenue sum is zero every share is zero and the residual
/// cost stays unattributed at the client level; it is never discarded.
/// Invariant: with positive revenue, the shares sum back to the total
/// within decimal tolerance.
pub fn allocate(client_total_cost: Money, revenues: &[Money]) -> Vec<Money> {
    let revenue_sum: Decimal = revenues.iter().copied().sum();
    if revenue_sum <= Decimal::ZERO {
        return vec![Decimal::ZERO; revenues.len()];
    }
    revenues
        .iter()
        .map(|revenue| client_total_cost * revenue / revenue_sum)
        .collect()
}
