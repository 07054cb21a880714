//! Effective-interval computation: the intersection of a contract's
//! active range with the reporting window.

use chrono::NaiveDate;

use crate::types::ReportingWindow;

/// The sub-interval of a contract that falls inside the reporting
/// window. Both bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectiveInterval {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl EffectiveInterval {
    /// Effective duration in days, floored at one. A single-day
    /// overlap (start == end) counts as one day, never zero.
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days().max(1)
    }
}

/// Clamp a contract's active range to the window.
///
/// Returns `None` when the contract was inactive for the whole window;
/// such a contract must not appear in any aggregate, not even with
/// zeroed figures.
pub fn overlap(
    contract_start: NaiveDate,
    contract_end: NaiveDate,
    window: &ReportingWindow,
) -> Option<EffectiveInterval> {
    if contract_start > window.to || contract_end < window.from {
        return None;
    }
    Some(EffectiveInterval {
        start: contract_start.max(window.from),
        end: contract_end.min(window.to),
    })
}
