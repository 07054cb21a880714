use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

// ---------------------------------------------------------------------------
// Input entities
// ---------------------------------------------------------------------------

/// A rental contract as delivered by the upstream contract service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contract {
    pub id: String,
    /// Owning client. A contract without one cannot be aggregated and
    /// is excluded with a [`DataQualityWarning::MissingClientReference`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    /// Display name for the client; falls back to the client identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    /// Nominal monthly value. Negative values are a structural error.
    pub monthly_value: Money,
    pub start: NaiveDate,
    /// Missing end means the contract is open-ended.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<NaiveDate>,
    /// Display label; falls back to the contract identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Contract {
    /// End date with the open-ended sentinel applied.
    pub fn effective_end(&self) -> NaiveDate {
        self.end.unwrap_or(NaiveDate::MAX)
    }
}

/// A supply invoice matched upstream against one or more contracts of
/// the same client. The same physical invoice may appear once per
/// contract it was matched against; the identifier is what keeps it
/// from being counted twice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupplyInvoice {
    /// Globally unique identifier. Invoices without one cannot be
    /// deduplicated and are always counted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub value: Money,
    pub issue_date: NaiveDate,
    /// Contract identifiers this invoice was matched against.
    pub contract_ids: Vec<String>,
}

/// Closed reporting interval [from, to]. Immutable for one computation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ReportingWindow {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

/// Full input for one margin-report computation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarginReportInput {
    pub contracts: Vec<Contract>,
    pub supply_invoices: Vec<SupplyInvoice>,
    pub window: ReportingWindow,
}

// ---------------------------------------------------------------------------
// Output entities
// ---------------------------------------------------------------------------

/// Window-bounded financials for a single contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractAllocation {
    pub contract_id: String,
    pub label: String,
    /// Revenue recognised for the contract's active days in the window.
    pub revenue: Money,
    /// Share of the client's deduplicated supply cost.
    pub allocated_cost: Money,
    pub margin: Money,
    /// Zero when revenue is not positive, never NaN.
    pub margin_percent: Decimal,
}

/// Rolled-up financials for one client across its active contracts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientAggregate {
    pub client_id: String,
    pub client_name: String,
    pub contracts: Vec<ContractAllocation>,
    pub revenue: Money,
    /// Total deduplicated supply cost. For zero-revenue clients the
    /// cost stays here even though every per-contract share is zero.
    pub allocated_cost: Money,
    pub margin: Money,
    pub margin_percent: Decimal,
}

/// Portfolio-level sums across all client aggregates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioTotals {
    pub revenue: Money,
    pub allocated_cost: Money,
    pub margin: Money,
    pub margin_percent: Decimal,
}

/// Complete result of one computation pass: client aggregates ordered
/// by descending revenue, portfolio totals, and any data-quality
/// warnings collected along the way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarginReport {
    pub clients: Vec<ClientAggregate>,
    pub totals: PortfolioTotals,
    pub warnings: Vec<DataQualityWarning>,
}

// ---------------------------------------------------------------------------
// Data-quality warnings
// ---------------------------------------------------------------------------

/// Tolerable data gaps. These never abort the run; they are attached
/// to the output and logged where they are detected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataQualityWarning {
    /// Contract excluded because no client could be resolved.
    MissingClientReference { contract_id: String },
    /// Invoice counted without deduplication; risk of overcounting.
    UnidentifiableInvoice { value: Money, issue_date: NaiveDate },
}

impl fmt::Display for DataQualityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataQualityWarning::MissingClientReference { contract_id } => write!(
                f,
                "contract '{}' has no resolvable client and was excluded",
                contract_id
            ),
            DataQualityWarning::UnidentifiableInvoice { value, issue_date } => write!(
                f,
                "supply invoice of {} issued {} has no identifier and was counted without deduplication",
                value, issue_date
            ),
        }
    }
}
