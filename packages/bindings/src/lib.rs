use napi::Result as NapiResult;
use napi_derive::napi;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Compute the margin report for a reporting window.
///
/// Takes the engine input (contracts, supply invoices, window) as a
/// JSON string and returns the serialized report: client aggregates
/// ordered by descending revenue, portfolio totals, and data-quality
/// warnings.
#[napi]
pub fn margin_report(input_json: String) -> NapiResult<String> {
    let input: rental_margin_core::MarginReportInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let report =
        rental_margin_core::allocation::aggregate::margin_report(&input).map_err(to_napi_error)?;
    serde_json::to_string(&report).map_err(to_napi_error)
}
