use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// A single structurally invalid entity found during ingestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructuralViolation {
    /// The entity the violation was found on, e.g. `contract 'C-12'`.
    pub entity: String,
    /// Human-readable description of what is wrong.
    pub reason: String,
}

impl fmt::Display for StructuralViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.entity, self.reason)
    }
}

#[derive(Debug, Error)]
pub enum MarginError {
    /// Structural invalidity (inverted date ranges, negative monetary
    /// values) is fatal for the whole run. Every offending entity is
    /// collected before failing, so one error names them all.
    #[error("invalid input data ({} offending entities): {}", .violations.len(), join_violations(.violations))]
    InvalidData { violations: Vec<StructuralViolation> },
}

fn join_violations(violations: &[StructuralViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
