pub mod allocation;
pub mod error;
pub mod types;

pub use error::MarginError;
pub use types::*;

/// Standard result type for all margin-engine operations
pub type MarginResult<T> = Result<T, MarginError>;
