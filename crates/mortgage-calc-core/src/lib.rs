pub mod error;
pub mod time_value;
pub mod types;

#[cfg(feature = "payment")]
pub mod mortgage;

#[cfg(feature = "closing_costs")]
pub mod closing_costs;

#[cfg(feature = "records")]
pub mod records;

pub use error::MortgageError;
pub use types::*;

/// Standard result type for all mortgage-calc operations
pub type MortgageResult<T> = Result<T, MortgageError>;
