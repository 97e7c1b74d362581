use thiserror::Error;

/// Error types for the compute crate.
///
/// Both variants are validation failures: a record arrived from the record
/// source with a field that cannot be turned into its semantic type. Under
/// the strict policy the whole aggregation batch aborts with the first one.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ComputeError {
    /// A record's date could not be parsed as an ISO calendar date.
    #[error("expense {id}: invalid date '{value}'")]
    InvalidDate { id: i64, value: String },

    /// A record's amount is not a non-negative integer.
    #[error("expense {id}: invalid amount {value}")]
    InvalidAmount { id: i64, value: String },
}

/// Type alias for Result with ComputeError
pub type Result<T> = std::result::Result<T, ComputeError>;
