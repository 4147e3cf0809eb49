//! Estimation errors

use thiserror::Error;

/// Errors from a single `evaluate` call.
///
/// Both variants are non-fatal and local to the call: the caller keeps its
/// previous estimate and simply reports the bad input. Nothing panics.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EstimateError {
    /// A numeric field is outside its domain even after the clamping
    /// contract, or is not a finite number.
    #[error("invalid value for {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    /// A categorical field does not match any static-table entry.
    #[error("unknown {category}: {key:?}")]
    UnknownKey { category: &'static str, key: String },
}
