//! Error types
//!
//! Death is a gameplay event, not an error. These only cover setup-time
//! validation and the id longevity limit.

use thiserror::Error;

/// Rejected tuning or settings, reported once at construction
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("lane count must be a positive odd integer, got {0}")]
    InvalidLaneCount(u32),
    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: f32 },
    #[error("{field} must be within [{min}, {max}], got {value}")]
    OutOfRange {
        field: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },
    #[error("outcome band {index} upper bound {bound} is not above the previous bound")]
    OutcomesNotAscending { index: usize, bound: f32 },
    #[error("outcome bands must end exactly at 1.0, last bound is {0}")]
    OutcomesNotExhaustive(f32),
    #[error("outcome table is empty")]
    EmptyOutcomes,
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Fatal limits hit while the simulation runs
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SimError {
    #[error("entity id space exhausted after {0} ids")]
    IdsExhausted(u32),
}
