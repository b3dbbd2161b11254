//! Error types for stagepool.

use std::fmt;

/// Errors that can occur when building a pool configuration.
///
/// Protocol violations at runtime (out-of-order release, allocating past
/// capacity, and so on) are contract bugs in the caller and panic instead
/// of surfacing here. See the crate docs for the full contract.
#[derive(Debug)]
pub enum PoolError {
    /// Invalid configuration parameter.
    InvalidConfig {
        /// Description of what was invalid.
        message: &'static str,
    },
}

impl fmt::Display for PoolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PoolError::InvalidConfig { message } => {
                write!(f, "invalid config: {}", message)
            }
        }
    }
}

impl std::error::Error for PoolError {}
