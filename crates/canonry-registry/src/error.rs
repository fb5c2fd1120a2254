//! Error types for registry construction.

use thiserror::Error;

/// Errors that can occur while building a registry.
///
/// Resolving never produces a `RegistryError`; content contract failures are
/// returned to the caller as the contract's own error type.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// Shard amount must be a power of two greater than one.
    #[error("shard amount {0} must be a power of two greater than 1")]
    InvalidShardAmount(usize),
    /// Options document could not be parsed.
    #[error("invalid registry options: {0}")]
    Options(#[from] serde_json::Error),
}
