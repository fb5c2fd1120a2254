//! Registry sizing options.

use serde::{Deserialize, Serialize};

use crate::error::RegistryError;

/// Options for building a [`Registry`](crate::Registry).
///
/// Missing fields take their default when deserialized, so `{}` is a valid
/// options document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryOptions {
    /// Number of entries to reserve up front (default: 0).
    pub initial_capacity: usize,
    /// Number of map shards; must be a power of two greater than one
    /// (default: chosen from the available parallelism).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shard_amount: Option<usize>,
}

impl RegistryOptions {
    /// Parses options from a JSON document and validates them.
    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Checks that the options describe a map that can be built.
    pub fn validate(&self) -> Result<(), RegistryError> {
        match self.shard_amount {
            Some(shards) if shards <= 1 || !shards.is_power_of_two() => {
                Err(RegistryError::InvalidShardAmount(shards))
            }
            _ => Ok(()),
        }
    }
}
