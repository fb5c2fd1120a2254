//! JSON record adapter for the registry.

use canonry_content::{CanonicalizationError, Canonicalizer, ContentContract};
use serde_json::Value;
use std::sync::Arc;

/// One input record; its content is the canonical JSON minus excluded fields.
#[derive(Debug)]
pub struct JsonRecord {
    /// Line the record was read from.
    pub line: usize,
    value: Value,
    canonicalizer: Arc<Canonicalizer>,
}

impl JsonRecord {
    pub fn new(line: usize, value: Value, canonicalizer: Arc<Canonicalizer>) -> Self {
        Self {
            line,
            value,
            canonicalizer,
        }
    }
}

impl ContentContract for JsonRecord {
    type Error = CanonicalizationError;

    fn content_bytes(&self) -> Result<Vec<u8>, CanonicalizationError> {
        self.canonicalizer.canonicalize(&self.value)
    }
}
