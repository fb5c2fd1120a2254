use canonical_json::to_string;
use serde::Serialize;
use serde_json::Value;

use crate::float_guard::{self, GuardError};
use std::collections::BTreeSet;

/// Error returned when canonicalization fails.
#[derive(thiserror::Error, Debug)]
pub enum CanonicalizationError {
    /// The value could not be converted to JSON.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
    /// Excluded fields were configured but the root is not a JSON object.
    #[error("excluded fields require an object at the root, found {0}")]
    NotAnObject(&'static str),
    /// Non-finite float (NaN/Infinity) detected while serializing.
    #[error("non-finite number detected at {0}")]
    NonFiniteNumber(String),
    /// Generic failure from the RFC 8785 encoder.
    #[error("other error: {0}")]
    Other(String),
}

/// Emits RFC 8785 canonical JSON bytes, minus identity-only fields.
///
/// Excluded fields are removed from the top-level object before encoding, so
/// two records that differ only in, say, `id` or `created_at` produce the same
/// bytes. Key order and number formatting follow RFC 8785 and do not depend
/// on how the input was built.
///
/// # Example
///
/// ```rust
/// use canonry_content::Canonicalizer;
/// use serde_json::json;
///
/// let canonicalizer = Canonicalizer::excluding(["id"]);
/// let a = canonicalizer.canonicalize(&json!({"id": 1, "role": "admin"}))?;
/// let b = canonicalizer.canonicalize(&json!({"role": "admin", "id": 2}))?;
/// assert_eq!(a, b);
/// assert_eq!(a, br#"{"role":"admin"}"#.to_vec());
/// # Ok::<(), canonry_content::CanonicalizationError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Canonicalizer {
    excluded: BTreeSet<String>,
}

impl Canonicalizer {
    /// Creates a canonicalizer that keeps every field.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a canonicalizer that drops the named top-level fields.
    pub fn excluding<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            excluded: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// Names of the excluded top-level fields, in sorted order.
    pub fn excluded_fields(&self) -> impl Iterator<Item = &str> {
        self.excluded.iter().map(String::as_str)
    }

    /// Produces canonical bytes for a JSON value.
    ///
    /// A parsed [`Value`] cannot hold NaN or infinities, so no float check
    /// is needed on this path.
    pub fn canonicalize(&self, value: &Value) -> Result<Vec<u8>, CanonicalizationError> {
        if self.excluded.is_empty() {
            return self.encode(value);
        }
        match value {
            Value::Object(map) => {
                let mut trimmed = map.clone();
                for field in &self.excluded {
                    trimmed.remove(field);
                }
                self.encode(&Value::Object(trimmed))
            }
            other => Err(CanonicalizationError::NotAnObject(kind_of(other))),
        }
    }

    /// Serializes a value with serde, then canonicalizes it.
    ///
    /// Fails with [`CanonicalizationError::NonFiniteNumber`] if any `f32` or
    /// `f64` in the value is NaN or infinite; JSON has no encoding for those
    /// that keeps them apart from `null`.
    pub fn canonicalize_serialize<T: Serialize + ?Sized>(
        &self,
        value: &T,
    ) -> Result<Vec<u8>, CanonicalizationError> {
        float_guard::check(value).map_err(|err| match err {
            GuardError::NonFinite(path) => CanonicalizationError::NonFiniteNumber(path),
            GuardError::Custom(msg) => CanonicalizationError::Other(msg),
        })?;
        let value = serde_json::to_value(value)?;
        self.canonicalize(&value)
    }

    fn encode(&self, value: &Value) -> Result<Vec<u8>, CanonicalizationError> {
        // Perform RFC 8785 canonicalization
        let canonical =
            to_string(value).map_err(|err| CanonicalizationError::Other(err.to_string()))?;
        Ok(canonical.into_bytes())
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Object(_) => "object",
        Value::Array(_) => "array",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Bool(_) => "bool",
        Value::Null => "null",
    }
}
