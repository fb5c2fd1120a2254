use std::fmt;

use base64::Engine;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use sha2::{Digest, Sha256};

use crate::content::ContentContract;
use crate::validation::ValidationError;

/// Length of a fingerprint in bytes (SHA-256).
pub const FINGERPRINT_LEN: usize = 32;

/// SHA-256 digest of content bytes, used as the registry key.
///
/// Stored as raw bytes; rendered as lowercase hex by `Display` and serde.
/// Collisions between content-distinct values are treated as not occurring.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint([u8; FINGERPRINT_LEN]);

/// Computes the fingerprint of the given content bytes.
///
/// # Example
///
/// ```rust
/// use canonry_content::fingerprint;
///
/// let fp = fingerprint(b"abc");
/// assert_eq!(
///     fp.to_hex(),
///     "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
/// );
/// ```
pub fn fingerprint(bytes: &[u8]) -> Fingerprint {
    let hash = Sha256::digest(bytes);
    let mut out = [0u8; FINGERPRINT_LEN];
    out.copy_from_slice(&hash);
    Fingerprint(out)
}

impl Fingerprint {
    /// Wraps raw digest bytes.
    pub const fn from_bytes(bytes: [u8; FINGERPRINT_LEN]) -> Self {
        Self(bytes)
    }

    /// Fingerprints a value through its content contract.
    ///
    /// # Errors
    ///
    /// Returns the contract's own error if content bytes cannot be produced.
    pub fn of<T: ContentContract + ?Sized>(value: &T) -> Result<Self, T::Error> {
        Ok(fingerprint(&value.content_bytes()?))
    }

    /// Raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; FINGERPRINT_LEN] {
        &self.0
    }

    /// Lowercase hex rendering (64 characters).
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Base64URL rendering without padding (43 characters).
    pub fn to_b64(&self) -> String {
        base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(self.0)
    }

    /// Parses a hex rendering produced by [`Fingerprint::to_hex`].
    ///
    /// Upper- and lowercase digits are both accepted.
    pub fn parse_hex(value: &str) -> Result<Self, ValidationError> {
        let decoded = hex::decode(value).map_err(|_| ValidationError::PatternMismatch {
            field: "fingerprint",
            value: value.to_string(),
        })?;
        if decoded.len() != FINGERPRINT_LEN {
            return Err(ValidationError::InvalidLength {
                field: "fingerprint",
                expected: FINGERPRINT_LEN,
                actual: decoded.len(),
            });
        }
        let mut out = [0u8; FINGERPRINT_LEN];
        out.copy_from_slice(&decoded);
        Ok(Self(out))
    }
}

impl AsRef<[u8]> for Fingerprint {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", self.to_hex())
    }
}

impl Serialize for Fingerprint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Fingerprint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Fingerprint::parse_hex(&s).map_err(de::Error::custom)
    }
}
