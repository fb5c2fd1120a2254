//! The content contract and a deterministic field encoder.
//!
//! Content bytes are the only input to fingerprinting, so two values are
//! content-equal exactly when their bytes are identical. Implementations must
//! be deterministic: the same logical content has to produce the same bytes
//! regardless of how the value was constructed. This cannot be checked at
//! runtime; a non-deterministic implementation (one that reads a clock, say)
//! yields undefined deduplication results.

use std::convert::Infallible;

/// Capability every deduplicable value exposes.
///
/// `content_bytes` returns the essential content of `self` as an ordered byte
/// sequence. Identity-only fields must never be part of it, and the field
/// order and encoding must be fixed per type.
///
/// The call must be free of side effects and safe to run concurrently on
/// distinct values. Implementations that cannot fail use
/// [`Infallible`] as their error type.
///
/// # Example
///
/// ```rust
/// use canonry_content::{ContentContract, ContentEncoder};
/// use std::convert::Infallible;
///
/// struct Session {
///     id: u64, // identity only
///     role: String,
///     mask: u32,
/// }
///
/// impl ContentContract for Session {
///     type Error = Infallible;
///
///     fn content_bytes(&self) -> Result<Vec<u8>, Infallible> {
///         Ok(ContentEncoder::new("session")
///             .str(&self.role)
///             .u32(self.mask)
///             .finish())
///     }
/// }
///
/// let a = Session { id: 1, role: "admin".into(), mask: 15 };
/// let b = Session { id: 2, role: "admin".into(), mask: 15 };
/// assert_eq!(a.content_bytes(), b.content_bytes());
/// ```
pub trait ContentContract {
    /// Error raised when content bytes cannot be produced.
    type Error;

    /// Produces the deterministic content bytes for this value.
    fn content_bytes(&self) -> Result<Vec<u8>, Self::Error>;
}

impl ContentContract for String {
    type Error = Infallible;

    fn content_bytes(&self) -> Result<Vec<u8>, Infallible> {
        Ok(self.as_bytes().to_vec())
    }
}

impl ContentContract for Vec<u8> {
    type Error = Infallible;

    fn content_bytes(&self) -> Result<Vec<u8>, Infallible> {
        Ok(self.clone())
    }
}

const KIND_STR: u8 = 0x01;
const KIND_BYTES: u8 = 0x02;
const KIND_U64: u8 = 0x03;
const KIND_I64: u8 = 0x04;
const KIND_U32: u8 = 0x05;
const KIND_BOOL: u8 = 0x06;
const KIND_NONE: u8 = 0x07;

/// Builds content bytes field by field.
///
/// The output starts with a length-prefixed type tag. Every field is a one
/// byte kind marker followed by either a fixed-width big-endian value or a
/// `u64` big-endian length and the raw bytes. Adjacent variable-length fields
/// therefore never run together: `("ab", "c")` and `("a", "bc")` encode
/// differently.
#[derive(Debug, Clone)]
pub struct ContentEncoder {
    buf: Vec<u8>,
}

impl ContentEncoder {
    /// Starts an encoding for the given type tag.
    pub fn new(type_tag: &str) -> Self {
        let mut encoder = Self {
            buf: Vec::with_capacity(64),
        };
        encoder.put_len_prefixed(type_tag.as_bytes());
        encoder
    }

    /// Appends a UTF-8 string field.
    pub fn str(mut self, value: &str) -> Self {
        self.buf.push(KIND_STR);
        self.put_len_prefixed(value.as_bytes());
        self
    }

    /// Appends a raw byte field.
    pub fn bytes(mut self, value: &[u8]) -> Self {
        self.buf.push(KIND_BYTES);
        self.put_len_prefixed(value);
        self
    }

    /// Appends an unsigned 64-bit field.
    pub fn u64(mut self, value: u64) -> Self {
        self.buf.push(KIND_U64);
        self.buf.extend_from_slice(&value.to_be_bytes());
        self
    }

    /// Appends a signed 64-bit field.
    pub fn i64(mut self, value: i64) -> Self {
        self.buf.push(KIND_I64);
        self.buf.extend_from_slice(&value.to_be_bytes());
        self
    }

    /// Appends an unsigned 32-bit field.
    pub fn u32(mut self, value: u32) -> Self {
        self.buf.push(KIND_U32);
        self.buf.extend_from_slice(&value.to_be_bytes());
        self
    }

    /// Appends a boolean field.
    pub fn bool(mut self, value: bool) -> Self {
        self.buf.push(KIND_BOOL);
        self.buf.push(u8::from(value));
        self
    }

    /// Appends an optional string field; `None` has its own marker.
    pub fn opt_str(self, value: Option<&str>) -> Self {
        match value {
            Some(s) => self.str(s),
            None => self.none(),
        }
    }

    fn none(mut self) -> Self {
        self.buf.push(KIND_NONE);
        self
    }

    /// Returns the encoded content bytes.
    pub fn finish(self) -> Vec<u8> {
        self.buf
    }

    fn put_len_prefixed(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(&(bytes.len() as u64).to_be_bytes());
        self.buf.extend_from_slice(bytes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjacent_strings_do_not_run_together() {
        let left = ContentEncoder::new("pair").str("ab").str("c").finish();
        let right = ContentEncoder::new("pair").str("a").str("bc").finish();
        assert_ne!(left, right);
    }

    #[test]
    fn type_tag_separates_equal_fields() {
        let role = ContentEncoder::new("role").str("admin").finish();
        let group = ContentEncoder::new("group").str("admin").finish();
        assert_ne!(role, group);
    }

    #[test]
    fn none_differs_from_empty_string() {
        let none = ContentEncoder::new("t").opt_str(None).finish();
        let empty = ContentEncoder::new("t").opt_str(Some("")).finish();
        assert_ne!(none, empty);
    }

    #[test]
    fn integer_widths_are_distinguished() {
        let wide = ContentEncoder::new("t").u64(1).finish();
        let narrow = ContentEncoder::new("t").u32(1).finish();
        assert_ne!(wide, narrow);
    }

    #[test]
    fn encoding_layout_is_stable() {
        let bytes = ContentEncoder::new("t").bool(true).u32(7).finish();
        let mut expected = vec![0, 0, 0, 0, 0, 0, 0, 1, b't'];
        expected.extend_from_slice(&[KIND_BOOL, 1]);
        expected.extend_from_slice(&[KIND_U32, 0, 0, 0, 7]);
        assert_eq!(bytes, expected);
    }
}
