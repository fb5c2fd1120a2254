//! Content primitives for Canonry canonicalization.
//!
//! A value takes part in deduplication by implementing [`ContentContract`]:
//! it yields its essential content as a deterministic byte sequence that
//! leaves out identity-only fields (surrogate ids, timestamps, cache metadata).
//! The bytes are hashed with SHA-256 into a [`Fingerprint`], which is the key
//! the registry uses to find the canonical instance.
//!
//! Two encoders are provided for building content bytes:
//! - [`ContentEncoder`] for hand-written, length-prefixed field encodings
//! - [`Canonicalizer`] for serde values, emitted as RFC 8785 JSON with
//!   excluded fields removed
//!
#![deny(missing_docs)]

/// RFC 8785 canonicalization of serde values with excluded fields.
pub mod canonicalizer;
/// The content contract and the field encoder.
pub mod content;
mod float_guard;
/// Fingerprint function and key type.
pub mod fingerprint;
/// Validation helpers used by content types.
pub mod validation;

pub use canonicalizer::{CanonicalizationError, Canonicalizer};
pub use content::{ContentContract, ContentEncoder};
pub use fingerprint::{fingerprint, Fingerprint, FINGERPRINT_LEN};
pub use validation::ValidationError;
