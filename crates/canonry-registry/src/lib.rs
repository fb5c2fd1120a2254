//! Concurrent canonical registry for Canonry.
//!
//! This crate provides:
//! - [`Registry`], which maps content fingerprints to one shared canonical
//!   instance and resolves candidates with an atomic find-or-insert
//! - [`RegistryOptions`] for sizing the underlying concurrent map
//! - [`RegistryStats`], a best-effort diagnostics snapshot
//!
//! Core invariants:
//! - At most one canonical object is ever bound to a fingerprint
//! - The first successful resolve for a fingerprint fixes its canonical for
//!   the lifetime of the registry; entries are never replaced or evicted
//! - Content-equal candidates always resolve to the same `Arc`
//!
//! ## Quick Start
//!
//! ```rust
//! use canonry_content::{ContentContract, ContentEncoder};
//! use canonry_registry::Registry;
//! use std::convert::Infallible;
//! use std::sync::Arc;
//!
//! struct Grant {
//!     id: u64,
//!     role: String,
//!     mask: u32,
//! }
//!
//! impl ContentContract for Grant {
//!     type Error = Infallible;
//!
//!     fn content_bytes(&self) -> Result<Vec<u8>, Infallible> {
//!         Ok(ContentEncoder::new("grant").str(&self.role).u32(self.mask).finish())
//!     }
//! }
//!
//! let registry = Registry::new();
//! let first = registry.resolve(Grant { id: 1, role: "admin".into(), mask: 15 });
//! let second = registry.resolve(Grant { id: 2, role: "admin".into(), mask: 15 });
//! assert!(Arc::ptr_eq(&first, &second));
//! assert_eq!(second.id, 1);
//! assert_eq!(registry.len(), 1);
//! ```
//!
//! Registries never shrink. A surrounding service that needs a reset drops
//! the registry and builds a new one.

#![deny(missing_docs)]

/// Error types for registry construction.
pub mod error;
/// Registry sizing options.
pub mod options;
/// The canonical registry and resolve operations.
pub mod registry;
/// Diagnostics snapshot.
pub mod stats;

pub use canonry_content::{ContentContract, Fingerprint};
pub use error::RegistryError;
pub use options::RegistryOptions;
pub use registry::{Registry, Resolution, Resolved};
pub use stats::RegistryStats;
