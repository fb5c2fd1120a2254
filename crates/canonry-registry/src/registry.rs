use std::convert::Infallible;
use std::fmt;
use std::sync::Arc;

use canonry_content::{fingerprint, ContentContract, Fingerprint};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::{debug, trace, warn};

use crate::error::RegistryError;
use crate::options::RegistryOptions;
use crate::stats::{Counters, RegistryStats};

/// How a resolve call was satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The candidate became the canonical for a new fingerprint.
    Inserted,
    /// A canonical was already bound; the candidate was discarded.
    Existing,
}

impl Resolution {
    /// Returns `true` if the candidate was bound as canonical.
    pub fn is_inserted(self) -> bool {
        matches!(self, Resolution::Inserted)
    }
}

/// Canonical returned by the `*_with_outcome` operations.
#[derive(Debug)]
pub struct Resolved<T> {
    /// The canonical instance for the candidate's content.
    pub canonical: Arc<T>,
    /// Fingerprint the canonical is bound under.
    pub fingerprint: Fingerprint,
    /// Whether this call bound the canonical or found it.
    pub resolution: Resolution,
}

/// Concurrent map from content fingerprint to canonical instance.
///
/// Each fingerprint slot is either absent or bound. The transition happens
/// once, on the first successful resolve for that fingerprint, through the
/// map's entry API: the lookup and the insert run under the same shard lock,
/// so two racing callers can never both bind a canonical. Bound slots are
/// never replaced or removed.
///
/// Canonicals are handed out as `Arc<T>` and must be treated as immutable
/// unless `T` synchronizes its own interior mutation.
///
/// Content bytes are hashed with SHA-256 and no byte comparison backs up the
/// fingerprint match; a digest collision between distinct contents is
/// treated as not occurring.
pub struct Registry<T> {
    canonicals: DashMap<Fingerprint, Arc<T>>,
    counters: Counters,
}

impl<T> Registry<T> {
    /// Creates an empty registry with default sizing.
    pub fn new() -> Self {
        Self::from_map(DashMap::new())
    }

    /// Creates an empty registry sized by `options`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidShardAmount`] if the shard amount is
    /// not a power of two greater than one.
    pub fn with_options(options: &RegistryOptions) -> Result<Self, RegistryError> {
        options.validate()?;
        let map = match options.shard_amount {
            Some(shards) => {
                DashMap::with_capacity_and_shard_amount(options.initial_capacity, shards)
            }
            None => DashMap::with_capacity(options.initial_capacity),
        };
        debug!(
            initial_capacity = options.initial_capacity,
            shard_amount = ?options.shard_amount,
            "registry created"
        );
        Ok(Self::from_map(map))
    }

    fn from_map(canonicals: DashMap<Fingerprint, Arc<T>>) -> Self {
        Self {
            canonicals,
            counters: Counters::default(),
        }
    }

    /// Number of bound fingerprints.
    pub fn len(&self) -> usize {
        self.canonicals.len()
    }

    /// Returns `true` if nothing has been bound yet.
    pub fn is_empty(&self) -> bool {
        self.canonicals.is_empty()
    }

    /// Returns `true` if a canonical is bound under `fingerprint`.
    pub fn contains(&self, fingerprint: &Fingerprint) -> bool {
        self.canonicals.contains_key(fingerprint)
    }

    /// Returns the canonical bound under `fingerprint`, if any.
    pub fn get(&self, fingerprint: &Fingerprint) -> Option<Arc<T>> {
        self.canonicals
            .get(fingerprint)
            .map(|entry| Arc::clone(entry.value()))
    }

    /// Best-effort list of bound fingerprints, in no particular order.
    pub fn fingerprints(&self) -> Vec<Fingerprint> {
        self.canonicals.iter().map(|entry| *entry.key()).collect()
    }

    /// Best-effort activity snapshot.
    pub fn stats(&self) -> RegistryStats {
        self.counters.snapshot(self.canonicals.len())
    }
}

impl<T: ContentContract> Registry<T> {
    /// Resolves a candidate whose content contract may fail.
    ///
    /// Computes the candidate's content bytes and fingerprint, then either
    /// returns the canonical already bound to that fingerprint (dropping the
    /// candidate) or binds the candidate and returns it.
    ///
    /// # Errors
    ///
    /// Returns the contract's error unchanged if content bytes cannot be
    /// produced. Nothing is bound in that case.
    pub fn try_resolve(&self, candidate: T) -> Result<Arc<T>, T::Error> {
        self.try_resolve_shared(Arc::new(candidate))
    }

    /// Like [`Registry::try_resolve`], for a candidate that is already shared.
    ///
    /// If the candidate wins, that exact `Arc` becomes the canonical.
    pub fn try_resolve_shared(&self, candidate: Arc<T>) -> Result<Arc<T>, T::Error> {
        self.bind(candidate).map(|resolved| resolved.canonical)
    }

    /// Like [`Registry::try_resolve`], also reporting the fingerprint and
    /// whether the candidate was bound.
    pub fn try_resolve_with_outcome(&self, candidate: T) -> Result<Resolved<T>, T::Error> {
        self.bind(Arc::new(candidate))
    }

    fn bind(&self, candidate: Arc<T>) -> Result<Resolved<T>, T::Error> {
        let bytes = match candidate.content_bytes() {
            Ok(bytes) => bytes,
            Err(err) => {
                self.counters.failure();
                warn!(
                    content_type = std::any::type_name::<T>(),
                    "content bytes unavailable; candidate not resolved"
                );
                return Err(err);
            }
        };
        let fingerprint = fingerprint(&bytes);

        // Lookup and insert share one shard write lock.
        let resolved = match self.canonicals.entry(fingerprint) {
            Entry::Occupied(entry) => {
                self.counters.hit();
                trace!(%fingerprint, "canonical found");
                Resolved {
                    canonical: Arc::clone(entry.get()),
                    fingerprint,
                    resolution: Resolution::Existing,
                }
            }
            Entry::Vacant(entry) => {
                entry.insert(Arc::clone(&candidate));
                self.counters.insert();
                debug!(%fingerprint, content_len = bytes.len(), "canonical bound");
                Resolved {
                    canonical: candidate,
                    fingerprint,
                    resolution: Resolution::Inserted,
                }
            }
        };
        Ok(resolved)
    }
}

impl<T: ContentContract<Error = Infallible>> Registry<T> {
    /// Resolves a candidate to its canonical instance.
    ///
    /// Every call whose candidate has the same content bytes returns the same
    /// `Arc`, whether the calls are sequential or concurrent. Candidates with
    /// different content bytes never share a canonical.
    ///
    /// # Example
    ///
    /// ```rust
    /// use canonry_registry::Registry;
    /// use std::sync::Arc;
    ///
    /// let registry: Registry<String> = Registry::new();
    /// let x = registry.resolve("x".to_string());
    /// let y = registry.resolve("y".to_string());
    /// let x_again = registry.resolve("x".to_string());
    /// assert!(Arc::ptr_eq(&x, &x_again));
    /// assert!(!Arc::ptr_eq(&x, &y));
    /// ```
    pub fn resolve(&self, candidate: T) -> Arc<T> {
        into_ok(self.try_resolve(candidate))
    }

    /// Resolves a candidate that is already shared.
    ///
    /// If the candidate wins, that exact `Arc` becomes the canonical.
    pub fn resolve_shared(&self, candidate: Arc<T>) -> Arc<T> {
        into_ok(self.try_resolve_shared(candidate))
    }

    /// Resolves a candidate, also reporting the fingerprint and whether the
    /// candidate was bound.
    pub fn resolve_with_outcome(&self, candidate: T) -> Resolved<T> {
        into_ok(self.try_resolve_with_outcome(candidate))
    }
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Registry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("entries", &self.canonicals.len())
            .finish()
    }
}

fn into_ok<V>(result: Result<V, Infallible>) -> V {
    match result {
        Ok(value) => value,
        Err(never) => match never {},
    }
}
