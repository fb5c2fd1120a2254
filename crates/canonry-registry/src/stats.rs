//! Diagnostics snapshot.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Point-in-time view of registry activity.
///
/// Counters are read one by one without a global lock, so a snapshot taken
/// while other threads resolve may be slightly inconsistent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RegistryStats {
    /// Number of bound fingerprints.
    pub entries: usize,
    /// Successful resolves (hits plus inserts).
    pub resolves: u64,
    /// Resolves that returned an already bound canonical.
    pub hits: u64,
    /// Resolves that bound a new canonical.
    pub inserts: u64,
    /// Resolves whose content contract failed.
    pub failures: u64,
}

impl RegistryStats {
    /// Fraction of successful resolves that were deduplicated.
    pub fn dedup_ratio(&self) -> f64 {
        match self.resolves {
            0 => 0.0,
            total => self.hits as f64 / total as f64,
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct Counters {
    hits: AtomicU64,
    inserts: AtomicU64,
    failures: AtomicU64,
}

impl Counters {
    pub(crate) fn hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn insert(&self) {
        self.inserts.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self, entries: usize) -> RegistryStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let inserts = self.inserts.load(Ordering::Relaxed);
        RegistryStats {
            entries,
            resolves: hits + inserts,
            hits,
            inserts,
            failures: self.failures.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dedup_ratio_handles_empty_registry() {
        let stats = Counters::default().snapshot(0);
        assert_eq!(stats.resolves, 0);
        assert_eq!(stats.dedup_ratio(), 0.0);
    }

    #[test]
    fn dedup_ratio_counts_hits() {
        let counters = Counters::default();
        counters.insert();
        counters.hit();
        counters.hit();
        counters.hit();
        counters.failure();
        let stats = counters.snapshot(1);
        assert_eq!(stats.resolves, 4);
        assert_eq!(stats.failures, 1);
        assert_eq!(stats.dedup_ratio(), 0.75);
    }
}
