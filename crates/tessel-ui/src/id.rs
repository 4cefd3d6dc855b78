//! Generated element ids.
//!
//! Nodes created without an explicit id receive `"<KindName><N>"`, where `N`
//! counts instances of that kind. Counters live in an [`IdCounters`] handle
//! owned by the tree rather than in process globals, so tests can start from
//! a known state and several documents can share one sequence when needed.

use parking_lot::Mutex;
use std::sync::Arc;
use tessel_core::alloc::HashMap;

/// Per-kind monotonic counters.
///
/// Cloning the handle shares the underlying counters. Safe to use from
/// several threads; values are never reused.
#[derive(Debug, Clone, Default)]
pub struct IdCounters {
    counts: Arc<Mutex<HashMap<&'static str, u64>>>,
}

impl IdCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next id for `kind_name`.
    pub fn next(&self, kind_name: &'static str) -> String {
        let mut counts = self.counts.lock();
        let count = counts.entry(kind_name).or_insert(0);
        *count += 1;
        format!("{kind_name}{count}")
    }

    /// How many ids have been issued for `kind_name`.
    pub fn issued(&self, kind_name: &str) -> u64 {
        self.counts.lock().get(kind_name).copied().unwrap_or(0)
    }
}
