//! Striped write locks
//!
//! A fixed arena of async mutexes. Each `(kind, id)` hashes to one stripe, so
//! writers to the same resource are serialized while unrelated resources
//! almost always proceed in parallel. The arena never grows and needs no
//! cleanup.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use tokio::sync::{Mutex, MutexGuard};

use crate::storage::ResourceKind;

/// Stripe count used when none is configured
pub const DEFAULT_STRIPES: usize = 64;

pub struct StripedLocks {
    stripes: Vec<Mutex<()>>,
}

impl StripedLocks {
    /// Create an arena with `count` stripes (at least one)
    pub fn new(count: usize) -> Self {
        let stripes = (0..count.max(1)).map(|_| Mutex::new(())).collect();
        Self { stripes }
    }

    /// Index of the stripe guarding the given resource
    pub fn stripe_index(&self, kind: ResourceKind, id: &str) -> usize {
        let mut hasher = DefaultHasher::new();
        kind.hash(&mut hasher);
        id.hash(&mut hasher);
        (hasher.finish() % self.stripes.len() as u64) as usize
    }

    /// Wait for exclusive access to the given resource
    pub async fn lock(&self, kind: ResourceKind, id: &str) -> MutexGuard<'_, ()> {
        self.stripes[self.stripe_index(kind, id)].lock().await
    }
}
