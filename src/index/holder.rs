//! Shared index holder with atomic swap-on-rebuild.

use std::path::Path;
use std::sync::Arc;
use std::sync::RwLock;

use tracing::info;
use tracing::warn;

use super::VectorIndex;

/// Holds the currently active [`VectorIndex`], if any.
///
/// "No index" is a first-class state, not an error: first runs and stale
/// deployments serve fallback matches until an index is built. Rebuilds
/// replace the whole `Arc`; readers holding a clone keep querying the
/// snapshot they started with.
#[derive(Default)]
pub struct IndexHolder {
    inner: RwLock<Option<Arc<VectorIndex>>>,
}

impl IndexHolder {
    /// An empty holder (index unavailable).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load the holder from a persisted artifact. A missing or unreadable
    /// artifact yields an empty holder, never an error.
    pub fn from_artifact<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match VectorIndex::load(path) {
            Ok(index) => {
                info!(
                    "Loaded vector index with {} entries from {}",
                    index.len(),
                    path.display()
                );
                Self {
                    inner: RwLock::new(Some(Arc::new(index))),
                }
            }
            Err(e) => {
                warn!(
                    "Vector index artifact not available at {} ({}); running in fallback mode",
                    path.display(),
                    e
                );
                Self::empty()
            }
        }
    }

    /// The active index, or `None` when unavailable or empty.
    pub fn available(&self) -> Option<Arc<VectorIndex>> {
        self.inner
            .read()
            .expect("index holder lock poisoned")
            .as_ref()
            .filter(|idx| !idx.is_empty())
            .cloned()
    }

    /// Atomically replace the active index.
    pub fn swap(&self, index: VectorIndex) {
        let mut guard = self.inner.write().expect("index holder lock poisoned");
        *guard = Some(Arc::new(index));
    }

    /// Drop the active index (e.g. corpus wiped).
    pub fn clear(&self) {
        let mut guard = self.inner.write().expect("index holder lock poisoned");
        *guard = None;
    }
}
