//! Process-wide projection cache.
//!
//! Maps (source width, target width, device, precision) to a previously
//! built [`Projection`]. The mutex is held across the build, so racing
//! callers for the same missing key cannot construct duplicates: at most
//! one transform exists per distinct key for the life of the process.
//! Entries are never evicted; the key space in practice is one device, one
//! precision, and one or two width pairs per session.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;
use seam_core::{DType, Device};

use crate::projection::Projection;

/// Identity of a repair transform. Two keys are equal iff all four fields
/// are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProjectionKey {
    /// Feature width of the tensor arriving from the pipeline.
    pub source: usize,
    /// Feature width the model expects.
    pub target: usize,
    /// Device the conditioning tensor lives on.
    pub device: Device,
    /// Precision the conditioning tensor is declared at.
    pub dtype: DType,
}

/// Keyed get-or-build store of repair transforms.
pub struct ProjectionCache {
    entries: Mutex<HashMap<ProjectionKey, Arc<Projection>>>,
}

impl ProjectionCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Return the transform for `key`, building it on first use.
    ///
    /// Hits return the stored instance; misses build exactly once and log
    /// the construction.
    pub fn get_or_build(&self, key: ProjectionKey) -> Arc<Projection> {
        let mut map = self.entries.lock();
        if let Some(p) = map.get(&key) {
            return Arc::clone(p);
        }
        tracing::info!(
            "building {}→{} repair projection on {} ({}, {} weight bytes)",
            key.source,
            key.target,
            key.device,
            key.dtype,
            key.source * key.target * key.dtype.element_size(),
        );
        let p = Arc::new(Projection::build(key.source, key.target, key.device, key.dtype));
        map.insert(key, Arc::clone(&p));
        p
    }

    /// Number of cached transforms.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether no transform has been built yet.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl Default for ProjectionCache {
    fn default() -> Self {
        Self::new()
    }
}

/// The process-wide cache shared by every interceptor.
pub fn global() -> &'static ProjectionCache {
    static CACHE: OnceLock<ProjectionCache> = OnceLock::new();
    CACHE.get_or_init(ProjectionCache::new)
}
