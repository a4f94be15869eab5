use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};

use crate::drawer::GizmoManager;
use crate::error::GizmoResult;
use crate::replay::{GizmoDevice, ReplayStats};
use crate::settings::GizmoSettings;
use crate::stream::CommandStream;

/// A [`GizmoManager`] shared between host callbacks.
///
/// The lock is taken once per phase (one recording pass, one present),
/// never per draw call. Clones refer to the same manager.
#[derive(Clone)]
pub struct SharedGizmoManager {
    inner: Arc<Mutex<GizmoManager>>,
}

impl SharedGizmoManager {
    pub fn new(manager: GizmoManager) -> Self {
        Self {
            inner: Arc::new(Mutex::new(manager)),
        }
    }

    pub fn from_settings(settings: GizmoSettings) -> Self {
        Self::new(GizmoManager::new(settings))
    }

    /// Lock the manager for lifecycle or registry calls.
    pub fn lock(&self) -> MutexGuard<'_, GizmoManager> {
        self.inner.lock()
    }

    /// Record into the back stream under a single lock.
    ///
    /// Returns `None` while the manager is inactive.
    pub fn with_back_stream<R>(&self, f: impl FnOnce(&mut CommandStream) -> R) -> Option<R> {
        let mut manager = self.inner.lock();
        manager.back_stream().map(f)
    }

    /// Run the registered producers. See [`GizmoManager::record`].
    pub fn record(&self) -> usize {
        self.inner.lock().record()
    }

    /// Swap if needed and replay. See [`GizmoManager::present`].
    pub fn present<D: GizmoDevice + ?Sized>(&self, device: &mut D) -> GizmoResult<ReplayStats> {
        self.inner.lock().present(device)
    }
}

impl std::fmt::Debug for SharedGizmoManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.inner.try_lock() {
            Some(manager) => f.debug_tuple("SharedGizmoManager").field(&*manager).finish(),
            None => f.write_str("SharedGizmoManager(<locked>)"),
        }
    }
}
