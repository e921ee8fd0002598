//! Window registry: maps identifiers to live toolkit handles.
//!
//! This is the only shared mutable state in the server. Identifier allocation,
//! removal, and the active-window scan all run under one mutex, so concurrent
//! connections can never observe a duplicate identifier or a half-removed
//! registration.

use std::collections::BTreeMap;
use std::sync::Mutex;

use tracing::debug;

use crate::error::RegistryError;
use crate::toolkit::{WindowHandle, WindowToolkit};

/// Sentinel identifier meaning "no active window".
pub const NO_ACTIVE_WINDOW: &str = "-1";

/// Thread-safe identifier → window handle store.
pub struct WindowRegistry {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    /// Counter backing identifier allocation. Monotonic, never reset, so an
    /// identifier is never reissued even after its window is removed.
    next_id: u64,
    windows: BTreeMap<String, WindowHandle>,
}

impl WindowRegistry {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
        }
    }

    /// Register a handle under a freshly allocated identifier and return it.
    pub fn create(&self, handle: WindowHandle) -> String {
        let mut inner = self.inner.lock().unwrap();
        inner.next_id += 1;
        let id = format!("w{}", inner.next_id);
        inner.windows.insert(id.clone(), handle);
        debug!(id = %id, "window registered");
        id
    }

    pub fn lookup(&self, id: &str) -> Option<WindowHandle> {
        self.inner.lock().unwrap().windows.get(id).copied()
    }

    /// Disassociate an identifier, returning its handle. Unknown or
    /// already-removed identifiers report `NotFound` rather than succeeding
    /// silently.
    pub fn remove(&self, id: &str) -> Result<WindowHandle, RegistryError> {
        let mut inner = self.inner.lock().unwrap();
        match inner.windows.remove(id) {
            Some(handle) => {
                debug!(id = %id, "window unregistered");
                Ok(handle)
            }
            None => Err(RegistryError::NotFound(id.to_string())),
        }
    }

    /// Identifier of the first registered window the toolkit reports active,
    /// or the `"-1"` sentinel. Scan order is the map's key order, so a given
    /// registry state always scans the same way.
    pub fn find_active(&self, toolkit: &dyn WindowToolkit) -> String {
        let inner = self.inner.lock().unwrap();
        for (id, handle) in &inner.windows {
            if toolkit.is_active(*handle) {
                debug!(id = %id, "active window");
                return id.clone();
            }
        }
        debug!("no active window");
        NO_ACTIVE_WINDOW.to_string()
    }

    /// Destroy every remaining window and empty the registry. Shutdown path.
    pub fn drain(&self, toolkit: &dyn WindowToolkit) {
        let windows = std::mem::take(&mut self.inner.lock().unwrap().windows);
        for (id, handle) in windows {
            debug!(id = %id, "destroying window on shutdown");
            toolkit.destroy_window(handle);
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for WindowRegistry {
    fn default() -> Self {
        Self::new()
    }
}
