//! Toolkit collaborator: the GUI layer that owns actual window objects.
//!
//! The server never touches window internals. It holds opaque handles issued by
//! the toolkit and asks the toolkit to create, destroy, or probe them. The
//! bundled `HeadlessToolkit` stands in for a real GUI toolkit so the server can
//! run (and be tested) without a display.

use std::collections::HashSet;
use std::sync::Mutex;

use crate::error::ToolkitError;

/// Opaque reference to a toolkit-owned window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowHandle(u64);

impl WindowHandle {
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Operations the server needs from the windowing toolkit. All calls are
/// synchronous and fast, and may arrive from concurrent connections.
pub trait WindowToolkit: Send + Sync {
    fn create_window(&self) -> Result<WindowHandle, ToolkitError>;
    fn destroy_window(&self, handle: WindowHandle);
    fn is_active(&self, handle: WindowHandle) -> bool;
}

/// In-process toolkit: tracks live handles and treats the most recently
/// created live window as the active one.
pub struct HeadlessToolkit {
    state: Mutex<HeadlessState>,
}

#[derive(Default)]
struct HeadlessState {
    next: u64,
    live: HashSet<u64>,
    focused: Option<u64>,
}

impl HeadlessToolkit {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(HeadlessState::default()),
        }
    }

    /// How many windows the toolkit currently owns.
    pub fn live_count(&self) -> usize {
        self.state.lock().unwrap().live.len()
    }
}

impl Default for HeadlessToolkit {
    fn default() -> Self {
        Self::new()
    }
}

impl WindowToolkit for HeadlessToolkit {
    fn create_window(&self) -> Result<WindowHandle, ToolkitError> {
        let mut state = self.state.lock().unwrap();
        state.next += 1;
        let id = state.next;
        state.live.insert(id);
        state.focused = Some(id);
        tracing::debug!(handle = id, "window created");
        Ok(WindowHandle(id))
    }

    fn destroy_window(&self, handle: WindowHandle) {
        let mut state = self.state.lock().unwrap();
        if !state.live.remove(&handle.0) {
            tracing::warn!(handle = handle.0, "destroy of unknown window handle");
            return;
        }
        if state.focused == Some(handle.0) {
            state.focused = state.live.iter().max().copied();
        }
        tracing::debug!(handle = handle.0, "window destroyed");
    }

    fn is_active(&self, handle: WindowHandle) -> bool {
        self.state.lock().unwrap().focused == Some(handle.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn created_window_is_live_and_active() {
        let toolkit = HeadlessToolkit::new();
        let handle = toolkit.create_window().unwrap();
        assert_eq!(toolkit.live_count(), 1);
        assert!(toolkit.is_active(handle));
    }

    #[test]
    fn newest_window_takes_focus() {
        let toolkit = HeadlessToolkit::new();
        let first = toolkit.create_window().unwrap();
        let second = toolkit.create_window().unwrap();
        assert!(!toolkit.is_active(first));
        assert!(toolkit.is_active(second));
    }

    #[test]
    fn destroy_moves_focus_to_survivor() {
        let toolkit = HeadlessToolkit::new();
        let first = toolkit.create_window().unwrap();
        let second = toolkit.create_window().unwrap();
        toolkit.destroy_window(second);
        assert!(toolkit.is_active(first));
        assert_eq!(toolkit.live_count(), 1);
    }

    #[test]
    fn destroy_unknown_handle_is_harmless() {
        let toolkit = HeadlessToolkit::new();
        let handle = toolkit.create_window().unwrap();
        toolkit.destroy_window(handle);
        toolkit.destroy_window(handle);
        assert_eq!(toolkit.live_count(), 0);
        assert!(!toolkit.is_active(handle));
    }
}
