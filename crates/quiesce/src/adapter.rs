//! The idling adapter handed to the external test harness.

use std::sync::Arc;

use crate::watcher::{IdleCallback, ResourceWatcher};

/// Exposes one watcher's idle state to the external test harness.
///
/// The harness polls [`is_idle_now`](Self::is_idle_now) before advancing
/// synchronous test steps, and may install a transition callback to learn of
/// idleness the moment it happens instead of on the next poll.
///
/// The adapter is bound to the watcher handle that existed when it was
/// registered. Re-creating a watcher under the same name does not rebind a
/// live adapter; unregister and register again.
pub struct IdlingAdapter {
    name: String,
    watcher: Arc<ResourceWatcher>,
}

impl IdlingAdapter {
    pub(crate) fn new(name: impl Into<String>, watcher: Arc<ResourceWatcher>) -> Self {
        Self {
            name: name.into(),
            watcher,
        }
    }

    /// Stable identity, for harness logs.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Polled repeatedly by the harness.
    pub fn is_idle_now(&self) -> bool {
        self.watcher.is_idle_now()
    }

    /// Installs `callback` as the bound watcher's idle-transition listener.
    ///
    /// The Operating watcher invokes it exactly once per busy → idle
    /// transition. Same single slot as
    /// [`ResourceWatcher::on_transition_to_idle`]: last attached wins.
    pub fn on_transition_to_idle(&self, callback: IdleCallback) {
        self.watcher.on_transition_to_idle(callback);
    }
}
