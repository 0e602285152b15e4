//! Testing/production mode switch.

use std::sync::atomic::{AtomicBool, Ordering};

/// Flag selecting watcher behavior at creation time.
///
/// Defaults to testing. The registry reads the flag once per
/// [`create_watcher`](crate::WatcherRegistry::create_watcher) call; flipping
/// it afterwards never retags watchers that already exist.
///
/// This is a single scalar, not a guarded critical section: stores and loads
/// are individually atomic and that is all the contract requires.
#[derive(Debug)]
pub struct ModeSwitch {
    testing: AtomicBool,
}

impl ModeSwitch {
    /// A fresh switch, in testing mode.
    pub const fn new() -> Self {
        Self {
            testing: AtomicBool::new(true),
        }
    }

    /// `true` while testing: new watchers track real busy/idle state.
    /// `false` in production: new watchers are inert no-ops.
    pub fn set_testing(&self, testing: bool) {
        self.testing.store(testing, Ordering::Release);
    }

    /// Current flag value.
    pub fn is_testing(&self) -> bool {
        self.testing.load(Ordering::Acquire)
    }

    /// Restores the default (testing). For teardown between test runs.
    pub fn reset(&self) {
        self.set_testing(true);
    }
}

impl Default for ModeSwitch {
    fn default() -> Self {
        Self::new()
    }
}
