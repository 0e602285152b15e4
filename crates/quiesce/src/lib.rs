//! Busy/idle resource watching for deterministic test synchronization.
//!
//! UI test suites that exercise asynchronous code either sleep and hope, or
//! ask the code under test when it has settled. Quiesce is the asking half:
//! a name-keyed registry of **resource watchers**, each a tiny busy/idle
//! state machine that application code drives around its background work,
//! and that a test harness polls before advancing to the next step.
//!
//! A process-wide mode switch decides, at watcher creation time, whether a
//! watcher actually tracks state (testing) or is an inert no-op
//! (production). Production builds keep their `busy()`/`idle()` call sites
//! and pay nothing for them.
//!
//! # Using this crate
//!
//! Application code brackets asynchronous work with a watcher:
//!
//! ```
//! let registry = quiesce::WatcherRegistry::new();
//! let watcher = registry.create_watcher("image_loader")?;
//!
//! watcher.busy();
//! // ... kick off the background work; the worker calls idle() when done ...
//! assert!(!watcher.is_idle_now());
//! watcher.idle()?;
//! assert!(watcher.is_idle_now());
//! # Ok::<(), quiesce::Error>(())
//! ```
//!
//! Test setup registers an idling adapter with the host harness (anything
//! implementing [`IdlingHarness`]), which then polls the adapter's
//! [`is_idle_now`](IdlingAdapter::is_idle_now) until the watcher settles.
//! The `quiesce-harness` crate ships a reference polling harness.
//!
//! # Behavior by mode
//!
//! | Mode | `busy()` / `idle()` | `is_idle_now()` |
//! |------|---------------------|-----------------|
//! | testing *(default)* | counted; unmatched `idle()` is an error | `true` iff the count is zero |
//! | production | inert, never error | always `true` |
//!
//! Waiting never happens inside this library: every operation is
//! synchronous and non-blocking, and a watcher that never settles hangs the
//! harness's poll loop by design, surfacing stuck work as a hung test
//! rather than a silent false pass.

mod adapter;
mod error;
mod harness;
mod mode;
mod name;
mod registry;
mod watcher;

pub use adapter::IdlingAdapter;
pub use error::{Error, Result};
pub use harness::IdlingHarness;
pub use mode::ModeSwitch;
pub use name::name_of;
pub use registry::{WatcherRegistry, global};
pub use watcher::{IdleCallback, OperatingWatcher, ResourceWatcher};

use std::sync::Arc;

// Process-wide convenience surface over `global()`, for call sites that do
// not thread a registry through.

/// Sets the process-wide testing/production flag. See [`ModeSwitch`].
pub fn set_testing(testing: bool) {
    global().mode().set_testing(testing);
}

/// Reads the process-wide testing/production flag.
pub fn is_testing() -> bool {
    global().mode().is_testing()
}

/// [`WatcherRegistry::create_watcher`] on the global registry.
pub fn create_watcher(name: &str) -> Result<Arc<ResourceWatcher>> {
    global().create_watcher(name)
}

/// [`WatcherRegistry::create_watcher_for`] on the global registry.
pub fn create_watcher_for<T: ?Sized>(resource: &T) -> Result<Arc<ResourceWatcher>> {
    global().create_watcher_for(resource)
}

/// [`WatcherRegistry::get_watcher`] on the global registry.
pub fn get_watcher(name: &str) -> Result<Arc<ResourceWatcher>> {
    global().get_watcher(name)
}

/// [`WatcherRegistry::get_watcher_for`] on the global registry.
pub fn get_watcher_for<T: ?Sized>(resource: &T) -> Result<Arc<ResourceWatcher>> {
    global().get_watcher_for(resource)
}

/// [`WatcherRegistry::register_idling_adapter`] on the global registry.
pub fn register_idling_adapter(
    name: &str,
    harness: &dyn IdlingHarness,
) -> Result<Arc<IdlingAdapter>> {
    global().register_idling_adapter(name, harness)
}

/// [`WatcherRegistry::register_idling_adapter_for`] on the global registry.
pub fn register_idling_adapter_for<T: ?Sized>(
    resource: &T,
    harness: &dyn IdlingHarness,
) -> Result<Arc<IdlingAdapter>> {
    global().register_idling_adapter_for(resource, harness)
}

/// [`WatcherRegistry::unregister_idling_adapter`] on the global registry.
pub fn unregister_idling_adapter(name: &str, harness: &dyn IdlingHarness) -> Result<()> {
    global().unregister_idling_adapter(name, harness)
}

/// [`WatcherRegistry::unregister_idling_adapter_for`] on the global registry.
pub fn unregister_idling_adapter_for<T: ?Sized>(
    resource: &T,
    harness: &dyn IdlingHarness,
) -> Result<()> {
    global().unregister_idling_adapter_for(resource, harness)
}

/// [`WatcherRegistry::reset`] on the global registry. Teardown only.
pub fn reset() {
    global().reset();
}
