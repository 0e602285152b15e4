//! Name-keyed registry of resource watchers and idling adapters.

use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

use parking_lot::Mutex;
use tracing::debug;

use crate::adapter::IdlingAdapter;
use crate::error::{Error, Result};
use crate::harness::IdlingHarness;
use crate::mode::ModeSwitch;
use crate::name::name_of;
use crate::watcher::ResourceWatcher;

static GLOBAL: LazyLock<WatcherRegistry> = LazyLock::new(WatcherRegistry::new);

/// The process-wide registry, created lazily on first use.
///
/// Application code generally goes through this one; its mode switch is the
/// process-wide testing/production flag.
pub fn global() -> &'static WatcherRegistry {
    &GLOBAL
}

/// Name-keyed store of watchers, plus the adapters exposing them to the
/// external harness.
///
/// The registry is the sole owner of every watcher and adapter it creates;
/// callers hold shared handles. Watcher and adapter entries live in
/// independent maps keyed by the same names, and neither map evicts
/// automatically — see [`remove_watcher`](Self::remove_watcher) and
/// [`reset`](Self::reset).
///
/// Most code uses [`global()`]; tests that need isolation can hold their own
/// instance, which carries its own mode switch.
pub struct WatcherRegistry {
    mode: ModeSwitch,
    watchers: Mutex<HashMap<String, Arc<ResourceWatcher>>>,
    adapters: Mutex<HashMap<String, Arc<IdlingAdapter>>>,
}

impl WatcherRegistry {
    /// An empty registry in testing mode.
    pub fn new() -> Self {
        Self {
            mode: ModeSwitch::new(),
            watchers: Mutex::new(HashMap::new()),
            adapters: Mutex::new(HashMap::new()),
        }
    }

    /// The mode switch consulted at watcher creation.
    pub fn mode(&self) -> &ModeSwitch {
        &self.mode
    }

    /// Creates a watcher under `name`, stores it, and returns the handle.
    ///
    /// Operating or no-op is decided here from the current mode; flipping
    /// the mode afterwards leaves this watcher as built. Any prior entry
    /// under `name` is replaced outright, not merged — handles to the old
    /// watcher keep working but the registry no longer knows about it.
    ///
    /// Never fails for a non-empty name.
    pub fn create_watcher(&self, name: &str) -> Result<Arc<ResourceWatcher>> {
        valid_name(name)?;
        let watcher = if self.mode.is_testing() {
            Arc::new(ResourceWatcher::operating(name))
        } else {
            Arc::new(ResourceWatcher::noop(name))
        };
        let replaced = self
            .watchers
            .lock()
            .insert(name.to_string(), Arc::clone(&watcher));
        debug!(name, replaced = replaced.is_some(), "created watcher");
        Ok(watcher)
    }

    /// [`create_watcher`](Self::create_watcher) under a name derived from
    /// `resource`'s type. See [`name_of`] for the caveats.
    pub fn create_watcher_for<T: ?Sized>(&self, resource: &T) -> Result<Arc<ResourceWatcher>> {
        self.create_watcher(name_of(resource))
    }

    /// Looks up the watcher created under `name`.
    ///
    /// Never auto-creates: a miss means test setup forgot to call
    /// [`create_watcher`](Self::create_watcher), and comes back as
    /// [`Error::NotFound`] rather than being papered over.
    pub fn get_watcher(&self, name: &str) -> Result<Arc<ResourceWatcher>> {
        valid_name(name)?;
        self.watchers
            .lock()
            .get(name)
            .cloned()
            .ok_or_else(|| Error::NotFound {
                name: name.to_string(),
            })
    }

    /// [`get_watcher`](Self::get_watcher) under a name derived from
    /// `resource`'s type.
    pub fn get_watcher_for<T: ?Sized>(&self, resource: &T) -> Result<Arc<ResourceWatcher>> {
        self.get_watcher(name_of(resource))
    }

    /// Builds an adapter bound to `name`'s watcher, stores it, and hands it
    /// to `harness`, which starts polling it.
    ///
    /// The watcher must already exist ([`Error::NotFound`] otherwise). The
    /// adapter stays bound to the watcher handle resolved here; re-creating
    /// the watcher under the same name requires unregistering and
    /// registering again.
    pub fn register_idling_adapter(
        &self,
        name: &str,
        harness: &dyn IdlingHarness,
    ) -> Result<Arc<IdlingAdapter>> {
        let watcher = self.get_watcher(name)?;
        let adapter = Arc::new(IdlingAdapter::new(name, watcher));
        self.adapters
            .lock()
            .insert(name.to_string(), Arc::clone(&adapter));
        harness.register(Arc::clone(&adapter));
        debug!(name, "registered idling adapter");
        Ok(adapter)
    }

    /// [`register_idling_adapter`](Self::register_idling_adapter) under a
    /// name derived from `resource`'s type.
    pub fn register_idling_adapter_for<T: ?Sized>(
        &self,
        resource: &T,
        harness: &dyn IdlingHarness,
    ) -> Result<Arc<IdlingAdapter>> {
        self.register_idling_adapter(name_of(resource), harness)
    }

    /// Drops `name`'s adapter from the adapter map and hands it to `harness`
    /// for unregistration.
    ///
    /// Lookup and removal happen under one lock acquisition, so an adapter
    /// re-registered concurrently under the same name is never evicted by a
    /// stale unregister. The harness call runs after the lock is released.
    ///
    /// A name with no live adapter is [`Error::NotFound`]: an unmatched
    /// unregister is a teardown bug, not a no-op.
    pub fn unregister_idling_adapter(
        &self,
        name: &str,
        harness: &dyn IdlingHarness,
    ) -> Result<()> {
        valid_name(name)?;
        let adapter = self
            .adapters
            .lock()
            .remove(name)
            .ok_or_else(|| Error::NotFound {
                name: name.to_string(),
            })?;
        harness.unregister(&adapter);
        debug!(name, "unregistered idling adapter");
        Ok(())
    }

    /// [`unregister_idling_adapter`](Self::unregister_idling_adapter) under
    /// a name derived from `resource`'s type.
    pub fn unregister_idling_adapter_for<T: ?Sized>(
        &self,
        resource: &T,
        harness: &dyn IdlingHarness,
    ) -> Result<()> {
        self.unregister_idling_adapter(name_of(resource), harness)
    }

    /// Explicitly evicts `name`'s watcher, returning the handle if one was
    /// present.
    ///
    /// Entries are otherwise kept for the life of the process; long-running
    /// suites that churn through many names can prune with this.
    pub fn remove_watcher(&self, name: &str) -> Option<Arc<ResourceWatcher>> {
        let removed = self.watchers.lock().remove(name);
        if removed.is_some() {
            debug!(name, "removed watcher");
        }
        removed
    }

    /// Clears both maps and restores testing mode. Strictly for teardown
    /// between independent test runs within one process.
    ///
    /// Adapters already handed to a harness are not unregistered here;
    /// unregister them first if the harness outlives the reset.
    pub fn reset(&self) {
        self.watchers.lock().clear();
        self.adapters.lock().clear();
        self.mode.reset();
        debug!("registry reset");
    }
}

impl Default for WatcherRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn valid_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::InvalidInput("name must be non-empty".to_string()));
    }
    Ok(())
}
