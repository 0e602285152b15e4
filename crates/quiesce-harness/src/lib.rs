//! Reference polling harness for quiesce idling adapters.
//!
//! Stands in for a host test framework: adapters registered through the
//! [`IdlingHarness`] boundary are polled by [`PollingHarness::await_idle`],
//! which blocks the test thread until every watched resource reports idle.
//! An idle-transition callback installed at registration wakes waiters the
//! moment a watcher settles, so the poll interval is only a safety net.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Condvar, Mutex};
use tracing::{debug, trace};

use quiesce::{IdlingAdapter, IdlingHarness};

/// Fallback wake-up interval for [`PollingHarness::await_idle`]. Waiters are
/// normally woken by transition callbacks; this bounds how stale a wait can
/// get if a transition races a registration.
const POLL_INTERVAL: Duration = Duration::from_millis(25);

struct Shared {
    adapters: Mutex<Vec<Arc<IdlingAdapter>>>,
    woken: Condvar,
}

/// A blocking poll-until-idle harness.
///
/// Registering the same adapter name twice keeps both entries; unregister
/// removes every entry under the adapter's name.
pub struct PollingHarness {
    shared: Arc<Shared>,
}

impl PollingHarness {
    /// A harness with no registered adapters.
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                adapters: Mutex::new(Vec::new()),
                woken: Condvar::new(),
            }),
        }
    }

    /// Blocks until every registered adapter reports idle. Returns
    /// immediately if none are registered or all are already idle.
    ///
    /// Deliberately has no timeout: a resource that never settles should
    /// hang the test visibly, not slip past as a false pass.
    pub fn await_idle(&self) {
        let mut adapters = self.shared.adapters.lock();
        loop {
            let pending: Vec<&str> = adapters
                .iter()
                .filter(|adapter| !adapter.is_idle_now())
                .map(|adapter| adapter.name())
                .collect();
            if pending.is_empty() {
                return;
            }
            trace!(?pending, "waiting for busy resources");
            self.shared.woken.wait_for(&mut adapters, POLL_INTERVAL);
        }
    }

    /// Number of adapters currently registered.
    pub fn registered(&self) -> usize {
        self.shared.adapters.lock().len()
    }
}

impl Default for PollingHarness {
    fn default() -> Self {
        Self::new()
    }
}

impl IdlingHarness for PollingHarness {
    fn register(&self, adapter: Arc<IdlingAdapter>) {
        debug!(name = adapter.name(), "registering with polling harness");
        let shared = Arc::clone(&self.shared);
        adapter.on_transition_to_idle(Arc::new(move || {
            shared.woken.notify_all();
        }));
        self.shared.adapters.lock().push(adapter);
    }

    fn unregister(&self, adapter: &IdlingAdapter) {
        debug!(name = adapter.name(), "unregistering from polling harness");
        let mut adapters = self.shared.adapters.lock();
        adapters.retain(|registered| registered.name() != adapter.name());
        // The set being waited on shrank; re-evaluate pending waits.
        self.shared.woken.notify_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiesce::WatcherRegistry;

    #[test]
    fn await_idle_returns_immediately_with_nothing_registered() {
        PollingHarness::new().await_idle();
    }

    #[test]
    fn await_idle_returns_immediately_when_all_idle() {
        let registry = WatcherRegistry::new();
        let harness = PollingHarness::new();
        registry.create_watcher("settled").expect("create");
        registry
            .register_idling_adapter("settled", &harness)
            .expect("register");
        harness.await_idle();
    }

    #[test]
    fn transition_callback_wakes_a_blocked_waiter() {
        use std::thread;

        let registry = WatcherRegistry::new();
        let harness = PollingHarness::new();
        let watcher = registry.create_watcher("slow").expect("create");
        registry
            .register_idling_adapter("slow", &harness)
            .expect("register");
        watcher.busy();

        let worker = {
            let watcher = Arc::clone(&watcher);
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(40));
                watcher.idle().expect("balanced");
            })
        };

        harness.await_idle();
        assert!(watcher.is_idle_now());
        worker.join().expect("worker thread");
    }

    #[test]
    fn unregister_drops_only_the_named_adapter() {
        let registry = WatcherRegistry::new();
        let harness = PollingHarness::new();
        registry.create_watcher("a").expect("create");
        registry.create_watcher("b").expect("create");
        registry.register_idling_adapter("a", &harness).expect("register");
        registry.register_idling_adapter("b", &harness).expect("register");
        assert_eq!(harness.registered(), 2);

        registry
            .unregister_idling_adapter("a", &harness)
            .expect("unregister");
        assert_eq!(harness.registered(), 1);
    }
}
