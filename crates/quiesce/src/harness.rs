//! Boundary with the external test harness.

use std::sync::Arc;

use crate::adapter::IdlingAdapter;

/// Registration entry points of the host test harness.
///
/// The registry hands adapters across this boundary when asked to register
/// or unregister idling tracking. Everything else about the harness — its
/// poll loop, how it blocks test progression — stays on the far side; this
/// library never waits on anything itself.
pub trait IdlingHarness {
    /// Start polling `adapter` before advancing synchronous test steps.
    fn register(&self, adapter: Arc<IdlingAdapter>);

    /// Stop polling a previously registered adapter.
    fn unregister(&self, adapter: &IdlingAdapter);
}
