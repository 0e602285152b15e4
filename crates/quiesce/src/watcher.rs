//! Busy/idle state machine for a single named resource.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use tracing::trace;

use crate::error::{Error, Result};

/// Callback invoked when an Operating watcher transitions busy → idle.
///
/// `Arc` rather than `Box` so the watcher can clone it out of the listener
/// slot and invoke it without holding the slot lock.
pub type IdleCallback = Arc<dyn Fn() + Send + Sync + 'static>;

/// Tracks whether a named unit of work is currently in flight.
///
/// Two variants share one surface: [`Operating`](Self::Operating) counts
/// matched `busy()`/`idle()` calls and notifies a listener on the transition
/// back to idle; [`NoOp`](Self::NoOp) ignores everything and always reports
/// idle, so production code pays no bookkeeping cost. Which one you get is
/// decided by the registry from the mode flag at creation time.
pub enum ResourceWatcher {
    /// Real tracking, used while the mode flag reads testing.
    Operating(OperatingWatcher),
    /// Inert, used in production. Never errors, always idle.
    NoOp {
        /// Name the watcher was created under.
        name: String,
    },
}

impl ResourceWatcher {
    pub(crate) fn operating(name: impl Into<String>) -> Self {
        Self::Operating(OperatingWatcher {
            name: name.into(),
            busy_count: AtomicU64::new(0),
            on_idle: Mutex::new(None),
        })
    }

    pub(crate) fn noop(name: impl Into<String>) -> Self {
        Self::NoOp { name: name.into() }
    }

    /// Name the watcher was created under.
    pub fn name(&self) -> &str {
        match self {
            Self::Operating(w) => &w.name,
            Self::NoOp { name } => name,
        }
    }

    /// Marks one more unit of work in flight. Nested busy regions are fine;
    /// the watcher reports idle again once every call is matched.
    pub fn busy(&self) {
        match self {
            Self::Operating(w) => w.busy(),
            Self::NoOp { .. } => {}
        }
    }

    /// Marks one unit of work finished.
    ///
    /// An unmatched call (busy count already zero) comes back as
    /// [`Error::UnbalancedIdle`] with the count left at zero. That is a bug
    /// in the caller's instrumentation, and surfacing it here beats chasing
    /// a watcher that never reports idle. NoOp watchers never fail.
    pub fn idle(&self) -> Result<()> {
        match self {
            Self::Operating(w) => w.idle(),
            Self::NoOp { .. } => Ok(()),
        }
    }

    /// `true` iff no work is outstanding. Pure query; always `true` for
    /// NoOp watchers.
    pub fn is_idle_now(&self) -> bool {
        match self {
            Self::Operating(w) => w.busy_count.load(Ordering::Acquire) == 0,
            Self::NoOp { .. } => true,
        }
    }

    /// Installs the busy → idle transition listener.
    ///
    /// A single slot, last attached wins. The listener is invoked exactly
    /// once per transition to idle, not once ever. Ignored by NoOp watchers.
    pub fn on_transition_to_idle(&self, callback: IdleCallback) {
        match self {
            Self::Operating(w) => *w.on_idle.lock() = Some(callback),
            Self::NoOp { .. } => {}
        }
    }
}

// Manual impl: the callback slot has no Debug.
impl fmt::Debug for ResourceWatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Operating(w) => f
                .debug_struct("Operating")
                .field("name", &w.name)
                .field("busy_count", &w.busy_count.load(Ordering::Acquire))
                .finish_non_exhaustive(),
            Self::NoOp { name } => f.debug_struct("NoOp").field("name", name).finish(),
        }
    }
}

/// State for the Operating variant of [`ResourceWatcher`].
pub struct OperatingWatcher {
    name: String,
    busy_count: AtomicU64,
    on_idle: Mutex<Option<IdleCallback>>,
}

impl OperatingWatcher {
    fn busy(&self) {
        let prev = self.busy_count.fetch_add(1, Ordering::AcqRel);
        trace!(name = %self.name, count = prev + 1, "busy");
    }

    fn idle(&self) -> Result<()> {
        // CAS loop rather than fetch_sub: an unmatched idle() must be
        // detected without ever letting the counter dip below zero, even
        // with concurrent callers racing on the same watcher.
        let mut current = self.busy_count.load(Ordering::Acquire);
        loop {
            if current == 0 {
                return Err(Error::UnbalancedIdle {
                    name: self.name.clone(),
                });
            }
            match self.busy_count.compare_exchange_weak(
                current,
                current - 1,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => break,
                Err(observed) => current = observed,
            }
        }
        trace!(name = %self.name, count = current - 1, "idle");

        if current == 1 {
            // Only the decrement that took the count 1 → 0 gets here, so the
            // listener fires exactly once per transition. Clone the callback
            // out of the slot so it runs without the lock held.
            let callback = self.on_idle.lock().clone();
            if let Some(callback) = callback {
                callback();
            }
        }
        Ok(())
    }
}
