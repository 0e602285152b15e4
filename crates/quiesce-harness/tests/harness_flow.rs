//! End-to-end flow: background threads drive watchers while the harness
//! blocks on them, the way a test framework would between steps.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use quiesce::WatcherRegistry;
use quiesce_harness::PollingHarness;

fn init_logging() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[test]
fn harness_waits_for_background_work_to_settle() {
    init_logging();
    let registry = WatcherRegistry::new();
    let harness = PollingHarness::new();

    registry.create_watcher("background_job").expect("create");
    registry
        .register_idling_adapter("background_job", &harness)
        .expect("register");

    let watcher = registry.get_watcher("background_job").expect("get");
    watcher.busy();

    let worker = {
        let watcher = Arc::clone(&watcher);
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(80));
            watcher.idle().expect("balanced");
        })
    };

    harness.await_idle();
    assert!(watcher.is_idle_now());
    worker.join().expect("worker thread");

    registry
        .unregister_idling_adapter("background_job", &harness)
        .expect("unregister");
    assert_eq!(harness.registered(), 0);
}

#[test]
fn harness_waits_on_every_registered_adapter() {
    init_logging();
    let registry = WatcherRegistry::new();
    let harness = PollingHarness::new();

    let names = ["network", "database", "animation"];
    let mut workers = Vec::new();
    for (i, name) in names.iter().enumerate() {
        let watcher = registry.create_watcher(name).expect("create");
        registry
            .register_idling_adapter(name, &harness)
            .expect("register");
        watcher.busy();
        workers.push(thread::spawn(move || {
            thread::sleep(Duration::from_millis(20 * (i as u64 + 1)));
            watcher.idle().expect("balanced");
        }));
    }

    harness.await_idle();
    for name in names {
        assert!(registry.get_watcher(name).expect("get").is_idle_now());
    }
    for worker in workers {
        worker.join().expect("worker thread");
    }
}

#[test]
fn production_mode_never_blocks_the_harness() {
    init_logging();
    let registry = WatcherRegistry::new();
    registry.mode().set_testing(false);

    let harness = PollingHarness::new();
    let watcher = registry.create_watcher("prod_job").expect("create");
    registry
        .register_idling_adapter("prod_job", &harness)
        .expect("register");

    // Unmatched calls on a no-op watcher neither error nor accumulate.
    watcher.busy();
    watcher.busy();
    harness.await_idle();
    watcher.idle().expect("noop never errors");
}
