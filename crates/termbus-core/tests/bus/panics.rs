use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use termbus_core::{EventBus, EventBusConfig};

#[test]
fn test_panicking_listener_is_isolated() {
    let bus = EventBus::new();
    let after = Arc::new(AtomicUsize::new(0));

    bus.subscribe(|_| panic!("listener failure"));
    let c = after.clone();
    bus.subscribe(move |_| {
        c.fetch_add(1, Ordering::SeqCst);
    });

    assert_eq!(bus.emit_run("help"), 1);
    assert_eq!(after.load(Ordering::SeqCst), 1);

    // The failing listener stays registered
    assert_eq!(bus.subscriber_count(), 2);
    bus.emit_clear();
    assert_eq!(after.load(Ordering::SeqCst), 2);
}

#[test]
fn test_panic_propagates_when_isolation_disabled() {
    let bus = EventBus::with_config(EventBusConfig {
        isolate_listener_panics: false,
    });
    let after = Arc::new(AtomicUsize::new(0));

    bus.subscribe(|_| panic!("listener failure"));
    let c = after.clone();
    bus.subscribe(move |_| {
        c.fetch_add(1, Ordering::SeqCst);
    });

    let emitter = bus.clone();
    let result = std::panic::catch_unwind(AssertUnwindSafe(move || emitter.emit_clear()));
    assert!(result.is_err());
    assert_eq!(after.load(Ordering::SeqCst), 0);

    // The registry lock was not poisoned or left held
    assert_eq!(bus.subscriber_count(), 2);
}
