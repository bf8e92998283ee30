use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use termbus_core::{listener, EventBus, Listener};

fn counting_listener() -> (Listener, Arc<AtomicUsize>) {
    let count = Arc::new(AtomicUsize::new(0));
    let c = count.clone();
    let l = listener(move |_| {
        c.fetch_add(1, Ordering::SeqCst);
    });
    (l, count)
}

#[test]
fn test_double_subscribe_invokes_once() {
    let bus = EventBus::new();
    let (l, count) = counting_listener();

    bus.subscribe_listener(&l);
    bus.subscribe_listener(&l);
    assert_eq!(bus.subscriber_count(), 1);

    bus.emit_run("help");
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[test]
fn test_handle_removes_exactly_its_listener() {
    let bus = EventBus::new();
    let (a, count_a) = counting_listener();
    let (b, count_b) = counting_listener();

    let sub_a = bus.subscribe_listener(&a);
    bus.subscribe_listener(&b);

    sub_a.unsubscribe();
    sub_a.unsubscribe();
    assert_eq!(bus.subscriber_count(), 1);

    bus.emit_clear();
    assert_eq!(count_a.load(Ordering::SeqCst), 0);
    assert_eq!(count_b.load(Ordering::SeqCst), 1);
}

#[test]
fn test_unsubscribe_then_emit_delivers_nothing() {
    let bus = EventBus::new();
    let (a, count) = counting_listener();

    bus.subscribe_listener(&a);
    assert!(bus.unsubscribe_listener(&a));
    bus.emit_clear();

    assert_eq!(count.load(Ordering::SeqCst), 0);
}

#[test]
fn test_unsubscribe_unknown_listener_is_noop() {
    let bus = EventBus::new();
    let (registered, count) = counting_listener();
    let (stranger, _) = counting_listener();
    bus.subscribe_listener(&registered);

    assert!(!bus.unsubscribe_listener(&stranger));
    assert_eq!(bus.subscriber_count(), 1);

    bus.emit_cast("still here");
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[test]
fn test_resubscribe_after_unsubscribe() {
    let bus = EventBus::new();
    let (a, count) = counting_listener();

    let first = bus.subscribe_listener(&a);
    first.unsubscribe();
    let second = bus.subscribe_listener(&a);

    assert_ne!(first.id(), second.id());
    assert!(second.is_active());
    // The stale handle must not remove the new registration
    first.unsubscribe();
    assert!(bus.is_subscribed(&a));

    bus.emit_run("again");
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[test]
fn test_invoked_set_matches_registered_set() {
    let bus = EventBus::new();
    let listeners: Vec<_> = (0..6).map(|_| counting_listener()).collect();
    let subs: Vec<_> = listeners
        .iter()
        .map(|(l, _)| bus.subscribe_listener(l))
        .collect();

    // Drop every odd registration, one of them twice
    for (i, sub) in subs.iter().enumerate() {
        if i % 2 == 1 {
            sub.unsubscribe();
        }
    }
    subs[1].unsubscribe();
    bus.unsubscribe_listener(&listeners[3].0);

    bus.emit_run("probe");

    for (i, (l, count)) in listeners.iter().enumerate() {
        let expected = usize::from(i % 2 == 0);
        assert_eq!(count.load(Ordering::SeqCst), expected, "listener {}", i);
        assert_eq!(bus.is_subscribed(l), i % 2 == 0);
    }
}
