//! Event Bus implementation.
//!
//! Provides the [`EventBus`] handle, listener registration and synchronous
//! fan-out of [`TerminalEvent`]s to every registered listener.

use parking_lot::RwLock;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use uuid::Uuid;

use super::events::TerminalEvent;

/// Callback invoked for every emitted event.
///
/// Listener identity is the identity of the `Arc` allocation: clones of the
/// same `Listener` are the same listener.
pub type Listener = Arc<dyn Fn(&TerminalEvent) + Send + Sync>;

/// Wrap a closure into a [`Listener`]
pub fn listener<F>(handler: F) -> Listener
where
    F: Fn(&TerminalEvent) + Send + Sync + 'static,
{
    Arc::new(handler)
}

fn same_listener(a: &Listener, b: &Listener) -> bool {
    std::ptr::eq(Arc::as_ptr(a) as *const (), Arc::as_ptr(b) as *const ())
}

/// Identifier of a single registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    /// Create a new unique subscription ID
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sub({})", &self.0.to_string()[..8])
    }
}

/// Configuration for the event bus
#[derive(Debug, Clone)]
pub struct EventBusConfig {
    /// Catch a panicking listener, log it and keep delivering to the rest.
    ///
    /// When false the panic unwinds out of the emitting call and listeners
    /// after the failing one do not see the event.
    pub isolate_listener_panics: bool,
}

impl Default for EventBusConfig {
    fn default() -> Self {
        Self {
            isolate_listener_panics: true,
        }
    }
}

#[derive(Clone)]
struct Registration {
    id: SubscriptionId,
    listener: Listener,
    /// Cleared on removal so an in-flight emission skips this listener.
    active: Arc<AtomicBool>,
}

struct Shared {
    registry: RwLock<Vec<Registration>>,
    config: EventBusConfig,
}

impl Shared {
    fn remove(&self, id: SubscriptionId) -> bool {
        let mut registry = self.registry.write();
        match registry.iter().position(|r| r.id == id) {
            Some(index) => {
                let registration = registry.remove(index);
                registration.active.store(false, Ordering::Release);
                tracing::debug!("Subscription {} removed", id);
                true
            }
            None => false,
        }
    }
}

/// Handle returned by the subscribe calls.
///
/// Calling [`Subscription::unsubscribe`] removes exactly the listener it was
/// created for; further calls do nothing. Dropping the handle leaves the
/// listener registered, use [`Subscription::guard`] for scoped registration.
#[derive(Clone)]
pub struct Subscription {
    id: SubscriptionId,
    bus: Weak<Shared>,
    active: Arc<AtomicBool>,
}

impl Subscription {
    /// Registration this handle controls
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Whether the listener is still registered
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Remove the listener from the bus. Idempotent.
    pub fn unsubscribe(&self) {
        if !self.is_active() {
            return;
        }
        if let Some(bus) = self.bus.upgrade() {
            bus.remove(self.id);
        }
        self.active.store(false, Ordering::Release);
    }

    /// Turn this handle into a guard that unsubscribes when dropped
    pub fn guard(self) -> SubscriptionGuard {
        SubscriptionGuard(self)
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}

/// Unsubscribes its listener on drop
#[derive(Debug)]
pub struct SubscriptionGuard(Subscription);

impl SubscriptionGuard {
    /// Borrow the underlying handle
    pub fn subscription(&self) -> &Subscription {
        &self.0
    }
}

impl Drop for SubscriptionGuard {
    fn drop(&mut self) {
        self.0.unsubscribe();
    }
}

/// Synchronous, ordered, multi-listener event bus.
///
/// Cloning is cheap and yields a handle to the same registry. Listeners run
/// on the emitting thread in registration order; the registry lock is not
/// held while they run, so a listener may subscribe, unsubscribe or emit.
#[derive(Clone)]
pub struct EventBus {
    inner: Arc<Shared>,
}

impl EventBus {
    /// Create a new event bus with default configuration
    pub fn new() -> Self {
        Self::with_config(EventBusConfig::default())
    }

    /// Create a new event bus with custom configuration
    pub fn with_config(config: EventBusConfig) -> Self {
        Self {
            inner: Arc::new(Shared {
                registry: RwLock::new(Vec::new()),
                config,
            }),
        }
    }

    /// Subscribe a closure. Every call registers a new listener.
    pub fn subscribe<F>(&self, handler: F) -> Subscription
    where
        F: Fn(&TerminalEvent) + Send + Sync + 'static,
    {
        self.subscribe_listener(&listener(handler))
    }

    /// Subscribe a shared listener.
    ///
    /// Registering a listener that is already registered keeps the single
    /// existing registration and returns a handle to it.
    pub fn subscribe_listener(&self, listener: &Listener) -> Subscription {
        let mut registry = self.inner.registry.write();

        if let Some(existing) = registry.iter().find(|r| same_listener(&r.listener, listener)) {
            tracing::debug!("Subscription {} already registered", existing.id);
            return self.handle_for(existing);
        }

        let registration = Registration {
            id: SubscriptionId::new(),
            listener: Arc::clone(listener),
            active: Arc::new(AtomicBool::new(true)),
        };
        let handle = self.handle_for(&registration);
        tracing::debug!("Subscription {} added", registration.id);
        registry.push(registration);
        handle
    }

    fn handle_for(&self, registration: &Registration) -> Subscription {
        Subscription {
            id: registration.id,
            bus: Arc::downgrade(&self.inner),
            active: Arc::clone(&registration.active),
        }
    }

    /// Unsubscribe by registration id
    ///
    /// Returns true if the subscription was found and removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.inner.remove(id)
    }

    /// Unsubscribe by listener identity
    ///
    /// Returns true if the listener was registered. Unknown listeners are ignored.
    pub fn unsubscribe_listener(&self, listener: &Listener) -> bool {
        let id = self
            .inner
            .registry
            .read()
            .iter()
            .find(|r| same_listener(&r.listener, listener))
            .map(|r| r.id);

        match id {
            Some(id) => self.inner.remove(id),
            None => false,
        }
    }

    /// Whether this listener is currently registered
    pub fn is_subscribed(&self, listener: &Listener) -> bool {
        self.inner
            .registry
            .read()
            .iter()
            .any(|r| same_listener(&r.listener, listener))
    }

    /// Get the number of active subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.inner.registry.read().len()
    }

    /// Get the current configuration
    pub fn config(&self) -> &EventBusConfig {
        &self.inner.config
    }

    /// Deliver an event to every listener registered when the call starts.
    ///
    /// Returns the number of listeners that handled the event without
    /// panicking. With no listeners this is a no-op returning 0.
    pub fn publish(&self, event: TerminalEvent) -> usize {
        let snapshot: Vec<Registration> = self.inner.registry.read().clone();
        tracing::trace!(
            kind = %event.kind(),
            listeners = snapshot.len(),
            "Publishing {}",
            event.description()
        );

        let mut delivered = 0;
        for registration in &snapshot {
            // Removed by an earlier listener during this emission
            if !registration.active.load(Ordering::Acquire) {
                continue;
            }

            if !self.inner.config.isolate_listener_panics {
                (registration.listener)(&event);
                delivered += 1;
                continue;
            }

            match panic::catch_unwind(AssertUnwindSafe(|| (registration.listener)(&event))) {
                Ok(()) => delivered += 1,
                Err(payload) => {
                    tracing::error!(
                        subscription = %registration.id,
                        kind = %event.kind(),
                        "Listener panicked: {}",
                        panic_message(payload.as_ref())
                    );
                }
            }
        }
        delivered
    }

    /// Ask the terminal to run a command
    pub fn emit_run(&self, cmd: impl Into<String>) -> usize {
        self.publish(TerminalEvent::run(cmd))
    }

    /// Append a command/response pair to the terminal output
    pub fn emit_print(&self, cmd: impl Into<String>, resp: impl Into<String>) -> usize {
        self.publish(TerminalEvent::print(cmd, resp))
    }

    /// Send a status/progress message
    pub fn emit_cast(&self, text: impl Into<String>) -> usize {
        self.publish(TerminalEvent::cast(text))
    }

    /// Ask the terminal to clear its history
    pub fn emit_clear(&self) -> usize {
        self.publish(TerminalEvent::Clear)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscriber_count())
            .field("config", &self.inner.config)
            .finish()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        msg
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.as_str()
    } else {
        "non-string panic payload"
    }
}
