//! # termbus Core
//!
//! The terminal event bus: the event vocabulary shared by producers and
//! consumers, and the synchronous dispatcher that connects them.

pub mod event_bus;

pub use event_bus::{
    listener, EventBus, EventBusConfig, EventKind, Listener, Subscription, SubscriptionGuard,
    SubscriptionId, TerminalEvent,
};
