//! # Event Bus Module
//!
//! In-process publish/subscribe for driving a terminal surface without a
//! direct reference to it.
//!
//! ## Overview
//!
//! - Publishers emit [`TerminalEvent`]s without knowing subscribers
//! - Every listener receives every event, synchronously, in registration order
//! - Unsubscribing is idempotent, both by handle and by listener identity
//!
//! ## Usage
//!
//! ```rust
//! use termbus_core::event_bus::{EventBus, TerminalEvent};
//!
//! let bus = EventBus::new();
//!
//! let subscription = bus.subscribe(|event| match event {
//!     TerminalEvent::Run { cmd } => println!("run {}", cmd),
//!     TerminalEvent::Print { cmd, resp } => println!("{} => {}", cmd, resp),
//!     TerminalEvent::Cast { text } => println!("... {}", text),
//!     TerminalEvent::Clear => println!("clear"),
//! });
//!
//! bus.emit_run("help");
//! bus.emit_print("echo foo", "foo");
//! bus.emit_cast("Fetching data");
//! bus.emit_clear();
//!
//! // Unsubscribe when done
//! subscription.unsubscribe();
//! ```

mod bus;
mod events;

pub use bus::*;
pub use events::*;
