//! # termbus Console
//!
//! Headless terminal session driven by the termbus event bus: output
//! history, command execution through a pluggable runner, progress
//! messages with a spinner, and input recall.

pub mod console;
pub mod error;
pub mod history;
pub mod runner;
pub mod spinner;

pub use console::Console;
pub use error::{ConsoleError, ConsoleResult};
pub use history::{History, HistoryEntry};
pub use runner::CommandRunner;
pub use spinner::{Spinner, SPINNER_FRAMES};
