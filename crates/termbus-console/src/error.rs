//! Error types for the console crate.

use thiserror::Error;

/// Errors raised while wiring a console to the bus
#[derive(Error, Debug)]
pub enum ConsoleError {
    /// Run events spawn the command runner, which needs a tokio runtime
    #[error("No tokio runtime available to execute bus commands")]
    NoRuntime,
}

/// Result type alias for console operations.
pub type ConsoleResult<T> = Result<T, ConsoleError>;
