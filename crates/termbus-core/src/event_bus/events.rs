//! Event type definitions for the terminal bus.
//!
//! Every emission carries exactly one [`TerminalEvent`]. Listeners receive all
//! of them and discriminate by variant; there is no filtering on the bus side.
//! Events are cloneable and serializable for logging/replay.

use serde::{Deserialize, Serialize};

/// Events a terminal surface reacts to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TerminalEvent {
    /// Request to execute a command.
    Run {
        /// Command line to run.
        cmd: String,
    },
    /// Append a command/response pair to the output.
    Print {
        /// Originating command (may be empty when not relevant).
        cmd: String,
        /// Response text to show under the command.
        resp: String,
    },
    /// Status or progress message shown while a command is running.
    Cast {
        /// Message text.
        text: String,
    },
    /// Reset the output history.
    Clear,
}

impl TerminalEvent {
    /// Build a run request
    pub fn run(cmd: impl Into<String>) -> Self {
        TerminalEvent::Run { cmd: cmd.into() }
    }

    /// Build a print record
    pub fn print(cmd: impl Into<String>, resp: impl Into<String>) -> Self {
        TerminalEvent::Print {
            cmd: cmd.into(),
            resp: resp.into(),
        }
    }

    /// Build a progress message
    pub fn cast(text: impl Into<String>) -> Self {
        TerminalEvent::Cast { text: text.into() }
    }

    /// Get the tag of this event
    pub fn kind(&self) -> EventKind {
        match self {
            TerminalEvent::Run { .. } => EventKind::Run,
            TerminalEvent::Print { .. } => EventKind::Print,
            TerminalEvent::Cast { .. } => EventKind::Cast,
            TerminalEvent::Clear => EventKind::Clear,
        }
    }

    /// Get a short description of this event for logging
    pub fn description(&self) -> String {
        match self {
            TerminalEvent::Run { cmd } => format!("Run `{}`", cmd),
            TerminalEvent::Print { cmd, resp } => {
                format!("Print `{}` ({} bytes of output)", cmd, resp.len())
            }
            TerminalEvent::Cast { text } => format!("Cast \"{}\"", text),
            TerminalEvent::Clear => "Clear".to_string(),
        }
    }
}

/// Variant tag of a [`TerminalEvent`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    /// Command execution request.
    Run,
    /// Command/response record.
    Print,
    /// Progress message.
    Cast,
    /// History reset.
    Clear,
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventKind::Run => write!(f, "run"),
            EventKind::Print => write!(f, "print"),
            EventKind::Cast => write!(f, "cast"),
            EventKind::Clear => write!(f, "clear"),
        }
    }
}
