//! # termbus
//!
//! A terminal-like console driven through a synchronous event bus, so code
//! without a reference to the console can still run commands, print
//! output, report progress and clear it.
//!
//! ## Architecture
//!
//! termbus is organized as a workspace with multiple crates:
//!
//! 1. **termbus-core** - Event vocabulary and the event bus
//! 2. **termbus-console** - Headless console session consuming bus events
//! 3. **termbus-settings** - Configuration files and validation
//! 4. **termbus** - This facade, the built-in command set and the binary

pub mod app;
pub mod runner;

pub use app::App;
pub use runner::BuiltinRunner;

pub use termbus_console::{
    CommandRunner, Console, ConsoleError, History, HistoryEntry, Spinner, SPINNER_FRAMES,
};
pub use termbus_core::{
    listener, EventBus, EventBusConfig, EventKind, Listener, Subscription, SubscriptionGuard,
    SubscriptionId, TerminalEvent,
};
pub use termbus_settings::{BusSettings, Config, ConsoleSettings, SettingsError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Log level used when RUST_LOG is unset or unparsable
const DEFAULT_LOG_FILTER: &str = "info";

fn log_filter(directives: Option<&str>) -> tracing_subscriber::EnvFilter {
    use tracing_subscriber::EnvFilter;

    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Output on stderr, keeping stdout for the console transcript
/// - RUST_LOG environment variable support, `info` when unset
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    let directives = std::env::var(tracing_subscriber::EnvFilter::DEFAULT_ENV).ok();
    let env_filter = log_filter(directives.as_deref());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true)
        .compact();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
