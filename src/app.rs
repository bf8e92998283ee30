//! Composition root: owns the bus and wires the console and built-in
//! commands to it.

use crate::runner::BuiltinRunner;
use std::sync::Arc;
use termbus_console::Console;
use termbus_core::{EventBus, EventBusConfig, SubscriptionGuard, TerminalEvent};
use termbus_settings::Config;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

/// A bus with a console attached to it
pub struct App {
    bus: EventBus,
    console: Arc<Console>,
    _subscriptions: Vec<SubscriptionGuard>,
}

impl App {
    /// Build the bus and attach the console. Must run inside a tokio runtime.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let bus = EventBus::with_config(EventBusConfig {
            isolate_listener_panics: config.bus.isolate_listener_panics,
        });

        let runner = Arc::new(BuiltinRunner::new(bus.clone()));
        let console = Console::new(runner, config.console.clone());
        let attached = console.attach(&bus)?.guard();

        let progress = bus
            .subscribe(|event| {
                if let TerminalEvent::Cast { text } = event {
                    tracing::info!(target: "termbus::progress", "{}", text);
                }
            })
            .guard();

        Ok(Self {
            bus,
            console,
            _subscriptions: vec![attached, progress],
        })
    }

    /// Handle for code that wants to drive the console
    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn console(&self) -> &Arc<Console> {
        &self.console
    }

    /// Read command lines until EOF or `exit`/`quit`, writing the
    /// entries each command produces. Lines arriving while the console is
    /// busy are reported and dropped.
    pub async fn run<R, W>(&self, reader: R, writer: &mut W) -> anyhow::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let prompt = self.console.prompt().to_string();
        let mut lines = reader.lines();

        while let Some(line) = lines.next_line().await? {
            if matches!(line.trim(), "exit" | "quit") {
                break;
            }

            let cmd = line.trim().to_string();
            let mark = self.console.history_mark();
            self.console.set_input(line);
            if !self.console.submit().await {
                if !cmd.is_empty() && self.console.is_loading() {
                    tracing::warn!("Console busy, discarded `{}`", cmd);
                    writer
                        .write_all(format!("busy, discarded: {}\n", cmd).as_bytes())
                        .await?;
                    writer.flush().await?;
                }
                continue;
            }

            for entry in self.console.history_since(mark) {
                for text in entry.lines(&prompt) {
                    writer.write_all(text.as_bytes()).await?;
                    writer.write_all(b"\n").await?;
                }
            }
            writer.flush().await?;
        }

        tracing::debug!("Input closed");
        Ok(())
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("bus", &self.bus)
            .field("console", &self.console)
            .finish()
    }
}
