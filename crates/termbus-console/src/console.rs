//! Console session - command execution, output history and progress state
//!
//! A [`Console`] is the consumer side of the terminal bus: once attached it
//! runs `Run` requests through its [`CommandRunner`], appends `Print` records,
//! collects `Cast` progress messages and empties its history on `Clear`.
//! Nothing here draws; front ends read the state or the plain-text
//! [`Console::transcript`].

use crate::error::{ConsoleError, ConsoleResult};
use crate::history::{History, HistoryEntry};
use crate::runner::CommandRunner;
use crate::spinner::Spinner;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use termbus_core::{EventBus, Subscription, TerminalEvent};
use termbus_settings::ConsoleSettings;
use tokio::runtime::Handle;

/// Response used when a runner error renders as an empty string
const FALLBACK_ERROR: &str = "command failed";

#[derive(Debug)]
struct ConsoleState {
    history: History,
    input: String,
    loading: bool,
    loading_messages: Vec<String>,
    spinner: Spinner,
    /// Commands currently awaiting their runner
    in_flight: usize,
}

/// Headless terminal session
pub struct Console {
    state: Mutex<ConsoleState>,
    runner: Arc<dyn CommandRunner>,
    settings: ConsoleSettings,
}

impl Console {
    pub fn new(runner: Arc<dyn CommandRunner>, settings: ConsoleSettings) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(ConsoleState {
                history: History::new(settings.max_history),
                input: String::new(),
                loading: false,
                loading_messages: Vec::new(),
                spinner: Spinner::new(),
                in_flight: 0,
            }),
            runner,
            settings,
        })
    }

    /// Subscribe this console to `bus`.
    ///
    /// `Run` requests are executed on the tokio runtime current at attach
    /// time; the emitting call returns without waiting for them.
    pub fn attach(self: &Arc<Self>, bus: &EventBus) -> ConsoleResult<Subscription> {
        let handle = Handle::try_current().map_err(|_| ConsoleError::NoRuntime)?;
        let console = Arc::clone(self);
        let subscription = bus.subscribe(move |event| console.on_event(event, &handle));
        tracing::debug!("Console attached as {}", subscription.id());
        Ok(subscription)
    }

    fn on_event(self: &Arc<Self>, event: &TerminalEvent, handle: &Handle) {
        match event {
            TerminalEvent::Run { cmd } => {
                let console = Arc::clone(self);
                let cmd = cmd.clone();
                handle.spawn(async move {
                    console.run_command(&cmd).await;
                });
            }
            TerminalEvent::Print { cmd, resp } => self.print(cmd.as_str(), resp.as_str()),
            TerminalEvent::Cast { text } => self.cast(text.as_str()),
            TerminalEvent::Clear => self.clear(),
        }
    }

    /// Execute a command and record its response.
    ///
    /// Whitespace-only commands are ignored and return false. While the
    /// runner works the console is loading and the spinner animates.
    pub async fn run_command(&self, cmd: &str) -> bool {
        if cmd.trim().is_empty() {
            return false;
        }

        {
            let mut state = self.state.lock();
            state.in_flight += 1;
            state.loading = true;
            state.loading_messages = vec![self.settings.running_message.clone()];
            state.spinner.reset();
        }
        tracing::info!("Running `{}`", cmd);

        let result = {
            let run = self.runner.run(cmd);
            tokio::pin!(run);
            let period = Duration::from_millis(self.settings.spinner_interval_ms.max(1));
            let mut ticker =
                tokio::time::interval_at(tokio::time::Instant::now() + period, period);
            loop {
                tokio::select! {
                    result = &mut run => break result,
                    _ = ticker.tick() => self.state.lock().spinner.advance(),
                }
            }
        };

        match result {
            Ok(Some(output)) => self.push_entry(HistoryEntry::new(cmd, output)),
            Ok(None) => tracing::debug!("`{}` produced no output", cmd),
            Err(e) => {
                tracing::warn!("`{}` failed: {:#}", cmd, e);
                let message = format!("{:#}", e);
                let message = if message.is_empty() {
                    FALLBACK_ERROR.to_string()
                } else {
                    message
                };
                self.push_entry(HistoryEntry::new(cmd, format!("Error: {}", message)));
            }
        }

        // Only the last command to finish ends the loading phase
        let mut state = self.state.lock();
        state.in_flight = state.in_flight.saturating_sub(1);
        if state.in_flight == 0 {
            state.loading = false;
            state.loading_messages.clear();
        }
        true
    }

    /// Run the pending input line.
    ///
    /// Does nothing and returns false when the input is blank or a command
    /// is already running. Afterwards the input is cleared and history
    /// navigation restarts from the newest entry.
    pub async fn submit(&self) -> bool {
        let cmd = {
            let state = self.state.lock();
            if state.loading {
                return false;
            }
            state.input.trim().to_string()
        };
        if cmd.is_empty() {
            return false;
        }

        self.run_command(&cmd).await;

        let mut state = self.state.lock();
        state.input.clear();
        state.history.reset_navigation();
        true
    }

    /// Append a command/response pair
    pub fn print(&self, cmd: impl Into<String>, resp: impl Into<String>) {
        self.push_entry(HistoryEntry::new(cmd, resp));
    }

    /// Add a progress message
    pub fn cast(&self, text: impl Into<String>) {
        self.state.lock().loading_messages.push(text.into());
    }

    /// Empty the history
    pub fn clear(&self) {
        self.state.lock().history.clear();
        tracing::debug!("Console history cleared");
    }

    fn push_entry(&self, entry: HistoryEntry) {
        self.state.lock().history.push(entry);
    }

    /// Force the loading state from outside.
    ///
    /// Releasing it only takes effect when no command is running.
    pub fn set_external_loading(&self, loading: bool) {
        let mut state = self.state.lock();
        if loading {
            state.loading = true;
        } else if state.in_flight == 0 {
            state.loading = false;
            state.loading_messages.clear();
        }
    }

    pub fn set_input(&self, input: impl Into<String>) {
        self.state.lock().input = input.into();
    }

    pub fn input(&self) -> String {
        self.state.lock().input.clone()
    }

    /// Recall the previous command into the input
    pub fn history_up(&self) {
        let mut state = self.state.lock();
        if let Some(cmd) = state.history.previous().map(str::to_string) {
            state.input = cmd;
        }
    }

    /// Recall the next command, or clear the input past the newest one
    pub fn history_down(&self) {
        let mut state = self.state.lock();
        if let Some(cmd) = state.history.next().map(str::to_string) {
            state.input = cmd;
        }
    }

    pub fn history(&self) -> Vec<HistoryEntry> {
        self.state.lock().history.entries().cloned().collect()
    }

    /// Current position in the stream of recorded entries
    pub fn history_mark(&self) -> u64 {
        self.state.lock().history.mark()
    }

    /// Entries recorded after `mark` and still retained
    pub fn history_since(&self, mark: u64) -> Vec<HistoryEntry> {
        self.state.lock().history.since(mark).cloned().collect()
    }

    pub fn history_cursor(&self) -> Option<usize> {
        self.state.lock().history.cursor()
    }

    pub fn is_loading(&self) -> bool {
        self.state.lock().loading
    }

    pub fn loading_messages(&self) -> Vec<String> {
        self.state.lock().loading_messages.clone()
    }

    pub fn spinner_glyph(&self) -> &'static str {
        self.state.lock().spinner.glyph()
    }

    pub fn prompt(&self) -> &str {
        &self.settings.prompt
    }

    pub fn settings(&self) -> &ConsoleSettings {
        &self.settings
    }

    /// Plain-text view of the session.
    ///
    /// Each entry yields a `"{prompt} {cmd}"` line followed by its response
    /// when non-empty. While loading, progress messages follow with the
    /// spinner glyph after the last one.
    pub fn transcript(&self) -> Vec<String> {
        let state = self.state.lock();
        let mut lines = Vec::with_capacity(state.history.len() * 2);

        for entry in state.history.entries() {
            lines.extend(entry.lines(&self.settings.prompt));
        }

        if state.loading {
            let last = state.loading_messages.len().saturating_sub(1);
            for (i, message) in state.loading_messages.iter().enumerate() {
                if i == last {
                    lines.push(format!("{} {}", message, state.spinner.glyph()));
                } else {
                    lines.push(message.clone());
                }
            }
        }

        lines
    }
}

impl std::fmt::Debug for Console {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Console")
            .field("state", &*self.state.lock())
            .field("settings", &self.settings)
            .finish()
    }
}
