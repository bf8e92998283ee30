//! Built-in command set used by the `termbus` binary
//!
//! Commands talk back through the bus: `clear` emits a clear request and
//! `wait` reports progress with a cast before answering.

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use std::time::Duration;
use termbus_console::CommandRunner;
use termbus_core::EventBus;

const HELP: &str = "\
Commands:
  help          show this help
  echo <text>   print <text>
  wait <ms>     sleep for <ms> milliseconds, reporting progress
  version       show the termbus version
  clear         clear the output
  exit | quit   leave";

/// Longest accepted `wait`
const MAX_WAIT_MS: u64 = 60_000;

pub struct BuiltinRunner {
    bus: EventBus,
}

impl BuiltinRunner {
    pub fn new(bus: EventBus) -> Self {
        Self { bus }
    }
}

#[async_trait]
impl CommandRunner for BuiltinRunner {
    async fn run(&self, input: &str) -> anyhow::Result<Option<String>> {
        let input = input.trim();
        let (name, args) = input
            .split_once(char::is_whitespace)
            .map_or((input, ""), |(name, args)| (name, args.trim()));

        match name {
            "help" => Ok(Some(HELP.to_string())),
            "echo" => Ok(Some(args.to_string())),
            "version" => Ok(Some(format!("termbus {}", crate::VERSION))),
            "clear" => {
                self.bus.emit_clear();
                Ok(None)
            }
            "wait" => {
                let ms: u64 = args
                    .parse()
                    .with_context(|| format!("invalid duration `{}`", args))?;
                if ms > MAX_WAIT_MS {
                    return Err(anyhow!("wait is limited to {} ms", MAX_WAIT_MS));
                }
                self.bus.emit_cast(format!("Waiting {} ms", ms));
                tokio::time::sleep(Duration::from_millis(ms)).await;
                Ok(Some(format!("waited {} ms", ms)))
            }
            other => Err(anyhow!("unknown command: {}", other)),
        }
    }
}
