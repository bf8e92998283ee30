//! Console history
//!
//! Command/response pairs shown by the console, plus the cursor used to
//! recall earlier commands into the input line.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// One command with the response rendered under it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Command text
    pub cmd: String,
    /// Response text
    pub response: String,
    /// When the entry was recorded
    pub timestamp: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn new(cmd: impl Into<String>, response: impl Into<String>) -> Self {
        Self {
            cmd: cmd.into(),
            response: response.into(),
            timestamp: Utc::now(),
        }
    }

    /// Plain-text lines for this entry: the prompted command, then the
    /// response when there is one
    pub fn lines(&self, prompt: &str) -> Vec<String> {
        let mut lines = vec![format!("{} {}", prompt, self.cmd)];
        if !self.response.is_empty() {
            lines.push(self.response.clone());
        }
        lines
    }
}

/// Bounded history with recall navigation
#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<HistoryEntry>,
    max_entries: usize,
    cursor: Option<usize>,
    /// Entries ever pushed, unaffected by trimming and clearing
    pushed: u64,
}

impl History {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            max_entries: max_entries.max(1),
            cursor: None,
            pushed: 0,
        }
    }

    /// Append an entry, dropping the oldest beyond the bound
    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.push_back(entry);
        self.pushed += 1;

        while self.entries.len() > self.max_entries {
            self.entries.pop_front();
            // Keep the cursor on the same entry
            self.cursor = self.cursor.map(|idx| idx.saturating_sub(1));
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = None;
    }

    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Mark to pass to [`History::since`] later
    pub fn mark(&self) -> u64 {
        self.pushed
    }

    /// Entries pushed after `mark` that are still retained
    pub fn since(&self, mark: u64) -> impl Iterator<Item = &HistoryEntry> {
        let added = self.pushed.saturating_sub(mark);
        let retained = usize::try_from(added)
            .map_or(self.entries.len(), |n| n.min(self.entries.len()));
        self.entries.iter().skip(self.entries.len() - retained)
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Step back to an older command.
    ///
    /// Starts from the newest entry and stops at the oldest. Returns the
    /// command to place in the input, or None when there is no history.
    pub fn previous(&mut self) -> Option<&str> {
        if self.entries.is_empty() {
            return None;
        }

        let idx = match self.cursor {
            None => self.entries.len() - 1,
            Some(idx) => idx.saturating_sub(1),
        };
        self.cursor = Some(idx);
        Some(self.entries[idx].cmd.as_str())
    }

    /// Step forward to a newer command.
    ///
    /// Returns None when not navigating. Moving past the newest entry ends
    /// navigation and yields an empty input.
    pub fn next(&mut self) -> Option<&str> {
        let idx = self.cursor? + 1;
        if idx >= self.entries.len() {
            self.cursor = None;
            return Some("");
        }

        self.cursor = Some(idx);
        Some(self.entries[idx].cmd.as_str())
    }

    pub fn reset_navigation(&mut self) {
        self.cursor = None;
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(1000)
    }
}
