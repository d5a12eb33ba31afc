//! Send ledger.
//!
//! Append-only record of completed publish attempts. Storage is bounded; the
//! oldest records are dropped first. The message view only ever shows the
//! most recent [`HISTORY_WINDOW`] records.

use std::collections::VecDeque;

use chrono::{DateTime, Local};

/// Records kept in memory.
pub const LEDGER_CAPACITY: usize = 1000;

/// Records shown in the history panel.
pub const HISTORY_WINDOW: usize = 5;

/// Display budget for message keys in the history panel.
pub const KEY_DISPLAY_CHARS: usize = 20;

/// Outcome of one publish attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// Broker acknowledged the message.
    Success {
        /// Partition the message landed in.
        partition: i32,
        /// Offset within that partition.
        offset: i64,
    },
    /// Publish failed.
    Failed {
        /// Error description.
        reason: String,
    },
}

/// One completed publish attempt. Never mutated after it is appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendRecord {
    /// When the attempt completed.
    pub timestamp: DateTime<Local>,
    /// Key text as typed. Empty for unkeyed messages.
    pub key: String,
    /// Value text as typed.
    pub value: String,
    /// Result.
    pub outcome: SendOutcome,
}

impl SendRecord {
    /// Whether the broker acknowledged the message.
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, SendOutcome::Success { .. })
    }
}

/// Bounded, append-only history of publish attempts.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    records: VecDeque<SendRecord>,
}

impl Ledger {
    /// Empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record, evicting the oldest once [`LEDGER_CAPACITY`] is reached.
    pub fn push(&mut self, record: SendRecord) {
        if self.records.len() == LEDGER_CAPACITY {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing has been sent yet.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All stored records, oldest first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &SendRecord> {
        self.records.iter()
    }

    /// The most recent [`HISTORY_WINDOW`] records, oldest first.
    pub fn recent(&self) -> impl Iterator<Item = &SendRecord> {
        self.records.iter().skip(self.records.len().saturating_sub(HISTORY_WINDOW))
    }

    /// Most recent record.
    pub fn last(&self) -> Option<&SendRecord> {
        self.records.back()
    }
}

/// Key as shown in the history panel.
pub fn display_key(key: &str) -> String {
    if key.is_empty() {
        return "(empty)".to_string();
    }
    match key.char_indices().nth(KEY_DISPLAY_CHARS) {
        Some((cut, _)) => format!("{}...", &key[..cut]),
        None => key.to_string(),
    }
}
