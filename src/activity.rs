use std::fmt;

use chrono::{DateTime, Local};

/// One line of the activity log. Cell numbers are stored 0-based and shown 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogEntry {
    WordsHidden,
    PickingStarted,
    Picked { cell: usize },
    Correct { cell: usize },
    Wrong { cell: usize },
}

impl LogEntry {
    /// Whether this entry marks the end of a picker run.
    pub fn is_stop(&self) -> bool {
        matches!(self, LogEntry::Picked { .. })
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogEntry::WordsHidden => write!(f, "Words hidden"),
            LogEntry::PickingStarted => write!(f, "Picking a cell..."),
            LogEntry::Picked { cell } => write!(f, "Picked cell {}", cell + 1),
            LogEntry::Correct { cell } => write!(f, "Cell {} correct", cell + 1),
            LogEntry::Wrong { cell } => write!(f, "Cell {} wrong", cell + 1),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ActivityItem {
    pub at: DateTime<Local>,
    pub entry: LogEntry,
}

/// Append-only, insertion-ordered record of what happened this round.
#[derive(Debug, Clone, Default)]
pub struct ActivityLog {
    items: Vec<ActivityItem>,
}

impl ActivityLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: LogEntry) {
        tracing::debug!(%entry, "activity");
        self.items.push(ActivityItem {
            at: Local::now(),
            entry,
        });
    }

    pub fn items(&self) -> &[ActivityItem] {
        &self.items
    }

    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.items.iter().map(|item| &item.entry)
    }

    /// The newest `n` items, oldest first.
    pub fn tail(&self, n: usize) -> &[ActivityItem] {
        let start = self.items.len().saturating_sub(n);
        &self.items[start..]
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.items.clear();
    }
}
