//! Job, record and per-task state types.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One unit of work: fetch `url` into `filename` (relative to the output dir).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchJob {
    pub url: String,
    pub filename: String,
}

impl FetchJob {
    pub fn new(url: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            filename: filename.into(),
        }
    }

    /// Path the body is written to and read back from.
    pub fn destination(&self, output_dir: &Path) -> PathBuf {
        output_dir.join(&self.filename)
    }
}

/// A persisted row of the `Content` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentRecord {
    pub filename: String,
    pub url: String,
    pub content: Vec<u8>,
}

impl ContentRecord {
    /// Content as text, replacing invalid UTF-8 sequences.
    pub fn content_lossy(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.content)
    }
}

/// Lifecycle of a single coordinator task.
///
/// `Pending -> Fetching -> {FetchFailed | Fetched} -> Persisting -> {PersistFailed | Persisted}`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Pending,
    Fetching,
    FetchFailed,
    Fetched,
    Persisting,
    PersistFailed,
    Persisted,
}

impl TaskState {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskState::Pending => "pending",
            TaskState::Fetching => "fetching",
            TaskState::FetchFailed => "fetch_failed",
            TaskState::Fetched => "fetched",
            TaskState::Persisting => "persisting",
            TaskState::PersistFailed => "persist_failed",
            TaskState::Persisted => "persisted",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            TaskState::FetchFailed | TaskState::PersistFailed | TaskState::Persisted
        )
    }

    /// Whether `self -> next` is an edge of the task state machine.
    pub fn can_transition_to(self, next: TaskState) -> bool {
        use TaskState::*;
        matches!(
            (self, next),
            (Pending, Fetching)
                | (Fetching, FetchFailed)
                | (Fetching, Fetched)
                | (Fetched, Persisting)
                | (Persisting, PersistFailed)
                | (Persisting, Persisted)
        )
    }
}

impl std::fmt::Display for TaskState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
