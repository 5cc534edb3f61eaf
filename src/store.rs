//! Task store
//!
//! One JSON document maps each user id to that user's record:
//!
//! ```text
//! {
//!   "1234": {
//!     "tasks": ["water plants"],
//!     "done": ["buy milk"],
//!     "points": 1
//!   }
//! }
//! ```
//!
//! The whole document is rewritten after every mutation. Reads never insert:
//! [`Store::peek`] hands back a transient default for unknown users, while
//! [`Store::ensure`] is the only path that creates a record.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::lock::{self, DEFAULT_LOCK_TIMEOUT_MS};

/// Pending tasks, completed history and points for one user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Pending tasks; position + 1 is the number users refer to.
    #[serde(default)]
    pub tasks: Vec<String>,
    /// Completed tasks, append-only.
    #[serde(default)]
    pub done: Vec<String>,
    /// One per completed task. Never decremented.
    #[serde(default)]
    pub points: u64,
}

impl UserRecord {
    /// Pending plus completed, the denominator of the progress bar.
    pub fn total(&self) -> usize {
        self.tasks.len() + self.done.len()
    }

    /// Convert a 1-based task number into a vector index.
    fn slot(&self, number: i64) -> Option<usize> {
        if number < 1 {
            return None;
        }
        let idx = usize::try_from(number - 1).ok()?;
        (idx < self.tasks.len()).then_some(idx)
    }
}

/// In-memory user id → record mapping with optional file backing.
#[derive(Debug, Clone, Default)]
pub struct Store {
    path: Option<PathBuf>,
    users: BTreeMap<String, UserRecord>,
}

impl Store {
    /// Store with no backing file; [`Store::save`] is a no-op.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Load the document at `path`. A missing file yields an empty store.
    ///
    /// Unparseable content is an error and the file is left untouched, so a
    /// damaged document is never silently replaced by an empty one.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no task store yet, starting empty");
            return Ok(Self {
                path: Some(path),
                users: BTreeMap::new(),
            });
        }

        let content = fs::read_to_string(&path)?;
        let users: BTreeMap<String, UserRecord> =
            serde_json::from_str(&content).map_err(|err| Error::CorruptStore {
                path: path.clone(),
                reason: err.to_string(),
            })?;

        tracing::debug!(path = %path.display(), users = users.len(), "loaded task store");
        Ok(Self {
            path: Some(path),
            users,
        })
    }

    /// Backing file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Overwrite the backing document with the current mapping.
    pub fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let mut json = serde_json::to_string_pretty(&self.users)?;
        json.push('\n');
        lock::write_atomic_locked(path, json.as_bytes(), DEFAULT_LOCK_TIMEOUT_MS)?;
        tracing::debug!(path = %path.display(), users = self.users.len(), "saved task store");
        Ok(())
    }

    pub fn get(&self, user_id: &str) -> Option<&UserRecord> {
        self.users.get(user_id)
    }

    /// The user's record, or an empty one that is not inserted.
    pub fn peek(&self, user_id: &str) -> UserRecord {
        self.users.get(user_id).cloned().unwrap_or_default()
    }

    /// The user's record, inserting an empty one first if absent.
    pub fn ensure(&mut self, user_id: &str) -> &mut UserRecord {
        self.users.entry(user_id.to_string()).or_default()
    }

    /// Records in user id order.
    pub fn users(&self) -> impl Iterator<Item = (&str, &UserRecord)> {
        self.users.iter().map(|(id, record)| (id.as_str(), record))
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Append a pending task, creating the record on first use.
    pub fn add_task(&mut self, user_id: &str, task: impl Into<String>) -> &UserRecord {
        let record = self.ensure(user_id);
        record.tasks.push(task.into());
        record
    }

    /// Move task `number` (1-based) to `done` and award a point.
    ///
    /// Returns the completed task and the new point total, or `None` when the
    /// user has no record or the number is out of range.
    pub fn complete_task(&mut self, user_id: &str, number: i64) -> Option<(String, u64)> {
        let record = self.users.get_mut(user_id)?;
        let idx = record.slot(number)?;
        let task = record.tasks.remove(idx);
        record.done.push(task.clone());
        record.points += 1;
        Some((task, record.points))
    }

    /// Drop task `number` (1-based) without credit.
    pub fn remove_task(&mut self, user_id: &str, number: i64) -> Option<String> {
        let record = self.users.get_mut(user_id)?;
        let idx = record.slot(number)?;
        Some(record.tasks.remove(idx))
    }
}
