//! Append-only audit history for task mutations.

use super::{HistoryId, ParseHistoryActionError, TaskId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Default actor recorded when the caller does not identify one.
pub const SYSTEM_ACTOR: &str = "system";

/// Kind of mutation a history entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryAction {
    /// Task was created.
    Created,
    /// Non-status fields changed.
    Updated,
    /// Status changed to something other than completed.
    StatusChanged,
    /// Status changed to completed.
    Completed,
}

impl HistoryAction {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::StatusChanged => "status_changed",
            Self::Completed => "completed",
        }
    }
}

impl TryFrom<&str> for HistoryAction {
    type Error = ParseHistoryActionError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "created" => Ok(Self::Created),
            "updated" => Ok(Self::Updated),
            "status_changed" => Ok(Self::StatusChanged),
            "completed" => Ok(Self::Completed),
            _ => Err(ParseHistoryActionError(value.to_owned())),
        }
    }
}

/// Immutable audit record of one task mutation.
///
/// Exactly one entry is written per successful create or update. Entries are
/// never edited or removed, and they never outlive their task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    id: HistoryId,
    task_id: TaskId,
    action: HistoryAction,
    old_value: Option<Value>,
    new_value: Value,
    changed_by: String,
    changed_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted history entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedHistoryData {
    /// Persisted entry identifier.
    pub id: HistoryId,
    /// Owning task identifier.
    pub task_id: TaskId,
    /// Persisted action kind.
    pub action: HistoryAction,
    /// Persisted prior-value snapshot, if any.
    pub old_value: Option<Value>,
    /// Persisted new-value snapshot.
    pub new_value: Value,
    /// Persisted actor identifier.
    pub changed_by: String,
    /// Persisted write timestamp.
    pub changed_at: DateTime<Utc>,
}

impl HistoryEntry {
    /// Creates a history entry stamped with the current clock time.
    ///
    /// `old_value` is absent for [`HistoryAction::Created`]; for updates it
    /// holds the full prior snapshot while `new_value` holds the applied
    /// patch.
    #[must_use]
    pub fn new(
        task_id: TaskId,
        action: HistoryAction,
        old_value: Option<Value>,
        new_value: Value,
        changed_by: impl Into<String>,
        clock: &impl Clock,
    ) -> Self {
        Self {
            id: HistoryId::new(),
            task_id,
            action,
            old_value,
            new_value,
            changed_by: changed_by.into(),
            changed_at: clock.utc(),
        }
    }

    /// Reconstructs a history entry from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedHistoryData) -> Self {
        Self {
            id: data.id,
            task_id: data.task_id,
            action: data.action,
            old_value: data.old_value,
            new_value: data.new_value,
            changed_by: data.changed_by,
            changed_at: data.changed_at,
        }
    }

    /// Returns the entry identifier.
    #[must_use]
    pub const fn id(&self) -> HistoryId {
        self.id
    }

    /// Returns the owning task identifier.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the recorded action kind.
    #[must_use]
    pub const fn action(&self) -> HistoryAction {
        self.action
    }

    /// Returns the prior-value snapshot, if any.
    #[must_use]
    pub const fn old_value(&self) -> Option<&Value> {
        self.old_value.as_ref()
    }

    /// Returns the new-value snapshot.
    #[must_use]
    pub const fn new_value(&self) -> &Value {
        &self.new_value
    }

    /// Returns the actor that performed the mutation.
    #[must_use]
    pub fn changed_by(&self) -> &str {
        &self.changed_by
    }

    /// Returns the write timestamp.
    #[must_use]
    pub const fn changed_at(&self) -> DateTime<Utc> {
        self.changed_at
    }
}
