//! Diesel row models for task and history persistence.

use super::schema::{task_history, tasks};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Task title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Category storage string.
    pub category: String,
    /// Priority storage string.
    pub priority: String,
    /// Status storage string.
    pub status: String,
    /// Optional assignee.
    pub assigned_to: Option<String>,
    /// Optional due date.
    pub due_date: Option<DateTime<Utc>>,
    /// Extracted entities JSON payload.
    pub extracted_entities: Value,
    /// Suggested actions JSON payload.
    pub suggested_actions: Value,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for task records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Task title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Category storage string.
    pub category: String,
    /// Priority storage string.
    pub priority: String,
    /// Status storage string.
    pub status: String,
    /// Optional assignee.
    pub assigned_to: Option<String>,
    /// Optional due date.
    pub due_date: Option<DateTime<Utc>>,
    /// Extracted entities JSON payload.
    pub extracted_entities: Value,
    /// Suggested actions JSON payload.
    pub suggested_actions: Value,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Changeset writing the full current state of a task.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = tasks)]
#[diesel(treat_none_as_null = true)]
pub struct TaskChangeset {
    /// Task title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Category storage string.
    pub category: String,
    /// Priority storage string.
    pub priority: String,
    /// Status storage string.
    pub status: String,
    /// Optional assignee.
    pub assigned_to: Option<String>,
    /// Optional due date.
    pub due_date: Option<DateTime<Utc>>,
    /// Extracted entities JSON payload.
    pub extracted_entities: Value,
    /// Suggested actions JSON payload.
    pub suggested_actions: Value,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Query result row for history entries.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = task_history)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct HistoryRow {
    /// Entry identifier.
    pub id: uuid::Uuid,
    /// Owning task identifier.
    pub task_id: uuid::Uuid,
    /// Action storage string.
    pub action: String,
    /// Prior-value snapshot, if any.
    pub old_value: Option<Value>,
    /// New-value snapshot.
    pub new_value: Value,
    /// Actor identifier.
    pub changed_by: String,
    /// Write timestamp.
    pub changed_at: DateTime<Utc>,
}

/// Insert model for history entries.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = task_history)]
pub struct NewHistoryRow {
    /// Entry identifier.
    pub id: uuid::Uuid,
    /// Owning task identifier.
    pub task_id: uuid::Uuid,
    /// Action storage string.
    pub action: String,
    /// Prior-value snapshot, if any.
    pub old_value: Option<Value>,
    /// New-value snapshot.
    pub new_value: Value,
    /// Actor identifier.
    pub changed_by: String,
    /// Write timestamp.
    pub changed_at: DateTime<Utc>,
}
