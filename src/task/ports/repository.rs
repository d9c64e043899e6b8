//! Repository port for task persistence and audit history.

use super::{PageRequest, TaskFilter, TaskStats};
use crate::task::domain::{HistoryEntry, Task, TaskId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Task persistence contract.
///
/// Mutating operations take the task and its history entry together so the
/// adapter can commit or reject both as one atomic unit; the audit trail must
/// never be observable without its task write, or vice versa.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task together with its `created` history entry.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when the task ID
    /// already exists.
    async fn insert(&self, task: &Task, entry: &HistoryEntry) -> TaskRepositoryResult<()>;

    /// Persists changes to an existing task together with the history entry
    /// describing them.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not
    /// exist.
    async fn update(&self, task: &Task, entry: &HistoryEntry) -> TaskRepositoryResult<()>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Returns one page of tasks matching the filter, plus the total number
    /// of matches before pagination.
    async fn list(
        &self,
        filter: &TaskFilter,
        page: &PageRequest,
    ) -> TaskRepositoryResult<(Vec<Task>, u64)>;

    /// Returns up to `limit` history entries for a task, newest first.
    async fn recent_history(
        &self,
        id: TaskId,
        limit: usize,
    ) -> TaskRepositoryResult<Vec<HistoryEntry>>;

    /// Removes a task and its history permanently.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not
    /// exist.
    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()>;

    /// Derives aggregate counts over the whole task collection.
    async fn stats(&self) -> TaskRepositoryResult<TaskStats>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// Persistence-layer failure, surfaced opaquely.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    #[must_use]
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
