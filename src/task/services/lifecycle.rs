//! Service layer orchestrating task creation, mutation, and reporting.

use crate::classify::{Category, Priority, classify_task};
use crate::extract::{ExtractedEntities, extract_entities};
use crate::task::{
    domain::{
        HistoryAction, HistoryEntry, NewTaskData, SYSTEM_ACTOR, Task, TaskDescription,
        TaskDomainError, TaskId, TaskPatch, TaskStatus, TaskTitle,
    },
    ports::{
        PageRequest, TaskFilter, TaskRepository, TaskRepositoryError, TaskStats,
    },
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

/// Number of history entries returned alongside a single task.
const HISTORY_PAGE_SIZE: usize = 20;

/// Request payload for creating a task.
///
/// Classification fills in any of category, priority, and status the caller
/// leaves unset; explicit values always win over inferred ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateTaskRequest {
    title: String,
    description: Option<String>,
    category: Option<Category>,
    priority: Option<Priority>,
    status: Option<TaskStatus>,
    assigned_to: Option<String>,
    due_date: Option<DateTime<Utc>>,
    changed_by: Option<String>,
}

impl CreateTaskRequest {
    /// Creates a request with the required title.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Sets the task description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets an explicit category, overriding classification.
    #[must_use]
    pub const fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    /// Sets an explicit priority, overriding classification.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Sets an explicit initial status instead of the pending default.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets the assignee.
    #[must_use]
    pub fn with_assigned_to(mut self, assigned_to: impl Into<String>) -> Self {
        self.assigned_to = Some(assigned_to.into());
        self
    }

    /// Sets the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Sets the actor recorded in the creation history entry.
    #[must_use]
    pub fn with_changed_by(mut self, changed_by: impl Into<String>) -> Self {
        self.changed_by = Some(changed_by.into());
        self
    }
}

/// Request payload for partially updating a task.
///
/// Unset fields are never written; the acting user is passed to
/// [`TaskLifecycleService::update`] separately and is not part of the diff.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateTaskRequest {
    title: Option<String>,
    description: Option<String>,
    category: Option<Category>,
    priority: Option<Priority>,
    status: Option<TaskStatus>,
    assigned_to: Option<String>,
    due_date: Option<DateTime<Utc>>,
}

impl UpdateTaskRequest {
    /// Creates an empty update request.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Replaces the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Replaces the category.
    #[must_use]
    pub const fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    /// Replaces the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Replaces the status.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Replaces the assignee.
    #[must_use]
    pub fn with_assigned_to(mut self, assigned_to: impl Into<String>) -> Self {
        self.assigned_to = Some(assigned_to.into());
        self
    }

    /// Replaces the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Validates supplied fields into a domain patch.
    fn into_patch(self) -> Result<TaskPatch, TaskDomainError> {
        Ok(TaskPatch {
            title: self.title.map(TaskTitle::new).transpose()?,
            description: self.description.map(TaskDescription::new).transpose()?,
            category: self.category,
            priority: self.priority,
            status: self.status,
            assigned_to: self.assigned_to,
            due_date: self.due_date,
        })
    }
}

/// One page of a task listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskPage {
    /// Tasks on this page.
    pub items: Vec<Task>,
    /// Total number of matches before pagination.
    pub total: u64,
    /// Requested page size.
    pub limit: u64,
    /// Requested offset.
    pub offset: u64,
    /// Whether further matches exist past this page.
    pub has_more: bool,
}

/// A task together with its most recent history entries, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskWithHistory {
    /// The task record.
    pub task: Task,
    /// Up to twenty most recent history entries.
    pub history: Vec<HistoryEntry>,
}

/// Classification and extraction output with no persistence side effect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassificationPreview {
    /// Inferred category.
    pub category: Category,
    /// Inferred priority.
    pub priority: Priority,
    /// Suggested actions for the inferred category.
    pub suggested_actions: Vec<String>,
    /// Entities extracted from the combined text.
    pub extracted_entities: ExtractedEntities,
}

/// Service-level errors for task lifecycle operations.
#[derive(Debug, Error)]
pub enum TaskLifecycleError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
    /// A task snapshot or patch could not be serialised for the audit trail.
    #[error("failed to serialise audit payload: {0}")]
    Snapshot(#[from] serde_json::Error),
}

impl TaskLifecycleError {
    /// Returns whether this error means the task does not exist.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Repository(TaskRepositoryError::NotFound(_)))
    }
}

/// Result type for task lifecycle service operations.
pub type TaskLifecycleResult<T> = Result<T, TaskLifecycleError>;

/// Task lifecycle orchestration service.
///
/// Owns the rules for auto-filling unclassified fields and for when and how
/// history entries are produced; physical storage belongs to the repository.
pub struct TaskLifecycleService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

// Handles are cloned, not the repository or clock themselves, so no `Clone`
// bound is required on either.
impl<R, C> Clone for TaskLifecycleService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<R, C> TaskLifecycleService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new task lifecycle service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Creates a task, auto-classifying any field the caller left unset, and
    /// records a `created` history entry atomically with the task write.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when title or description validation
    /// fails or the repository rejects persistence.
    pub async fn create(&self, request: CreateTaskRequest) -> TaskLifecycleResult<Task> {
        let CreateTaskRequest {
            title,
            description,
            category,
            priority,
            status,
            assigned_to,
            due_date,
            changed_by,
        } = request;

        let description_text = description.as_deref().unwrap_or("");
        let classification = classify_task(&title, description_text);
        let combined = format!("{title} {description_text}");
        let entities = extract_entities(&combined);

        let task = Task::new(
            NewTaskData {
                title: TaskTitle::new(title)?,
                description: description.map(TaskDescription::new).transpose()?,
                category: category.unwrap_or(classification.category),
                priority: priority.unwrap_or(classification.priority),
                status: status.unwrap_or(TaskStatus::Pending),
                assigned_to,
                due_date,
                extracted_entities: entities,
                suggested_actions: classification.suggested_actions,
            },
            &*self.clock,
        );

        let snapshot = serde_json::to_value(&task)?;
        let entry = HistoryEntry::new(
            task.id(),
            HistoryAction::Created,
            None,
            snapshot,
            changed_by.unwrap_or_else(|| SYSTEM_ACTOR.to_owned()),
            &*self.clock,
        );

        self.repository.insert(&task, &entry).await?;
        Ok(task)
    }

    /// Returns one page of tasks matching the filter, with the total match
    /// count and a flag indicating whether further pages exist.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when the listing fails.
    pub async fn list(
        &self,
        filter: TaskFilter,
        page: PageRequest,
    ) -> TaskLifecycleResult<TaskPage> {
        let (items, total) = self.repository.list(&filter, &page).await?;
        Ok(TaskPage {
            items,
            total,
            limit: page.limit,
            offset: page.offset,
            has_more: page.offset.saturating_add(page.limit) < total,
        })
    }

    /// Returns a task together with its twenty most recent history entries,
    /// newest first.
    ///
    /// # Errors
    ///
    /// Returns a not-found error when the identifier is unknown.
    pub async fn get(&self, id: TaskId) -> TaskLifecycleResult<TaskWithHistory> {
        let task = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(TaskRepositoryError::NotFound(id))?;
        let history = self.repository.recent_history(id, HISTORY_PAGE_SIZE).await?;
        Ok(TaskWithHistory { task, history })
    }

    /// Merges the supplied fields into an existing task and records the
    /// mutation atomically.
    ///
    /// The history action is `completed` when the status moves to completed,
    /// `status_changed` for any other status change, and `updated`
    /// otherwise. The entry keeps the full prior snapshot as its old value
    /// and the applied patch as its new value; `changed_by` identifies the
    /// actor and never appears in the diff.
    ///
    /// # Errors
    ///
    /// Returns a not-found error when the identifier is unknown, a domain
    /// error when a supplied field fails validation, or a repository error
    /// when persistence fails.
    pub async fn update(
        &self,
        id: TaskId,
        request: UpdateTaskRequest,
        changed_by: impl Into<String> + Send,
    ) -> TaskLifecycleResult<Task> {
        let existing = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(TaskRepositoryError::NotFound(id))?;

        let patch = request.into_patch()?;
        let old_snapshot = serde_json::to_value(&existing)?;
        let new_value = serde_json::to_value(&patch)?;

        let action = match patch.status {
            Some(next) if next != existing.status() => {
                if next == TaskStatus::Completed {
                    HistoryAction::Completed
                } else {
                    HistoryAction::StatusChanged
                }
            }
            _ => HistoryAction::Updated,
        };

        let mut updated = existing;
        updated.apply_patch(&patch, &*self.clock);

        let entry = HistoryEntry::new(
            id,
            action,
            Some(old_snapshot),
            new_value,
            changed_by,
            &*self.clock,
        );
        self.repository.update(&updated, &entry).await?;
        Ok(updated)
    }

    /// Removes a task permanently.
    ///
    /// No history entry is recorded for the deletion and the existing trail
    /// is dropped with the task; callers needing a deletion audit must
    /// capture the history first.
    ///
    /// # Errors
    ///
    /// Returns a not-found error when the identifier is unknown.
    pub async fn delete(&self, id: TaskId) -> TaskLifecycleResult<()> {
        Ok(self.repository.delete(id).await?)
    }

    /// Derives aggregate counts over the task collection.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when the aggregation fails.
    pub async fn stats(&self) -> TaskLifecycleResult<TaskStats> {
        Ok(self.repository.stats().await?)
    }

    /// Classifies and extracts from the given text without persisting
    /// anything.
    #[must_use]
    pub fn preview_classification(
        &self,
        title: &str,
        description: &str,
    ) -> ClassificationPreview {
        let classification = classify_task(title, description);
        let combined = format!("{title} {description}");
        ClassificationPreview {
            category: classification.category,
            priority: classification.priority,
            suggested_actions: classification.suggested_actions,
            extracted_entities: extract_entities(&combined),
        }
    }
}
