//! Query, pagination, and aggregate types shared by repository adapters.

use crate::classify::{Category, Priority};
use crate::task::domain::{Task, TaskStatus};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Equality filters applied when listing tasks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskFilter {
    /// Keep only tasks with this status.
    pub status: Option<TaskStatus>,
    /// Keep only tasks with this category.
    pub category: Option<Category>,
    /// Keep only tasks with this priority.
    pub priority: Option<Priority>,
}

impl TaskFilter {
    /// Returns whether a task satisfies every set filter.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        self.status.is_none_or(|status| task.status() == status)
            && self.category.is_none_or(|category| task.category() == category)
            && self.priority.is_none_or(|priority| task.priority() == priority)
    }
}

/// Sortable task fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortField {
    /// Sort by creation timestamp (the default).
    #[default]
    CreatedAt,
    /// Sort by latest update timestamp.
    UpdatedAt,
    /// Sort by due date; tasks without one sort first ascending.
    DueDate,
    /// Sort by title.
    Title,
    /// Sort by the stored priority string.
    Priority,
    /// Sort by the stored status string.
    Status,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Ascending.
    Asc,
    /// Descending (the default).
    #[default]
    Desc,
}

/// Pagination and ordering for task listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Maximum number of tasks to return.
    pub limit: u64,
    /// Number of matching tasks to skip.
    pub offset: u64,
    /// Field to sort by.
    pub sort_by: SortField,
    /// Sort direction.
    pub sort_order: SortOrder,
}

impl PageRequest {
    /// Default page size.
    pub const DEFAULT_LIMIT: u64 = 20;
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            limit: Self::DEFAULT_LIMIT,
            offset: 0,
            sort_by: SortField::default(),
            sort_order: SortOrder::default(),
        }
    }
}

/// Aggregate task counts, derived read-only from the collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskStats {
    /// Total number of tasks.
    pub total: u64,
    /// Number of pending tasks.
    pub pending: u64,
    /// Number of in-progress tasks.
    pub in_progress: u64,
    /// Number of completed tasks.
    pub completed: u64,
    /// Number of high-priority tasks.
    pub high_priority: u64,
    /// Task count per category; categories with no tasks are omitted.
    pub by_category: BTreeMap<Category, u64>,
}
