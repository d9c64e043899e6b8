//! In-memory repository for task lifecycle tests and embedders without a
//! database.

use async_trait::async_trait;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::classify::Priority;
use crate::task::{
    domain::{HistoryEntry, Task, TaskId, TaskStatus},
    ports::{
        PageRequest, SortField, SortOrder, TaskFilter, TaskRepository, TaskRepositoryError,
        TaskRepositoryResult, TaskStats,
    },
};

/// Thread-safe in-memory task repository.
///
/// A single write-lock acquisition covers each paired task+history write,
/// which is all the transactional scope the port asks for.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<InMemoryTaskState>>,
}

#[derive(Debug, Default)]
struct InMemoryTaskState {
    tasks: HashMap<TaskId, Task>,
    history: HashMap<TaskId, Vec<HistoryEntry>>,
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn compare_by_field(a: &Task, b: &Task, field: SortField) -> Ordering {
    match field {
        SortField::CreatedAt => a.created_at().cmp(&b.created_at()),
        SortField::UpdatedAt => a.updated_at().cmp(&b.updated_at()),
        SortField::DueDate => a.due_date().cmp(&b.due_date()),
        SortField::Title => a.title().as_str().cmp(b.title().as_str()),
        // Enum fields sort by their storage strings, matching what a
        // database column comparison would produce.
        SortField::Priority => a.priority().as_str().cmp(b.priority().as_str()),
        SortField::Status => a.status().as_str().cmp(b.status().as_str()),
    }
}

fn sort_tasks(tasks: &mut [Task], page: &PageRequest) {
    tasks.sort_by(|a, b| {
        let ordering = compare_by_field(a, b, page.sort_by);
        match page.sort_order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
}

fn clamp_to_usize(value: u64) -> usize {
    usize::try_from(value).unwrap_or(usize::MAX)
}

fn count_as_u64(len: usize) -> u64 {
    u64::try_from(len).unwrap_or(u64::MAX)
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn insert(&self, task: &Task, entry: &HistoryEntry) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        if state.tasks.contains_key(&task.id()) {
            return Err(TaskRepositoryError::DuplicateTask(task.id()));
        }

        state.tasks.insert(task.id(), task.clone());
        state.history.entry(task.id()).or_default().push(entry.clone());
        Ok(())
    }

    async fn update(&self, task: &Task, entry: &HistoryEntry) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        if !state.tasks.contains_key(&task.id()) {
            return Err(TaskRepositoryError::NotFound(task.id()));
        }

        state.tasks.insert(task.id(), task.clone());
        state.history.entry(task.id()).or_default().push(entry.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let state = self.state.read().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.tasks.get(&id).cloned())
    }

    async fn list(
        &self,
        filter: &TaskFilter,
        page: &PageRequest,
    ) -> TaskRepositoryResult<(Vec<Task>, u64)> {
        let state = self.state.read().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;

        let mut matching: Vec<Task> = state
            .tasks
            .values()
            .filter(|task| filter.matches(task))
            .cloned()
            .collect();
        let total = count_as_u64(matching.len());

        sort_tasks(&mut matching, page);
        let items: Vec<Task> = matching
            .into_iter()
            .skip(clamp_to_usize(page.offset))
            .take(clamp_to_usize(page.limit))
            .collect();

        Ok((items, total))
    }

    async fn recent_history(
        &self,
        id: TaskId,
        limit: usize,
    ) -> TaskRepositoryResult<Vec<HistoryEntry>> {
        let state = self.state.read().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        // Entries are appended in mutation order; newest-first is the
        // reverse walk.
        let entries = state
            .history
            .get(&id)
            .map(|entries| entries.iter().rev().take(limit).cloned().collect())
            .unwrap_or_default();
        Ok(entries)
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        if state.tasks.remove(&id).is_none() {
            return Err(TaskRepositoryError::NotFound(id));
        }
        // History never outlives its task; the trail goes with it.
        state.history.remove(&id);
        Ok(())
    }

    async fn stats(&self) -> TaskRepositoryResult<TaskStats> {
        let state = self.state.read().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;

        let mut stats = TaskStats {
            total: count_as_u64(state.tasks.len()),
            ..TaskStats::default()
        };
        for task in state.tasks.values() {
            match task.status() {
                TaskStatus::Pending => stats.pending += 1,
                TaskStatus::InProgress => stats.in_progress += 1,
                TaskStatus::Completed => stats.completed += 1,
            }
            if task.priority() == Priority::High {
                stats.high_priority += 1;
            }
            *stats.by_category.entry(task.category()).or_insert(0) += 1;
        }
        Ok(stats)
    }
}
