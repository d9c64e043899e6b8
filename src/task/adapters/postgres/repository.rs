//! `PostgreSQL` repository implementation for task lifecycle storage.

use super::{
    models::{HistoryRow, NewHistoryRow, NewTaskRow, TaskChangeset, TaskRow},
    schema::{task_history, tasks},
};
use crate::classify::{Category, Priority};
use crate::extract::ExtractedEntities;
use crate::task::{
    domain::{
        HistoryAction, HistoryEntry, HistoryId, PersistedHistoryData, PersistedTaskData, Task,
        TaskDescription, TaskId, TaskStatus, TaskTitle,
    },
    ports::{
        PageRequest, SortField, SortOrder, TaskFilter, TaskRepository, TaskRepositoryError,
        TaskRepositoryResult, TaskStats,
    },
};
use async_trait::async_trait;
use diesel::dsl::count_star;
use diesel::pg::{Pg, PgConnection};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by task adapters.
pub type TaskPgPool = Pool<ConnectionManager<PgConnection>>;

impl From<DieselError> for TaskRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

/// `PostgreSQL`-backed task repository.
///
/// Paired task+history writes run inside one database transaction so the
/// audit trail can never drift from the task collection.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: TaskPgPool,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskRepositoryError::persistence)?
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn insert(&self, task: &Task, entry: &HistoryEntry) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let new_row = to_new_row(task)?;
        let history_row = to_new_history_row(entry);

        self.run_blocking(move |connection| {
            connection.transaction::<_, TaskRepositoryError, _>(|conn| {
                diesel::insert_into(tasks::table)
                    .values(&new_row)
                    .execute(conn)
                    .map_err(|err| match err {
                        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                            TaskRepositoryError::DuplicateTask(task_id)
                        }
                        other => TaskRepositoryError::persistence(other),
                    })?;

                diesel::insert_into(task_history::table)
                    .values(&history_row)
                    .execute(conn)?;
                Ok(())
            })
        })
        .await
    }

    async fn update(&self, task: &Task, entry: &HistoryEntry) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let changeset = to_changeset(task)?;
        let history_row = to_new_history_row(entry);

        self.run_blocking(move |connection| {
            connection.transaction::<_, TaskRepositoryError, _>(|conn| {
                let updated = diesel::update(tasks::table.filter(tasks::id.eq(task_id.into_inner())))
                    .set(&changeset)
                    .execute(conn)?;
                if updated == 0 {
                    return Err(TaskRepositoryError::NotFound(task_id));
                }

                diesel::insert_into(task_history::table)
                    .values(&history_row)
                    .execute(conn)?;
                Ok(())
            })
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = tasks::table
                .filter(tasks::id.eq(id.into_inner()))
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn list(
        &self,
        filter: &TaskFilter,
        page: &PageRequest,
    ) -> TaskRepositoryResult<(Vec<Task>, u64)> {
        let list_filter = *filter;
        let list_page = *page;
        self.run_blocking(move |connection| {
            let total: i64 = filtered(&list_filter).count().get_result(connection)?;

            let query = ordered(filtered(&list_filter), &list_page)
                .limit(i64::try_from(list_page.limit).unwrap_or(i64::MAX))
                .offset(i64::try_from(list_page.offset).unwrap_or(i64::MAX));
            let rows = query
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)?;

            let items = rows
                .into_iter()
                .map(row_to_task)
                .collect::<TaskRepositoryResult<Vec<Task>>>()?;
            Ok((items, u64::try_from(total).unwrap_or_default()))
        })
        .await
    }

    async fn recent_history(
        &self,
        id: TaskId,
        limit: usize,
    ) -> TaskRepositoryResult<Vec<HistoryEntry>> {
        self.run_blocking(move |connection| {
            let rows = task_history::table
                .filter(task_history::task_id.eq(id.into_inner()))
                .order(task_history::changed_at.desc())
                .limit(i64::try_from(limit).unwrap_or(i64::MAX))
                .select(HistoryRow::as_select())
                .load::<HistoryRow>(connection)?;
            rows.into_iter().map(history_row_to_entry).collect()
        })
        .await
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        self.run_blocking(move |connection| {
            connection.transaction::<_, TaskRepositoryError, _>(|conn| {
                diesel::delete(
                    task_history::table.filter(task_history::task_id.eq(id.into_inner())),
                )
                .execute(conn)?;
                let deleted =
                    diesel::delete(tasks::table.filter(tasks::id.eq(id.into_inner())))
                        .execute(conn)?;
                if deleted == 0 {
                    return Err(TaskRepositoryError::NotFound(id));
                }
                Ok(())
            })
        })
        .await
    }

    async fn stats(&self) -> TaskRepositoryResult<TaskStats> {
        self.run_blocking(load_stats).await
    }
}

type BoxedTasks<'a> = tasks::BoxedQuery<'a, Pg>;

fn filtered<'a>(filter: &TaskFilter) -> BoxedTasks<'a> {
    let mut query = tasks::table.into_boxed();
    if let Some(status) = filter.status {
        query = query.filter(tasks::status.eq(status.as_str()));
    }
    if let Some(category) = filter.category {
        query = query.filter(tasks::category.eq(category.as_str()));
    }
    if let Some(priority) = filter.priority {
        query = query.filter(tasks::priority.eq(priority.as_str()));
    }
    query
}

fn ordered<'a>(query: BoxedTasks<'a>, page: &PageRequest) -> BoxedTasks<'a> {
    match (page.sort_by, page.sort_order) {
        (SortField::CreatedAt, SortOrder::Asc) => query.order(tasks::created_at.asc()),
        (SortField::CreatedAt, SortOrder::Desc) => query.order(tasks::created_at.desc()),
        (SortField::UpdatedAt, SortOrder::Asc) => query.order(tasks::updated_at.asc()),
        (SortField::UpdatedAt, SortOrder::Desc) => query.order(tasks::updated_at.desc()),
        (SortField::DueDate, SortOrder::Asc) => query.order(tasks::due_date.asc()),
        (SortField::DueDate, SortOrder::Desc) => query.order(tasks::due_date.desc()),
        (SortField::Title, SortOrder::Asc) => query.order(tasks::title.asc()),
        (SortField::Title, SortOrder::Desc) => query.order(tasks::title.desc()),
        (SortField::Priority, SortOrder::Asc) => query.order(tasks::priority.asc()),
        (SortField::Priority, SortOrder::Desc) => query.order(tasks::priority.desc()),
        (SortField::Status, SortOrder::Asc) => query.order(tasks::status.asc()),
        (SortField::Status, SortOrder::Desc) => query.order(tasks::status.desc()),
    }
}

fn load_stats(connection: &mut PgConnection) -> TaskRepositoryResult<TaskStats> {
    let status_counts: Vec<(String, i64)> = tasks::table
        .group_by(tasks::status)
        .select((tasks::status, count_star()))
        .load(connection)?;
    let high_priority: i64 = tasks::table
        .filter(tasks::priority.eq(Priority::High.as_str()))
        .count()
        .get_result(connection)?;
    let category_counts: Vec<(String, i64)> = tasks::table
        .group_by(tasks::category)
        .select((tasks::category, count_star()))
        .load(connection)?;

    let mut stats = TaskStats {
        high_priority: u64::try_from(high_priority).unwrap_or_default(),
        ..TaskStats::default()
    };
    for (status, count) in status_counts {
        let count = u64::try_from(count).unwrap_or_default();
        stats.total += count;
        match TaskStatus::try_from(status.as_str())
            .map_err(TaskRepositoryError::persistence)?
        {
            TaskStatus::Pending => stats.pending += count,
            TaskStatus::InProgress => stats.in_progress += count,
            TaskStatus::Completed => stats.completed += count,
        }
    }
    for (category, count) in category_counts {
        let parsed =
            Category::try_from(category.as_str()).map_err(TaskRepositoryError::persistence)?;
        stats
            .by_category
            .insert(parsed, u64::try_from(count).unwrap_or_default());
    }
    Ok(stats)
}

fn to_new_row(task: &Task) -> TaskRepositoryResult<NewTaskRow> {
    let entities = serde_json::to_value(task.extracted_entities())
        .map_err(TaskRepositoryError::persistence)?;
    let actions = serde_json::to_value(task.suggested_actions())
        .map_err(TaskRepositoryError::persistence)?;

    Ok(NewTaskRow {
        id: task.id().into_inner(),
        title: task.title().as_str().to_owned(),
        description: task.description().map(|d| d.as_str().to_owned()),
        category: task.category().as_str().to_owned(),
        priority: task.priority().as_str().to_owned(),
        status: task.status().as_str().to_owned(),
        assigned_to: task.assigned_to().map(str::to_owned),
        due_date: task.due_date(),
        extracted_entities: entities,
        suggested_actions: actions,
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    })
}

fn to_changeset(task: &Task) -> TaskRepositoryResult<TaskChangeset> {
    let entities = serde_json::to_value(task.extracted_entities())
        .map_err(TaskRepositoryError::persistence)?;
    let actions = serde_json::to_value(task.suggested_actions())
        .map_err(TaskRepositoryError::persistence)?;

    Ok(TaskChangeset {
        title: task.title().as_str().to_owned(),
        description: task.description().map(|d| d.as_str().to_owned()),
        category: task.category().as_str().to_owned(),
        priority: task.priority().as_str().to_owned(),
        status: task.status().as_str().to_owned(),
        assigned_to: task.assigned_to().map(str::to_owned),
        due_date: task.due_date(),
        extracted_entities: entities,
        suggested_actions: actions,
        updated_at: task.updated_at(),
    })
}

fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let title = TaskTitle::new(row.title).map_err(TaskRepositoryError::persistence)?;
    let description = row
        .description
        .map(TaskDescription::new)
        .transpose()
        .map_err(TaskRepositoryError::persistence)?;
    let category =
        Category::try_from(row.category.as_str()).map_err(TaskRepositoryError::persistence)?;
    let priority =
        Priority::try_from(row.priority.as_str()).map_err(TaskRepositoryError::persistence)?;
    let status =
        TaskStatus::try_from(row.status.as_str()).map_err(TaskRepositoryError::persistence)?;
    let extracted_entities = serde_json::from_value::<ExtractedEntities>(row.extracted_entities)
        .map_err(TaskRepositoryError::persistence)?;
    let suggested_actions = serde_json::from_value::<Vec<String>>(row.suggested_actions)
        .map_err(TaskRepositoryError::persistence)?;

    Ok(Task::from_persisted(PersistedTaskData {
        id: TaskId::from_uuid(row.id),
        title,
        description,
        category,
        priority,
        status,
        assigned_to: row.assigned_to,
        due_date: row.due_date,
        extracted_entities,
        suggested_actions,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }))
}

fn to_new_history_row(entry: &HistoryEntry) -> NewHistoryRow {
    NewHistoryRow {
        id: entry.id().into_inner(),
        task_id: entry.task_id().into_inner(),
        action: entry.action().as_str().to_owned(),
        old_value: entry.old_value().cloned(),
        new_value: entry.new_value().clone(),
        changed_by: entry.changed_by().to_owned(),
        changed_at: entry.changed_at(),
    }
}

fn history_row_to_entry(row: HistoryRow) -> TaskRepositoryResult<HistoryEntry> {
    let action =
        HistoryAction::try_from(row.action.as_str()).map_err(TaskRepositoryError::persistence)?;
    Ok(HistoryEntry::from_persisted(PersistedHistoryData {
        id: HistoryId::from_uuid(row.id),
        task_id: TaskId::from_uuid(row.task_id),
        action,
        old_value: row.old_value,
        new_value: row.new_value,
        changed_by: row.changed_by,
        changed_at: row.changed_at,
    }))
}
