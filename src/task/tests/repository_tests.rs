//! Behaviour tests for the in-memory repository adapter.

use super::SteppingClock;
use crate::classify::{Category, Priority};
use crate::extract::ExtractedEntities;
use crate::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::{
        HistoryAction, HistoryEntry, NewTaskData, Task, TaskId, TaskStatus, TaskTitle,
    },
    ports::{
        PageRequest, SortField, SortOrder, TaskFilter, TaskRepository, TaskRepositoryError,
    },
};
use rstest::{fixture, rstest};
use serde_json::json;

#[fixture]
fn repo() -> InMemoryTaskRepository {
    InMemoryTaskRepository::new()
}

#[fixture]
fn clock() -> SteppingClock {
    SteppingClock::new()
}

fn task_with(title: &str, priority: Priority, status: TaskStatus, clock: &SteppingClock) -> Task {
    Task::new(
        NewTaskData {
            title: TaskTitle::new(title).expect("valid title"),
            description: None,
            category: Category::General,
            priority,
            status,
            assigned_to: None,
            due_date: None,
            extracted_entities: ExtractedEntities::default(),
            suggested_actions: Vec::new(),
        },
        clock,
    )
}

fn created_entry(task: &Task, clock: &SteppingClock) -> HistoryEntry {
    HistoryEntry::new(
        task.id(),
        HistoryAction::Created,
        None,
        json!({}),
        "system",
        clock,
    )
}

async fn seed(repo: &InMemoryTaskRepository, task: &Task, clock: &SteppingClock) {
    repo.insert(task, &created_entry(task, clock))
        .await
        .expect("insert succeeds");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn insert_rejects_duplicate_identifiers(repo: InMemoryTaskRepository, clock: SteppingClock) {
    let task = task_with("First task", Priority::Low, TaskStatus::Pending, &clock);
    seed(&repo, &task, &clock).await;

    let result = repo.insert(&task, &created_entry(&task, &clock)).await;
    assert!(matches!(
        result,
        Err(TaskRepositoryError::DuplicateTask(id)) if id == task.id()
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_of_missing_task_is_not_found(repo: InMemoryTaskRepository, clock: SteppingClock) {
    let task = task_with("Ghost task", Priority::Low, TaskStatus::Pending, &clock);
    let result = repo.update(&task, &created_entry(&task, &clock)).await;
    assert!(matches!(result, Err(TaskRepositoryError::NotFound(_))));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn list_defaults_to_created_at_descending(
    repo: InMemoryTaskRepository,
    clock: SteppingClock,
) {
    for title in ["Oldest task", "Middle task", "Newest task"] {
        let task = task_with(title, Priority::Low, TaskStatus::Pending, &clock);
        seed(&repo, &task, &clock).await;
    }

    let (items, total) = repo
        .list(&TaskFilter::default(), &PageRequest::default())
        .await
        .expect("list succeeds");

    assert_eq!(total, 3);
    let titles: Vec<&str> = items.iter().map(|t| t.title().as_str()).collect();
    assert_eq!(titles, vec!["Newest task", "Middle task", "Oldest task"]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn list_applies_equality_filters(repo: InMemoryTaskRepository, clock: SteppingClock) {
    let pending = task_with("Pending one", Priority::High, TaskStatus::Pending, &clock);
    let done = task_with("Done one", Priority::Low, TaskStatus::Completed, &clock);
    seed(&repo, &pending, &clock).await;
    seed(&repo, &done, &clock).await;

    let filter = TaskFilter {
        status: Some(TaskStatus::Completed),
        ..TaskFilter::default()
    };
    let (items, total) = repo
        .list(&filter, &PageRequest::default())
        .await
        .expect("list succeeds");

    assert_eq!(total, 1);
    assert_eq!(items.first().map(|t| t.id()), Some(done.id()));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn list_paginates_with_offset_and_limit(
    repo: InMemoryTaskRepository,
    clock: SteppingClock,
) {
    for index in 0..5 {
        let task = task_with(
            &format!("Task number {index}"),
            Priority::Low,
            TaskStatus::Pending,
            &clock,
        );
        seed(&repo, &task, &clock).await;
    }

    let page = PageRequest {
        limit: 2,
        offset: 4,
        ..PageRequest::default()
    };
    let (items, total) = repo
        .list(&TaskFilter::default(), &page)
        .await
        .expect("list succeeds");

    assert_eq!(total, 5);
    assert_eq!(items.len(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn list_sorts_priority_by_storage_string(
    repo: InMemoryTaskRepository,
    clock: SteppingClock,
) {
    for (title, priority) in [
        ("Medium task", Priority::Medium),
        ("High task", Priority::High),
        ("Low task", Priority::Low),
    ] {
        let task = task_with(title, priority, TaskStatus::Pending, &clock);
        seed(&repo, &task, &clock).await;
    }

    let page = PageRequest {
        sort_by: SortField::Priority,
        sort_order: SortOrder::Asc,
        ..PageRequest::default()
    };
    let (items, _) = repo
        .list(&TaskFilter::default(), &page)
        .await
        .expect("list succeeds");

    // Storage strings sort lexically: high < low < medium, the same order a
    // database varchar column would produce.
    let titles: Vec<&str> = items.iter().map(|t| t.title().as_str()).collect();
    assert_eq!(titles, vec!["High task", "Low task", "Medium task"]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn recent_history_returns_newest_first_up_to_limit(
    repo: InMemoryTaskRepository,
    clock: SteppingClock,
) {
    let task = task_with("Busy task", Priority::Low, TaskStatus::Pending, &clock);
    seed(&repo, &task, &clock).await;

    for index in 0..3 {
        let entry = HistoryEntry::new(
            task.id(),
            HistoryAction::Updated,
            Some(json!({})),
            json!({"revision": index}),
            "system",
            &clock,
        );
        repo.update(&task, &entry).await.expect("update succeeds");
    }

    let entries = repo
        .recent_history(task.id(), 2)
        .await
        .expect("history loads");

    assert_eq!(entries.len(), 2);
    assert_eq!(entries.first().map(HistoryEntry::new_value), Some(&json!({"revision": 2})));
    assert_eq!(entries.get(1).map(HistoryEntry::new_value), Some(&json!({"revision": 1})));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn delete_of_missing_task_is_not_found(repo: InMemoryTaskRepository) {
    let result = repo.delete(TaskId::new()).await;
    assert!(matches!(result, Err(TaskRepositoryError::NotFound(_))));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn delete_drops_history_with_the_task(repo: InMemoryTaskRepository, clock: SteppingClock) {
    let task = task_with("Doomed task", Priority::Low, TaskStatus::Pending, &clock);
    seed(&repo, &task, &clock).await;

    repo.delete(task.id()).await.expect("delete succeeds");

    // Known audit gap: the trail goes with the task and no deletion entry
    // is written.
    let entries = repo
        .recent_history(task.id(), 20)
        .await
        .expect("history loads");
    assert!(entries.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn stats_counts_by_status_priority_and_category(
    repo: InMemoryTaskRepository,
    clock: SteppingClock,
) {
    let mut seeds = vec![
        task_with("Pending high", Priority::High, TaskStatus::Pending, &clock),
        task_with("Working low", Priority::Low, TaskStatus::InProgress, &clock),
        task_with("Done high", Priority::High, TaskStatus::Completed, &clock),
    ];
    // Give one task a non-default category.
    seeds.push(Task::new(
        NewTaskData {
            title: TaskTitle::new("Budget review").expect("valid title"),
            description: None,
            category: Category::Finance,
            priority: Priority::Medium,
            status: TaskStatus::Pending,
            assigned_to: None,
            due_date: None,
            extracted_entities: ExtractedEntities::default(),
            suggested_actions: Vec::new(),
        },
        &clock,
    ));
    for task in &seeds {
        seed(&repo, task, &clock).await;
    }

    let stats = repo.stats().await.expect("stats loads");

    assert_eq!(stats.total, 4);
    assert_eq!(stats.pending, 2);
    assert_eq!(stats.in_progress, 1);
    assert_eq!(stats.completed, 1);
    assert_eq!(stats.high_priority, 2);
    assert_eq!(stats.by_category.get(&Category::General), Some(&3));
    assert_eq!(stats.by_category.get(&Category::Finance), Some(&1));
}
