//! Domain model for task lifecycle management.
//!
//! The task domain models auto-classified task records, partial updates, and
//! the append-only mutation history while keeping all infrastructure
//! concerns outside of the domain boundary.

mod error;
mod history;
mod ids;
mod task;

pub use error::{ParseHistoryActionError, ParseTaskStatusError, TaskDomainError};
pub use history::{HistoryAction, HistoryEntry, PersistedHistoryData, SYSTEM_ACTOR};
pub use ids::{HistoryId, TaskDescription, TaskId, TaskTitle};
pub use task::{NewTaskData, PersistedTaskData, Task, TaskPatch, TaskStatus};
