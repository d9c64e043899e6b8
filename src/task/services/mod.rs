//! Application services for task lifecycle orchestration.

mod lifecycle;

pub use lifecycle::{
    ClassificationPreview, CreateTaskRequest, TaskLifecycleError, TaskLifecycleResult,
    TaskLifecycleService, TaskPage, TaskWithHistory, UpdateTaskRequest,
};
