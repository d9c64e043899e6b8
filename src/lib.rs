//! Tasktriage: rule-based task classification and lifecycle management.
//!
//! This crate derives structured metadata (category, priority, suggested
//! next actions, and extracted entities) from free-text task descriptions
//! and manages the task lifecycle, recording every mutation as an immutable
//! history entry written atomically with its task.
//!
//! # Architecture
//!
//! Tasktriage follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (in-memory, database)
//!
//! HTTP transport, request-schema validation, and process lifecycle are
//! deliberately out of scope; embedders wire those around the
//! [`task::services::TaskLifecycleService`] surface.
//!
//! # Modules
//!
//! - [`classify`]: Keyword-driven category, priority, and action suggestion
//! - [`extract`]: Pattern-based entity and due-date extraction
//! - [`task`]: Task lifecycle orchestration and audit history

pub mod classify;
pub mod extract;
pub mod task;
