//! Adapter implementations of the task ports.

pub mod memory;
#[cfg(feature = "postgres")]
pub mod postgres;
