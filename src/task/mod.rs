//! Task lifecycle management.
//!
//! Creates task records with auto-classified metadata, merges partial
//! updates, derives aggregate statistics, and records every mutation as an
//! immutable history entry written atomically with its task. The module
//! follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
