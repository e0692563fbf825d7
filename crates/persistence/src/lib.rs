//! Persistence layer for the PlanUpp backend.
//!
//! This crate contains:
//! - Database connection management
//! - Entity definitions (database row mappings)
//! - Repository implementations
//!
//! Compound mutations (membership change + event counter mirror, report
//! resolution + ban increment) always run inside a single transaction.

pub mod db;
pub mod entities;
pub mod metrics;
pub mod repositories;
