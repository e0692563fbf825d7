//! Domain layer for the PlanUpp backend.
//!
//! This crate contains:
//! - Domain models (User, Event, ChatRoom, ChatMessage, UserReport)
//! - Pure business-rule services (membership, moderation)
//! - Domain error types
//!
//! Nothing in this crate performs I/O; the persistence layer applies these
//! rules inside database transactions.

pub mod models;
pub mod services;
