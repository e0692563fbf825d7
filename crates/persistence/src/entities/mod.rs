//! Database entity definitions.
//!
//! Entities are direct mappings to database rows. They convert into domain
//! models at the repository boundary so core logic never sees raw rows.

pub mod chat;
pub mod event;
pub mod message;
pub mod report;
pub mod user;

pub use chat::ChatEntity;
pub use event::EventEntity;
pub use message::MessageEntity;
pub use report::{ReportEntity, ReportWithProfilesEntity};
pub use user::{PublicProfileEntity, UserEntity};
