//! Repository implementations.

pub mod chat;
pub mod event;
pub mod message;
pub mod report;
pub mod user;

pub use chat::{ChatRepository, ChatStoreError};
pub use event::{EventRepository, NewEvent};
pub use message::MessageRepository;
pub use report::{BanOutcome, ReportRepository, ReportStoreError};
pub use user::UserRepository;
