//! Business-rule services.

pub mod membership;
pub mod moderation;
