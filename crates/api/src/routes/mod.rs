//! HTTP route handlers.

pub mod analytics;
pub mod health;
pub mod invitation_tokens;
pub mod invitations;
