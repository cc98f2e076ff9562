//! Repository implementations for database operations.

pub mod invitation_token;
pub mod project;
pub mod project_invitation;
pub mod token_log;
pub mod user;

pub use invitation_token::{InvitationTokenRepository, RedeemOutcome};
pub use project::ProjectRepository;
pub use project_invitation::ProjectInvitationRepository;
pub use token_log::InvitationTokenLogRepository;
pub use user::UserRepository;
