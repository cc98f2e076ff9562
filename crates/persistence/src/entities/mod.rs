//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod invitation_token;
pub mod invitation_token_log;
pub mod project;
pub mod project_invitation;
pub mod user;

pub use invitation_token::InvitationTokenEntity;
pub use invitation_token_log::InvitationTokenLogEntity;
pub use project::ProjectEntity;
pub use project_invitation::ProjectInvitationEntity;
pub use user::UserEntity;
