//! Domain model definitions.

pub mod invitation;
pub mod invitation_token;
pub mod role;
pub mod session;
pub mod token_log;

pub use invitation::{
    AcceptInvitationRequest, AcceptInvitationResponse, CreateInvitationRequest,
    CreateInvitationResponse, CreateTokenRequest, CreateTokenResponse,
};
pub use invitation_token::{
    InvitationTokenResponse, ListTokensQuery, ListTokensResponse, TokenPagination, TokenStatus,
};
pub use role::{GrantRole, RoleParseError};
pub use session::{has_role, Session, SessionRole};
pub use token_log::{TokenAuditRecord, TokenOperation};
