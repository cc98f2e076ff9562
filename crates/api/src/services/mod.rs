//! Application services used by route handlers.

pub mod email;

pub use email::{EmailError, EmailService};
