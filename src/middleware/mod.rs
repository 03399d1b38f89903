pub mod auth;
pub mod security_headers;

pub use auth::{require_admin, require_user, AuthenticatedAdmin, AuthenticatedUser};
pub use security_headers::security_headers;
