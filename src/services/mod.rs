pub mod analytics;
pub mod hackathons;
pub mod invitations;
pub mod membership;
pub mod security;
pub mod teams;
pub mod telegram;
pub mod users;

pub use security::*;
