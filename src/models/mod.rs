pub mod admin;
pub mod auth_code;
pub mod hackathon;
pub mod invitation;
pub mod registration;
pub mod team;
pub mod team_member;
pub mod user;

#[allow(unused_imports)]
pub mod prelude {
    pub use super::admin::{self, Entity as Admin};
    pub use super::auth_code::{self, Entity as AuthCode};
    pub use super::hackathon::{self, Entity as Hackathon};
    pub use super::invitation::{self, Entity as Invitation};
    pub use super::registration::{self, Entity as Registration};
    pub use super::team::{self, Entity as Team};
    pub use super::team_member::{self, Entity as TeamMember};
    pub use super::user::{self, Entity as User};
}
