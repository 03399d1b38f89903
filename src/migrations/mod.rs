pub use sea_orm_migration::prelude::*;

mod m20260301_000001_create_users;
mod m20260301_000002_create_admins;
mod m20260301_000003_create_hackathons;
mod m20260301_000004_create_teams;
mod m20260301_000005_create_team_members;
mod m20260301_000006_create_registrations;
mod m20260301_000007_create_invitations;
mod m20260301_000008_create_auth_codes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_create_users::Migration),
            Box::new(m20260301_000002_create_admins::Migration),
            Box::new(m20260301_000003_create_hackathons::Migration),
            Box::new(m20260301_000004_create_teams::Migration),
            Box::new(m20260301_000005_create_team_members::Migration),
            Box::new(m20260301_000006_create_registrations::Migration),
            Box::new(m20260301_000007_create_invitations::Migration),
            Box::new(m20260301_000008_create_auth_codes::Migration),
        ]
    }
}
