//! Identity schema migrations (accounts, roles, memberships).
//!
//! Bookkeeping lives in the default `seaql_migrations` table.

use sea_orm_migration::prelude::*;

mod m20250101_identity_schema;
mod m20250115_account_roles_index;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_identity_schema::Migration),
            Box::new(m20250115_account_roles_index::Migration),
        ]
    }
}
