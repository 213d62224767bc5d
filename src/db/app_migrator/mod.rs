//! Application table migrations, tracked separately from the identity schema.
//!
//! Units here can be reverted one at a time by name with `migrate.revert`.

use sea_orm_migration::prelude::*;

use crate::constants::migrations::APP_MIGRATION_TABLE;

mod m1000_create_request_logs;
mod m1001_index_request_logs;

pub struct AppMigrator;

#[async_trait::async_trait]
impl MigratorTrait for AppMigrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m1000_create_request_logs::Migration),
            Box::new(m1001_index_request_logs::Migration),
        ]
    }

    fn migration_table_name() -> DynIden {
        Alias::new(APP_MIGRATION_TABLE).into_iden()
    }
}
