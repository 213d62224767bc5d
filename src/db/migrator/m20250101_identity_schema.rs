use crate::entities::prelude::*;
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::Schema;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();
        let schema = Schema::new(backend);

        manager
            .create_table(
                schema
                    .create_table_from_entity(Accounts)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(Roles)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // Memberships reference both tables, so they go last.
        manager
            .create_table(
                schema
                    .create_table_from_entity(AccountRoles)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AccountRoles).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Roles).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Accounts).to_owned())
            .await?;

        Ok(())
    }
}
