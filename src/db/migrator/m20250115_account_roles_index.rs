use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .name("idx_account_roles_role_id")
                    .table(AccountRoles::Table)
                    .col(AccountRoles::RoleId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_account_roles_role_id")
                    .table(AccountRoles::Table)
                    .to_owned(),
            )
            .await
    }
}

#[derive(Iden)]
enum AccountRoles {
    Table,
    RoleId,
}
