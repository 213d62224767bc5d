use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Index on created_at for the most-recent-first listing
        manager
            .create_index(
                Index::create()
                    .name("idx_request_logs_created_at")
                    .table(RequestLogs::Table)
                    .col(RequestLogs::CreatedAt)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_request_logs_created_at")
                    .table(RequestLogs::Table)
                    .to_owned(),
            )
            .await
    }
}

#[derive(Iden)]
enum RequestLogs {
    Table,
    CreatedAt,
}
