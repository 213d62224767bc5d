use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(RequestLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RequestLogs::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(RequestLogs::Method).string().not_null())
                    .col(ColumnDef::new(RequestLogs::Path).string().not_null())
                    .col(ColumnDef::new(RequestLogs::StatusCode).integer().not_null())
                    .col(
                        ColumnDef::new(RequestLogs::DurationMs)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(RequestLogs::UserEmail).string().null())
                    .col(ColumnDef::new(RequestLogs::CreatedAt).string().not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RequestLogs::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum RequestLogs {
    Table,
    Id,
    Method,
    Path,
    StatusCode,
    DurationMs,
    UserEmail,
    CreatedAt,
}
