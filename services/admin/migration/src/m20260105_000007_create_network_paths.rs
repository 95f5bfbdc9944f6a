use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(NetworkPaths::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(NetworkPaths::Key)
                            .string_len(64)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(NetworkPaths::Value).text().not_null())
                    .col(
                        ColumnDef::new(NetworkPaths::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(NetworkPaths::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(NetworkPaths::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum NetworkPaths {
    Table,
    Key,
    Value,
    CreatedAt,
    UpdatedAt,
}
