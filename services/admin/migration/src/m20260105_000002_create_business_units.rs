use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(BusinessUnits::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BusinessUnits::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(BusinessUnits::Name).string().not_null())
                    .col(ColumnDef::new(BusinessUnits::Code).string().unique_key())
                    .col(ColumnDef::new(BusinessUnits::Image).string())
                    .col(
                        ColumnDef::new(BusinessUnits::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(BusinessUnits::UpdatedAt)
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
            .drop_table(Table::drop().table(BusinessUnits::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum BusinessUnits {
    Table,
    Id,
    Name,
    Code,
    Image,
    CreatedAt,
    UpdatedAt,
}
