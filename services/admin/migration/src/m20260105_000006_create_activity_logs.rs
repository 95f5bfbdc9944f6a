use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ActivityLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ActivityLogs::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ActivityLogs::UserId).integer())
                    .col(ColumnDef::new(ActivityLogs::Action).string().not_null())
                    .col(ColumnDef::new(ActivityLogs::Description).text())
                    .col(ColumnDef::new(ActivityLogs::ModelType).string())
                    .col(ColumnDef::new(ActivityLogs::ModelId).string())
                    .col(ColumnDef::new(ActivityLogs::Properties).json_binary())
                    .col(ColumnDef::new(ActivityLogs::IpAddress).string_len(45))
                    .col(ColumnDef::new(ActivityLogs::UserAgent).text())
                    .col(
                        ColumnDef::new(ActivityLogs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ActivityLogs::Table, ActivityLogs::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(ActivityLogs::Table)
                    .col(ActivityLogs::CreatedAt)
                    .name("idx_activity_logs_created_at")
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(ActivityLogs::Table)
                    .col(ActivityLogs::Action)
                    .name("idx_activity_logs_action")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ActivityLogs::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ActivityLogs {
    Table,
    Id,
    UserId,
    Action,
    Description,
    ModelType,
    ModelId,
    Properties,
    IpAddress,
    UserAgent,
    CreatedAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
