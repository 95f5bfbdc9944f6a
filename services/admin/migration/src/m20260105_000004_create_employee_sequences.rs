use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(EmployeeSequences::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EmployeeSequences::Name)
                            .string_len(64)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(EmployeeSequences::LastValue)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .to_owned(),
            )
            .await?;

        // Seed the row so the first create has something to lock.
        manager
            .exec_stmt(
                Query::insert()
                    .into_table(EmployeeSequences::Table)
                    .columns([EmployeeSequences::Name, EmployeeSequences::LastValue])
                    .values_panic(["employee_id".into(), 0.into()])
                    .on_conflict(
                        OnConflict::column(EmployeeSequences::Name)
                            .do_nothing()
                            .to_owned(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(EmployeeSequences::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum EmployeeSequences {
    Table,
    Name,
    LastValue,
}
