use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Employees::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Employees::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Employees::IdNumber)
                            .string_len(16)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Employees::IdCounter)
                            .integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Employees::FirstName).string().not_null())
                    .col(ColumnDef::new(Employees::MiddleName).string())
                    .col(ColumnDef::new(Employees::LastName).string().not_null())
                    .col(ColumnDef::new(Employees::Suffix).string())
                    .col(ColumnDef::new(Employees::Position).string().not_null())
                    .col(ColumnDef::new(Employees::BusinessUnitId).string().not_null())
                    .col(ColumnDef::new(Employees::Birthday).date())
                    .col(ColumnDef::new(Employees::Address).text())
                    .col(ColumnDef::new(Employees::ContactNumber).string())
                    .col(ColumnDef::new(Employees::SssNumber).string())
                    .col(ColumnDef::new(Employees::PhilhealthNumber).string())
                    .col(ColumnDef::new(Employees::PagibigNumber).string())
                    .col(ColumnDef::new(Employees::TinNumber).string())
                    .col(ColumnDef::new(Employees::EmergencyContactName).string())
                    .col(ColumnDef::new(Employees::EmergencyContactNumber).string())
                    .col(ColumnDef::new(Employees::EmergencyContactAddress).text())
                    .col(
                        ColumnDef::new(Employees::EmploymentStatus)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Employees::IdStatus)
                            .string_len(16)
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(Employees::Photo).string())
                    .col(ColumnDef::new(Employees::Signature).string())
                    .col(ColumnDef::new(Employees::QrCode).string())
                    .col(ColumnDef::new(Employees::HireDate).date().not_null())
                    .col(
                        ColumnDef::new(Employees::IssuanceCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Employees::ExportedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Employees::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Employees::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Employees::Table, Employees::BusinessUnitId)
                            .to(BusinessUnits::Table, BusinessUnits::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(Employees::Table)
                    .col(Employees::BusinessUnitId)
                    .name("idx_employees_business_unit_id")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Employees::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Employees {
    Table,
    Id,
    IdNumber,
    IdCounter,
    FirstName,
    MiddleName,
    LastName,
    Suffix,
    Position,
    BusinessUnitId,
    Birthday,
    Address,
    ContactNumber,
    SssNumber,
    PhilhealthNumber,
    PagibigNumber,
    TinNumber,
    EmergencyContactName,
    EmergencyContactNumber,
    EmergencyContactAddress,
    EmploymentStatus,
    IdStatus,
    Photo,
    Signature,
    QrCode,
    HireDate,
    IssuanceCount,
    ExportedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum BusinessUnits {
    Table,
    Id,
}
