use sea_orm_migration::prelude::*;

use hrdesk_domain::layout::LayoutField;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut table = Table::create();
        table
            .table(TemplateImages::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(TemplateImages::Id)
                    .integer()
                    .not_null()
                    .auto_increment()
                    .primary_key(),
            )
            .col(
                ColumnDef::new(TemplateImages::BusinessUnitId)
                    .string()
                    .not_null(),
            )
            .col(ColumnDef::new(TemplateImages::FrontImage).string().not_null())
            .col(ColumnDef::new(TemplateImages::BackImage).string().not_null());
        for field in LayoutField::ALL {
            table.col(ColumnDef::new(Alias::new(field.as_str())).double());
        }
        table
            .col(
                ColumnDef::new(TemplateImages::CreatedAt)
                    .timestamp_with_time_zone()
                    .not_null()
                    .default(Expr::current_timestamp()),
            )
            .col(
                ColumnDef::new(TemplateImages::UpdatedAt)
                    .timestamp_with_time_zone()
                    .not_null()
                    .default(Expr::current_timestamp()),
            )
            .foreign_key(
                ForeignKey::create()
                    .from(TemplateImages::Table, TemplateImages::BusinessUnitId)
                    .to(BusinessUnits::Table, BusinessUnits::Id)
                    .on_delete(ForeignKeyAction::Cascade),
            );

        manager.create_table(table.to_owned()).await?;
        manager
            .create_index(
                Index::create()
                    .table(TemplateImages::Table)
                    .col(TemplateImages::BusinessUnitId)
                    .name("idx_template_images_business_unit_id")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TemplateImages::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum TemplateImages {
    Table,
    Id,
    BusinessUnitId,
    FrontImage,
    BackImage,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum BusinessUnits {
    Table,
    Id,
}
