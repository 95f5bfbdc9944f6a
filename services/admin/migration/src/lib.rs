use sea_orm_migration::prelude::*;

mod m20260105_000001_create_users;
mod m20260105_000002_create_business_units;
mod m20260105_000003_create_employees;
mod m20260105_000004_create_employee_sequences;
mod m20260105_000005_create_template_images;
mod m20260105_000006_create_activity_logs;
mod m20260105_000007_create_network_paths;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260105_000001_create_users::Migration),
            Box::new(m20260105_000002_create_business_units::Migration),
            Box::new(m20260105_000003_create_employees::Migration),
            Box::new(m20260105_000004_create_employee_sequences::Migration),
            Box::new(m20260105_000005_create_template_images::Migration),
            Box::new(m20260105_000006_create_activity_logs::Migration),
            Box::new(m20260105_000007_create_network_paths::Migration),
        ]
    }
}
