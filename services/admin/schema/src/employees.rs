use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "employees")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub id_number: String,
    #[sea_orm(unique)]
    pub id_counter: i32,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub suffix: Option<String>,
    pub position: String,
    pub business_unit_id: String,
    pub birthday: Option<chrono::NaiveDate>,
    pub address: Option<String>,
    pub contact_number: Option<String>,
    pub sss_number: Option<String>,
    pub philhealth_number: Option<String>,
    pub pagibig_number: Option<String>,
    pub tin_number: Option<String>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_number: Option<String>,
    pub emergency_contact_address: Option<String>,
    pub employment_status: String,
    pub id_status: String,
    pub photo: Option<String>,
    pub signature: Option<String>,
    pub qr_code: Option<String>,
    pub hire_date: chrono::NaiveDate,
    pub issuance_count: i32,
    pub exported_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::business_units::Entity",
        from = "Column::BusinessUnitId",
        to = "super::business_units::Column::Id",
        on_delete = "Cascade"
    )]
    BusinessUnit,
}

impl Related<super::business_units::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BusinessUnit.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
