use sea_orm::entity::prelude::*;

/// Front/back ID-card artwork plus the overlay coordinates for one business unit.
///
/// Layout columns are addressed by name (`Column::from_str("qr_x")`), so their
/// names must stay in step with the layout field names.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "template_images")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub business_unit_id: String,
    pub front_image: String,
    pub back_image: String,
    pub photo_x: Option<f64>,
    pub photo_y: Option<f64>,
    pub photo_width: Option<f64>,
    pub photo_height: Option<f64>,
    pub name_x: Option<f64>,
    pub name_y: Option<f64>,
    pub position_x: Option<f64>,
    pub position_y: Option<f64>,
    pub id_number_x: Option<f64>,
    pub id_number_y: Option<f64>,
    pub signature_x: Option<f64>,
    pub signature_y: Option<f64>,
    pub address_x: Option<f64>,
    pub address_y: Option<f64>,
    pub birthday_x: Option<f64>,
    pub birthday_y: Option<f64>,
    pub sss_x: Option<f64>,
    pub sss_y: Option<f64>,
    pub philhealth_x: Option<f64>,
    pub philhealth_y: Option<f64>,
    pub pagibig_x: Option<f64>,
    pub pagibig_y: Option<f64>,
    pub tin_x: Option<f64>,
    pub tin_y: Option<f64>,
    pub emergency_name_x: Option<f64>,
    pub emergency_name_y: Option<f64>,
    pub emergency_contact_x: Option<f64>,
    pub emergency_contact_y: Option<f64>,
    pub emergency_address_x: Option<f64>,
    pub emergency_address_y: Option<f64>,
    pub qr_x: Option<f64>,
    pub qr_y: Option<f64>,
    pub qr_width: Option<f64>,
    pub qr_height: Option<f64>,
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
