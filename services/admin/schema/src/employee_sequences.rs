use sea_orm::entity::prelude::*;

/// Name of the sequence row that hands out employee ID counters.
pub const EMPLOYEE_ID_SEQUENCE: &str = "employee_id";

/// Last value handed out by a named counter. Locked with `FOR UPDATE` while a
/// new value is being assigned.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "employee_sequences")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub name: String,
    pub last_value: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
