//! Audit trail domain types.

use serde::Serialize;
use uuid::Uuid;

/// Entity an audit entry refers to.
///
/// Stored as a `(model_type, model_id)` string pair; see [`AuditTarget::parts`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum AuditTarget {
    Employee(Uuid),
    BusinessUnit(String),
    User(i32),
    TemplateImage(i32),
}

impl AuditTarget {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Employee(_) => "Employee",
            Self::BusinessUnit(_) => "BusinessUnit",
            Self::User(_) => "User",
            Self::TemplateImage(_) => "TemplateImage",
        }
    }

    /// `(model_type, model_id)` as persisted.
    pub fn parts(&self) -> (&'static str, String) {
        let id = match self {
            Self::Employee(id) => id.to_string(),
            Self::BusinessUnit(id) => id.clone(),
            Self::User(id) | Self::TemplateImage(id) => id.to_string(),
        };
        (self.type_name(), id)
    }

    /// Rebuild a target from persisted parts. Unknown types or malformed ids yield `None`.
    pub fn from_parts(model_type: &str, model_id: &str) -> Option<Self> {
        match model_type {
            "Employee" => model_id.parse().ok().map(Self::Employee),
            "BusinessUnit" => Some(Self::BusinessUnit(model_id.to_owned())),
            "User" => model_id.parse().ok().map(Self::User),
            "TemplateImage" => model_id.parse().ok().map(Self::TemplateImage),
            _ => None,
        }
    }
}

/// Action tags written to the audit trail, `<entity>_<verb>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuditAction {
    EmployeeCreated,
    EmployeeUpdated,
    EmployeeDeleted,
    EmployeesBulkDeleted,
    EmployeeIdIssued,
    BusinessUnitCreated,
    BusinessUnitUpdated,
    BusinessUnitDeleted,
    BusinessUnitsBulkDeleted,
    TemplateCreated,
    TemplateUpdated,
    TemplatePositionsUpdated,
    TemplateDeleted,
    UserCreated,
    UserUpdated,
    UserDeleted,
    NetworkPathUpdated,
}

impl AuditAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::EmployeeCreated => "employee_created",
            Self::EmployeeUpdated => "employee_updated",
            Self::EmployeeDeleted => "employee_deleted",
            Self::EmployeesBulkDeleted => "employees_bulk_deleted",
            Self::EmployeeIdIssued => "employee_id_issued",
            Self::BusinessUnitCreated => "business_unit_created",
            Self::BusinessUnitUpdated => "business_unit_updated",
            Self::BusinessUnitDeleted => "business_unit_deleted",
            Self::BusinessUnitsBulkDeleted => "business_units_bulk_deleted",
            Self::TemplateCreated => "template_created",
            Self::TemplateUpdated => "template_updated",
            Self::TemplatePositionsUpdated => "template_positions_updated",
            Self::TemplateDeleted => "template_deleted",
            Self::UserCreated => "user_created",
            Self::UserUpdated => "user_updated",
            Self::UserDeleted => "user_deleted",
            Self::NetworkPathUpdated => "network_path_updated",
        }
    }
}
