//! Role-based access policy.
//!
//! Every route names the [`Capability`] it needs; [`permits`] answers from a
//! single static table so no handler compares role strings itself.

use serde::Serialize;

use crate::user::UserRole;

/// Something an account may be allowed to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    ViewEmployees,
    ManageEmployees,
    ViewBusinessUnits,
    ManageBusinessUnits,
    DeleteBusinessUnits,
    ViewTemplates,
    ManageTemplates,
    DeleteTemplates,
    ViewUsers,
    ManageUsers,
    DeleteUsers,
    /// Grant a role other than HR when creating or editing an account.
    AssignAdminRole,
    ViewActivityLogs,
    ClearActivityLogs,
    ManageSettings,
}

const HR_CAPABILITIES: &[Capability] = &[
    Capability::ViewEmployees,
    Capability::ManageEmployees,
    Capability::ViewBusinessUnits,
    Capability::ManageBusinessUnits,
    Capability::ViewTemplates,
    Capability::ManageTemplates,
    Capability::ViewUsers,
    Capability::ManageUsers,
];

/// Whether `role` holds `capability`. Admin holds everything.
pub fn permits(role: UserRole, capability: Capability) -> bool {
    match role {
        UserRole::Admin => true,
        UserRole::Hr => HR_CAPABILITIES.contains(&capability),
    }
}

/// Role actually stored when `actor_role` asks to assign `requested`.
///
/// Accounts without [`Capability::AssignAdminRole`] can only ever produce HR accounts.
pub fn effective_role(actor_role: UserRole, requested: UserRole) -> UserRole {
    if permits(actor_role, Capability::AssignAdminRole) {
        requested
    } else {
        UserRole::Hr
    }
}
