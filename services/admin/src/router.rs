use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{delete, get, patch, post, put},
};
use tower_http::trace::TraceLayer;

use hrdesk_core::health::healthz;
use hrdesk_core::middleware::{propagate_request_id_layer, request_id_layer};
use hrdesk_domain::access::Capability;

use crate::guard::guarded;
use crate::handlers::{
    activity_log::{clear_activity_logs, list_activity_logs},
    business_unit::{
        bulk_delete_business_units, create_business_unit, delete_business_unit,
        list_business_units, update_business_unit,
    },
    employee::{
        bulk_delete_employees, create_employee, delete_employee, get_employee, list_employees,
        record_id_issuance, update_employee,
    },
    health::readyz,
    settings::{get_network_path, update_network_path},
    template::{
        create_template, delete_template, get_template, list_templates,
        patch_template_positions, replace_template_positions, update_template,
    },
    user::{create_user, delete_user, list_users, update_user},
};
use crate::state::AppState;

/// Multipart bodies carry up to four images of 2 MiB each plus form fields.
const BODY_LIMIT_BYTES: usize = 16 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Employees
        .route("/employees", guarded(get(list_employees), Capability::ViewEmployees))
        .route("/employees", guarded(post(create_employee), Capability::ManageEmployees))
        .route("/employees/{id}", guarded(get(get_employee), Capability::ViewEmployees))
        .route("/employees/{id}", guarded(put(update_employee), Capability::ManageEmployees))
        .route("/employees/{id}", guarded(delete(delete_employee), Capability::ManageEmployees))
        .route(
            "/employees/bulk-delete",
            guarded(post(bulk_delete_employees), Capability::ManageEmployees),
        )
        .route(
            "/employees/{id}/issuance",
            guarded(post(record_id_issuance), Capability::ManageEmployees),
        )
        // Business units
        .route(
            "/business-units",
            guarded(get(list_business_units), Capability::ViewBusinessUnits),
        )
        .route(
            "/business-units",
            guarded(post(create_business_unit), Capability::ManageBusinessUnits),
        )
        .route(
            "/business-units/{id}",
            guarded(put(update_business_unit), Capability::ManageBusinessUnits),
        )
        .route(
            "/business-units/{id}",
            guarded(delete(delete_business_unit), Capability::DeleteBusinessUnits),
        )
        .route(
            "/business-units/bulk-delete",
            guarded(post(bulk_delete_business_units), Capability::DeleteBusinessUnits),
        )
        // Templates
        .route("/templates", guarded(get(list_templates), Capability::ViewTemplates))
        .route("/templates", guarded(post(create_template), Capability::ManageTemplates))
        .route("/templates/{id}", guarded(get(get_template), Capability::ViewTemplates))
        .route("/templates/{id}", guarded(put(update_template), Capability::ManageTemplates))
        .route("/templates/{id}", guarded(delete(delete_template), Capability::DeleteTemplates))
        .route(
            "/templates/{id}/positions",
            guarded(patch(patch_template_positions), Capability::ManageTemplates),
        )
        .route(
            "/templates/{id}/positions",
            guarded(put(replace_template_positions), Capability::ManageTemplates),
        )
        // User management
        .route("/user-management", guarded(get(list_users), Capability::ViewUsers))
        .route("/user-management", guarded(post(create_user), Capability::ManageUsers))
        .route("/user-management/{id}", guarded(put(update_user), Capability::ManageUsers))
        .route("/user-management/{id}", guarded(delete(delete_user), Capability::DeleteUsers))
        // Activity logs
        .route(
            "/activity-logs",
            guarded(get(list_activity_logs), Capability::ViewActivityLogs),
        )
        .route(
            "/activity-logs",
            guarded(delete(clear_activity_logs), Capability::ClearActivityLogs),
        )
        // Settings
        .route(
            "/settings/network-path",
            guarded(get(get_network_path), Capability::ManageSettings),
        )
        .route(
            "/settings/network-path",
            guarded(put(update_network_path), Capability::ManageSettings),
        )
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(propagate_request_id_layer())
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .with_state(state)
}
