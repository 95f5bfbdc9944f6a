use axum::{
    Json,
    extract::{RawQuery, State},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use hrdesk_auth_types::identity::IdentityHeaders;
use hrdesk_domain::audit::AuditTarget;
use hrdesk_domain::pagination::PageRequest;

use crate::domain::types::{ActivityLog, ActivityLogFilter};
use crate::error::AdminServiceError;
use crate::handlers::employee::DeletedResponse;
use crate::handlers::{PageResponse, parse_query};
use crate::state::AppState;
use crate::usecase::activity_log::{ClearActivityLogsUseCase, ListActivityLogsUseCase};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct ActivityLogResponse {
    pub id: i64,
    pub user_id: Option<i32>,
    pub user_name: Option<String>,
    pub action: String,
    pub description: Option<String>,
    pub target: Option<AuditTarget>,
    pub properties: Option<Value>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    #[serde(serialize_with = "hrdesk_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
}

impl From<ActivityLog> for ActivityLogResponse {
    fn from(log: ActivityLog) -> Self {
        Self {
            id: log.id,
            user_id: log.user_id,
            user_name: log.user_name,
            action: log.action,
            description: log.description,
            target: log.target,
            properties: log.properties,
            ip_address: log.ip_address,
            user_agent: log.user_agent,
            created_at: log.created_at,
        }
    }
}

#[derive(Serialize)]
pub struct ActivityLogFilters {
    pub search: Option<String>,
    pub user_id: Option<i32>,
    pub action: Vec<String>,
}

#[derive(Serialize)]
pub struct ActivityLogIndexResponse {
    #[serde(flatten)]
    pub page: PageResponse<ActivityLogResponse, ActivityLogFilters>,
    pub actions: Vec<String>,
}

// ── Query params ─────────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct ActivityLogListQuery {
    pub search: Option<String>,
    pub user_id: Option<i32>,
    #[serde(default)]
    pub action: Vec<String>,
    pub page: Option<u32>,
    #[serde(rename = "per-page")]
    pub per_page: Option<u32>,
}

// ── GET /activity-logs ───────────────────────────────────────────────────────

pub async fn list_activity_logs(
    State(state): State<AppState>,
    RawQuery(raw_query): RawQuery,
) -> Result<Json<ActivityLogIndexResponse>, AdminServiceError> {
    let query: ActivityLogListQuery = parse_query(raw_query.as_deref())?;
    let filter = ActivityLogFilter {
        search: query.search,
        user_id: query.user_id,
        actions: query.action,
    };
    let usecase = ListActivityLogsUseCase {
        repo: state.activity_log_repo(),
    };
    let index = usecase
        .execute(filter.clone(), PageRequest::new(query.page, query.per_page))
        .await?;

    let filters = ActivityLogFilters {
        search: filter.search.filter(|s| !s.trim().is_empty()),
        user_id: filter.user_id,
        action: filter.actions,
    };
    Ok(Json(ActivityLogIndexResponse {
        page: PageResponse::new(index.logs, filters, ActivityLogResponse::from),
        actions: index.actions,
    }))
}

// ── DELETE /activity-logs ────────────────────────────────────────────────────

pub async fn clear_activity_logs(
    identity: IdentityHeaders,
    State(state): State<AppState>,
) -> Result<Json<DeletedResponse>, AdminServiceError> {
    let usecase = ClearActivityLogsUseCase {
        repo: state.activity_log_repo(),
    };
    let deleted = usecase.execute(identity.actor()).await?;
    Ok(Json(DeletedResponse { deleted }))
}
