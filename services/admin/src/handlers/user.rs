use axum::{
    Json,
    extract::{Path, RawQuery, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use hrdesk_auth_types::context::RequestContext;
use hrdesk_auth_types::identity::IdentityHeaders;
use hrdesk_domain::pagination::PageRequest;
use hrdesk_domain::user::UserRole;

use crate::domain::types::User;
use crate::error::AdminServiceError;
use crate::handlers::business_unit::{SearchFilters, SearchQuery};
use crate::handlers::{PageResponse, parse_query};
use crate::state::AppState;
use crate::usecase::user::{
    CreateUserInput, CreateUserUseCase, DeleteUserUseCase, ListUsersUseCase, UpdateUserInput,
    UpdateUserUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct UserResponse {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    #[serde(serialize_with = "hrdesk_core::serde::opt_to_rfc3339_ms")]
    pub email_verified_at: Option<DateTime<Utc>>,
    #[serde(serialize_with = "hrdesk_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "hrdesk_core::serde::to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            email_verified_at: user.email_verified_at,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

// ── GET /user-management ─────────────────────────────────────────────────────

pub async fn list_users(
    State(state): State<AppState>,
    RawQuery(raw_query): RawQuery,
) -> Result<Json<PageResponse<UserResponse, SearchFilters>>, AdminServiceError> {
    let query: SearchQuery = parse_query(raw_query.as_deref())?;
    let search = query.search.filter(|s| !s.trim().is_empty());
    let usecase = ListUsersUseCase {
        repo: state.user_repo(),
    };
    let page = usecase
        .execute(search.as_deref(), PageRequest::new(query.page, query.per_page))
        .await?;
    Ok(Json(PageResponse::new(
        page,
        SearchFilters { search },
        UserResponse::from,
    )))
}

// ── POST /user-management ────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateUserRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub password_confirmation: String,
    pub role: Option<String>,
}

pub async fn create_user(
    identity: IdentityHeaders,
    ctx: RequestContext,
    State(state): State<AppState>,
    Json(body): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AdminServiceError> {
    let usecase = CreateUserUseCase {
        repo: state.user_repo(),
        hasher: state.password_hasher(),
        audit: state.audit(),
    };
    let user = usecase
        .execute(
            &ctx,
            identity.actor(),
            CreateUserInput {
                name: body.name,
                email: body.email,
                password: body.password,
                password_confirmation: body.password_confirmation,
                role: body.role,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

// ── PUT /user-management/{id} ────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub role: Option<String>,
    pub password: Option<String>,
    pub password_confirmation: Option<String>,
}

pub async fn update_user(
    identity: IdentityHeaders,
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(body): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, AdminServiceError> {
    let usecase = UpdateUserUseCase {
        repo: state.user_repo(),
        hasher: state.password_hasher(),
        audit: state.audit(),
    };
    let user = usecase
        .execute(
            &ctx,
            identity.actor(),
            id,
            UpdateUserInput {
                name: body.name,
                email: body.email,
                role: body.role,
                password: body.password,
                password_confirmation: body.password_confirmation,
            },
        )
        .await?;
    Ok(Json(user.into()))
}

// ── DELETE /user-management/{id} ─────────────────────────────────────────────

pub async fn delete_user(
    identity: IdentityHeaders,
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AdminServiceError> {
    let usecase = DeleteUserUseCase {
        repo: state.user_repo(),
        audit: state.audit(),
    };
    usecase.execute(&ctx, identity.actor(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
