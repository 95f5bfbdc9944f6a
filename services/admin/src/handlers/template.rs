use axum::{
    Json,
    extract::{Multipart, Path, RawQuery, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use hrdesk_auth_types::context::RequestContext;
use hrdesk_domain::pagination::PageRequest;

use crate::domain::types::{TemplateImage, TemplateRecord};
use crate::error::AdminServiceError;
use crate::handlers::business_unit::BusinessUnitOption;
use crate::handlers::form::FormData;
use crate::handlers::{PageResponse, parse_query};
use crate::state::AppState;
use crate::usecase::template::{
    CreateTemplateUseCase, DeleteTemplateUseCase, GetTemplateUseCase, ListTemplatesUseCase,
    PositionUpdate, TemplateInput, UpdateTemplatePositionsUseCase, UpdateTemplateUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct TemplateResponse {
    pub id: i32,
    pub business_unit_id: String,
    pub business_unit_name: Option<String>,
    pub front_image: String,
    pub back_image: String,
    /// Every layout field; unset ones are `null`.
    pub positions: Value,
    #[serde(serialize_with = "hrdesk_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "hrdesk_core::serde::to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl TemplateResponse {
    fn new(template: TemplateImage, business_unit_name: Option<String>) -> Self {
        Self {
            positions: template.layout.to_full_json(),
            id: template.id,
            business_unit_id: template.business_unit_id,
            business_unit_name,
            front_image: template.front_image,
            back_image: template.back_image,
            created_at: template.created_at,
            updated_at: template.updated_at,
        }
    }
}

impl From<TemplateRecord> for TemplateResponse {
    fn from(record: TemplateRecord) -> Self {
        Self::new(record.template, record.business_unit_name)
    }
}

#[derive(Serialize)]
pub struct TemplateFilters {
    pub business_unit_id: Option<String>,
}

#[derive(Serialize)]
pub struct TemplateIndexResponse {
    #[serde(flatten)]
    pub page: PageResponse<TemplateResponse, TemplateFilters>,
    pub business_units: Vec<BusinessUnitOption>,
}

// ── Query params ─────────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct TemplateListQuery {
    pub business_unit_id: Option<String>,
    pub page: Option<u32>,
    #[serde(rename = "per-page")]
    pub per_page: Option<u32>,
}

fn template_input(mut form: FormData) -> TemplateInput {
    TemplateInput {
        business_unit_id: form.text("business_unit_id"),
        front_image: form.take_file("front_image"),
        back_image: form.take_file("back_image"),
    }
}

// ── GET /templates ───────────────────────────────────────────────────────────

pub async fn list_templates(
    State(state): State<AppState>,
    RawQuery(raw_query): RawQuery,
) -> Result<Json<TemplateIndexResponse>, AdminServiceError> {
    let query: TemplateListQuery = parse_query(raw_query.as_deref())?;
    let business_unit_id = query.business_unit_id.filter(|s| !s.trim().is_empty());
    let usecase = ListTemplatesUseCase {
        templates: state.template_repo(),
        business_units: state.business_unit_repo(),
    };
    let index = usecase
        .execute(
            business_unit_id.as_deref(),
            PageRequest::new(query.page, query.per_page),
        )
        .await?;
    Ok(Json(TemplateIndexResponse {
        page: PageResponse::new(
            index.templates,
            TemplateFilters { business_unit_id },
            TemplateResponse::from,
        ),
        business_units: index
            .business_units
            .into_iter()
            .map(BusinessUnitOption::from)
            .collect(),
    }))
}

// ── GET /templates/{id} ──────────────────────────────────────────────────────

pub async fn get_template(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<TemplateResponse>, AdminServiceError> {
    let usecase = GetTemplateUseCase {
        templates: state.template_repo(),
    };
    Ok(Json(usecase.execute(id).await?.into()))
}

// ── POST /templates ──────────────────────────────────────────────────────────

pub async fn create_template(
    ctx: RequestContext,
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<TemplateResponse>), AdminServiceError> {
    let input = template_input(FormData::read(multipart).await?);
    let usecase = CreateTemplateUseCase {
        templates: state.template_repo(),
        business_units: state.business_unit_repo(),
        blobs: state.blob_store().await?,
        audit: state.audit(),
    };
    let template = usecase.execute(&ctx, input).await?;
    Ok((StatusCode::CREATED, Json(TemplateResponse::new(template, None))))
}

// ── PUT /templates/{id} ──────────────────────────────────────────────────────

pub async fn update_template(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    multipart: Multipart,
) -> Result<Json<TemplateResponse>, AdminServiceError> {
    let input = template_input(FormData::read(multipart).await?);
    let usecase = UpdateTemplateUseCase {
        templates: state.template_repo(),
        business_units: state.business_unit_repo(),
        blobs: state.blob_store().await?,
        audit: state.audit(),
    };
    let template = usecase.execute(&ctx, id, input).await?;
    Ok(Json(TemplateResponse::new(template, None)))
}

// ── PATCH|PUT /templates/{id}/positions ──────────────────────────────────────

async fn update_positions(
    ctx: RequestContext,
    state: AppState,
    id: i32,
    payload: Map<String, Value>,
    mode: PositionUpdate,
) -> Result<Json<TemplateResponse>, AdminServiceError> {
    let usecase = UpdateTemplatePositionsUseCase {
        templates: state.template_repo(),
        audit: state.audit(),
    };
    let template = usecase.execute(&ctx, id, &payload, mode).await?;
    Ok(Json(TemplateResponse::new(template, None)))
}

pub async fn patch_template_positions(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<Map<String, Value>>,
) -> Result<Json<TemplateResponse>, AdminServiceError> {
    update_positions(ctx, state, id, payload, PositionUpdate::Partial).await
}

pub async fn replace_template_positions(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<Map<String, Value>>,
) -> Result<Json<TemplateResponse>, AdminServiceError> {
    update_positions(ctx, state, id, payload, PositionUpdate::Full).await
}

// ── DELETE /templates/{id} ───────────────────────────────────────────────────

pub async fn delete_template(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AdminServiceError> {
    let usecase = DeleteTemplateUseCase {
        templates: state.template_repo(),
        blobs: state.blob_store().await?,
        audit: state.audit(),
    };
    usecase.execute(&ctx, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
