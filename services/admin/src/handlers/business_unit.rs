use axum::{
    Json,
    extract::{Multipart, Path, RawQuery, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use hrdesk_auth_types::context::RequestContext;
use hrdesk_domain::pagination::PageRequest;

use crate::domain::types::BusinessUnit;
use crate::error::AdminServiceError;
use crate::handlers::employee::DeletedResponse;
use crate::handlers::form::FormData;
use crate::handlers::{PageResponse, parse_query};
use crate::state::AppState;
use crate::usecase::business_unit::{
    BulkDeleteBusinessUnitsUseCase, BusinessUnitInput, CreateBusinessUnitUseCase,
    DeleteBusinessUnitUseCase, ListBusinessUnitsUseCase, UpdateBusinessUnitUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct BusinessUnitResponse {
    pub id: String,
    pub name: String,
    pub code: Option<String>,
    pub image: Option<String>,
    #[serde(serialize_with = "hrdesk_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "hrdesk_core::serde::to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl From<BusinessUnit> for BusinessUnitResponse {
    fn from(unit: BusinessUnit) -> Self {
        Self {
            id: unit.id,
            name: unit.name,
            code: unit.code,
            image: unit.image,
            created_at: unit.created_at,
            updated_at: unit.updated_at,
        }
    }
}

/// Entry of a business unit dropdown.
#[derive(Serialize)]
pub struct BusinessUnitOption {
    pub id: String,
    pub name: String,
}

impl From<BusinessUnit> for BusinessUnitOption {
    fn from(unit: BusinessUnit) -> Self {
        Self {
            id: unit.id,
            name: unit.name,
        }
    }
}

#[derive(Serialize)]
pub struct SearchFilters {
    pub search: Option<String>,
}

// ── Query params ─────────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct SearchQuery {
    pub search: Option<String>,
    pub page: Option<u32>,
    #[serde(rename = "per-page")]
    pub per_page: Option<u32>,
}

fn business_unit_input(mut form: FormData) -> BusinessUnitInput {
    BusinessUnitInput {
        name: form.text("name"),
        code: form.text("code"),
        remove_image: form.flag("remove_image"),
        image: form.take_file("image"),
    }
}

// ── GET /business-units ──────────────────────────────────────────────────────

pub async fn list_business_units(
    State(state): State<AppState>,
    RawQuery(raw_query): RawQuery,
) -> Result<Json<PageResponse<BusinessUnitResponse, SearchFilters>>, AdminServiceError> {
    let query: SearchQuery = parse_query(raw_query.as_deref())?;
    let search = query.search.filter(|s| !s.trim().is_empty());
    let usecase = ListBusinessUnitsUseCase {
        repo: state.business_unit_repo(),
    };
    let page = usecase
        .execute(search.as_deref(), PageRequest::new(query.page, query.per_page))
        .await?;
    Ok(Json(PageResponse::new(
        page,
        SearchFilters { search },
        BusinessUnitResponse::from,
    )))
}

// ── POST /business-units ─────────────────────────────────────────────────────

pub async fn create_business_unit(
    ctx: RequestContext,
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<BusinessUnitResponse>), AdminServiceError> {
    let input = business_unit_input(FormData::read(multipart).await?);
    let usecase = CreateBusinessUnitUseCase {
        repo: state.business_unit_repo(),
        blobs: state.blob_store().await?,
        audit: state.audit(),
    };
    let unit = usecase.execute(&ctx, input).await?;
    Ok((StatusCode::CREATED, Json(unit.into())))
}

// ── PUT /business-units/{id} ─────────────────────────────────────────────────

pub async fn update_business_unit(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Json<BusinessUnitResponse>, AdminServiceError> {
    let input = business_unit_input(FormData::read(multipart).await?);
    let usecase = UpdateBusinessUnitUseCase {
        repo: state.business_unit_repo(),
        blobs: state.blob_store().await?,
        audit: state.audit(),
    };
    let unit = usecase.execute(&ctx, &id, input).await?;
    Ok(Json(unit.into()))
}

// ── DELETE /business-units/{id} ──────────────────────────────────────────────

pub async fn delete_business_unit(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AdminServiceError> {
    let usecase = DeleteBusinessUnitUseCase {
        repo: state.business_unit_repo(),
        blobs: state.blob_store().await?,
        audit: state.audit(),
    };
    usecase.execute(&ctx, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── POST /business-units/bulk-delete ─────────────────────────────────────────

#[derive(Deserialize)]
pub struct BulkDeleteBusinessUnitsRequest {
    #[serde(default)]
    pub ids: Vec<String>,
}

pub async fn bulk_delete_business_units(
    ctx: RequestContext,
    State(state): State<AppState>,
    Json(body): Json<BulkDeleteBusinessUnitsRequest>,
) -> Result<Json<DeletedResponse>, AdminServiceError> {
    let usecase = BulkDeleteBusinessUnitsUseCase {
        repo: state.business_unit_repo(),
        blobs: state.blob_store().await?,
        audit: state.audit(),
    };
    let deleted = usecase.execute(&ctx, body.ids).await?;
    Ok(Json(DeletedResponse { deleted }))
}
