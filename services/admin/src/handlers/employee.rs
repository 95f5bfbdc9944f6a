use axum::{
    Json,
    extract::{Multipart, Path, RawQuery, State},
    http::StatusCode,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use hrdesk_auth_types::context::RequestContext;
use hrdesk_domain::employee::{EmployeeSortField, EmploymentStatus, IdStatus};
use hrdesk_domain::pagination::{PageRequest, Sort};

use crate::domain::types::{Employee, EmployeeFilter, EmployeeRecord, EmployeeSort};
use crate::error::AdminServiceError;
use crate::handlers::business_unit::BusinessUnitOption;
use crate::handlers::form::FormData;
use crate::handlers::{PageResponse, parse_query};
use crate::state::AppState;
use crate::usecase::employee::{
    BulkDeleteEmployeesUseCase, CreateEmployeeUseCase, DeleteEmployeeUseCase, EmployeeInput,
    GetEmployeeUseCase, ListEmployeesUseCase, RecordIdIssuanceUseCase, UpdateEmployeeUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct EmployeeResponse {
    pub id: Uuid,
    pub id_number: String,
    pub full_name: String,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub suffix: Option<String>,
    pub position: String,
    pub business_unit_id: String,
    pub business_unit_name: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub address: Option<String>,
    pub contact_number: Option<String>,
    pub sss_number: Option<String>,
    pub philhealth_number: Option<String>,
    pub pagibig_number: Option<String>,
    pub tin_number: Option<String>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_number: Option<String>,
    pub emergency_contact_address: Option<String>,
    pub employment_status: EmploymentStatus,
    pub id_status: IdStatus,
    pub photo: Option<String>,
    pub signature: Option<String>,
    pub qr_code: Option<String>,
    pub hire_date: NaiveDate,
    pub issuance_count: i32,
    #[serde(serialize_with = "hrdesk_core::serde::opt_to_rfc3339_ms")]
    pub exported_at: Option<DateTime<Utc>>,
    #[serde(serialize_with = "hrdesk_core::serde::opt_to_rfc3339_ms")]
    pub id_expires_at: Option<DateTime<Utc>>,
    #[serde(serialize_with = "hrdesk_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "hrdesk_core::serde::to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl EmployeeResponse {
    fn new(employee: Employee, business_unit_name: Option<String>) -> Self {
        let id_expires_at = employee.id_expires_at();
        let full_name = employee.profile.full_name();
        let p = employee.profile;
        Self {
            id: employee.id,
            id_number: employee.id_number,
            full_name,
            first_name: p.first_name,
            middle_name: p.middle_name,
            last_name: p.last_name,
            suffix: p.suffix,
            position: p.position,
            business_unit_id: p.business_unit_id,
            business_unit_name,
            birthday: p.birthday,
            address: p.address,
            contact_number: p.contact_number,
            sss_number: p.sss_number,
            philhealth_number: p.philhealth_number,
            pagibig_number: p.pagibig_number,
            tin_number: p.tin_number,
            emergency_contact_name: p.emergency_contact_name,
            emergency_contact_number: p.emergency_contact_number,
            emergency_contact_address: p.emergency_contact_address,
            employment_status: p.employment_status,
            id_status: p.id_status,
            photo: p.photo,
            signature: p.signature,
            qr_code: p.qr_code,
            hire_date: employee.hire_date,
            issuance_count: employee.issuance_count,
            exported_at: employee.exported_at,
            id_expires_at,
            created_at: employee.created_at,
            updated_at: employee.updated_at,
        }
    }
}

impl From<EmployeeRecord> for EmployeeResponse {
    fn from(record: EmployeeRecord) -> Self {
        Self::new(record.employee, record.business_unit_name)
    }
}

#[derive(Serialize)]
pub struct EmployeeFilters {
    pub search: Option<String>,
    pub business_unit_id: Option<String>,
    pub sort_field: &'static str,
    pub sort_direction: &'static str,
}

#[derive(Serialize)]
pub struct EmployeeIndexResponse {
    #[serde(flatten)]
    pub page: PageResponse<EmployeeResponse, EmployeeFilters>,
    pub business_units: Vec<BusinessUnitOption>,
}

impl EmployeeFilters {
    /// Filter state reported back to the client. Sort fields are echoed under
    /// their public names, so `business_unit_name` survives storage ordering.
    fn echo(filter: EmployeeFilter, sort: EmployeeSort) -> Self {
        Self {
            search: filter.search,
            business_unit_id: filter.business_unit_id,
            sort_field: sort.field.as_str(),
            sort_direction: sort.direction.as_str(),
        }
    }
}

// ── Query params ─────────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct EmployeeListQuery {
    pub search: Option<String>,
    pub business_unit_id: Option<String>,
    pub sort_field: Option<String>,
    pub sort_direction: Option<String>,
    pub page: Option<u32>,
    #[serde(rename = "per-page")]
    pub per_page: Option<u32>,
}

/// Blank filters are dropped; unknown sort keys fall back to the defaults.
fn list_params(query: EmployeeListQuery) -> (EmployeeFilter, EmployeeSort) {
    let sort = EmployeeSort {
        field: query
            .sort_field
            .as_deref()
            .and_then(EmployeeSortField::parse)
            .unwrap_or_default(),
        direction: query
            .sort_direction
            .as_deref()
            .and_then(Sort::parse)
            .unwrap_or(Sort::Asc),
    };
    let filter = EmployeeFilter {
        search: query.search.filter(|s| !s.trim().is_empty()),
        business_unit_id: query.business_unit_id.filter(|s| !s.trim().is_empty()),
    };
    (filter, sort)
}

fn employee_input(mut form: FormData) -> EmployeeInput {
    EmployeeInput {
        first_name: form.text("first_name"),
        middle_name: form.text("middle_name"),
        last_name: form.text("last_name"),
        suffix: form.text("suffix"),
        position: form.text("position"),
        business_unit_id: form.text("business_unit_id"),
        birthday: form.text("birthday"),
        address: form.text("address"),
        contact_number: form.text("contact_number"),
        sss_number: form.text("sss_number"),
        philhealth_number: form.text("philhealth_number"),
        pagibig_number: form.text("pagibig_number"),
        tin_number: form.text("tin_number"),
        emergency_contact_name: form.text("emergency_contact_name"),
        emergency_contact_number: form.text("emergency_contact_number"),
        emergency_contact_address: form.text("emergency_contact_address"),
        employment_status: form.text("employment_status"),
        id_status: form.text("id_status"),
        photo: form.take_file("photo"),
        signature: form.take_file("signature"),
        qr_code: form.take_file("qr_code"),
    }
}

// ── GET /employees ───────────────────────────────────────────────────────────

pub async fn list_employees(
    State(state): State<AppState>,
    RawQuery(raw_query): RawQuery,
) -> Result<Json<EmployeeIndexResponse>, AdminServiceError> {
    let query: EmployeeListQuery = parse_query(raw_query.as_deref())?;
    let page = PageRequest::new(query.page, query.per_page);
    let (filter, sort) = list_params(query);

    let usecase = ListEmployeesUseCase {
        employees: state.employee_repo(),
        business_units: state.business_unit_repo(),
    };
    let index = usecase.execute(&filter, sort, page).await?;

    let filters = EmployeeFilters::echo(filter, sort);
    Ok(Json(EmployeeIndexResponse {
        page: PageResponse::new(index.employees, filters, EmployeeResponse::from),
        business_units: index
            .business_units
            .into_iter()
            .map(BusinessUnitOption::from)
            .collect(),
    }))
}

// ── GET /employees/{id} ──────────────────────────────────────────────────────

pub async fn get_employee(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<EmployeeResponse>, AdminServiceError> {
    let usecase = GetEmployeeUseCase {
        employees: state.employee_repo(),
    };
    Ok(Json(usecase.execute(id).await?.into()))
}

// ── POST /employees ──────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct CreateEmployeeResponse {
    pub id: Uuid,
    pub id_number: String,
}

pub async fn create_employee(
    ctx: RequestContext,
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<CreateEmployeeResponse>), AdminServiceError> {
    let input = employee_input(FormData::read(multipart).await?);
    let usecase = CreateEmployeeUseCase {
        employees: state.employee_repo(),
        business_units: state.business_unit_repo(),
        blobs: state.blob_store().await?,
        audit: state.audit(),
    };
    let created = usecase.execute(&ctx, input).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreateEmployeeResponse {
            id: created.id,
            id_number: created.id_number,
        }),
    ))
}

// ── PUT /employees/{id} ──────────────────────────────────────────────────────

pub async fn update_employee(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<EmployeeResponse>, AdminServiceError> {
    let input = employee_input(FormData::read(multipart).await?);
    let usecase = UpdateEmployeeUseCase {
        employees: state.employee_repo(),
        business_units: state.business_unit_repo(),
        blobs: state.blob_store().await?,
        audit: state.audit(),
    };
    usecase.execute(&ctx, id, input).await?;

    let record = GetEmployeeUseCase {
        employees: state.employee_repo(),
    }
    .execute(id)
    .await?;
    Ok(Json(record.into()))
}

// ── DELETE /employees/{id} ───────────────────────────────────────────────────

pub async fn delete_employee(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AdminServiceError> {
    let usecase = DeleteEmployeeUseCase {
        employees: state.employee_repo(),
        blobs: state.blob_store().await?,
        audit: state.audit(),
    };
    usecase.execute(&ctx, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── POST /employees/bulk-delete ──────────────────────────────────────────────

#[derive(Deserialize)]
pub struct BulkDeleteEmployeesRequest {
    #[serde(default)]
    pub ids: Vec<Uuid>,
}

#[derive(Serialize)]
pub struct DeletedResponse {
    pub deleted: u64,
}

pub async fn bulk_delete_employees(
    ctx: RequestContext,
    State(state): State<AppState>,
    Json(body): Json<BulkDeleteEmployeesRequest>,
) -> Result<Json<DeletedResponse>, AdminServiceError> {
    let usecase = BulkDeleteEmployeesUseCase {
        employees: state.employee_repo(),
        blobs: state.blob_store().await?,
        audit: state.audit(),
    };
    let deleted = usecase.execute(&ctx, body.ids).await?;
    Ok(Json(DeletedResponse { deleted }))
}

// ── POST /employees/{id}/issuance ────────────────────────────────────────────

pub async fn record_id_issuance(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<EmployeeResponse>, AdminServiceError> {
    let usecase = RecordIdIssuanceUseCase {
        employees: state.employee_repo(),
        audit: state.audit(),
    };
    usecase.execute(&ctx, id).await?;

    let record = GetEmployeeUseCase {
        employees: state.employee_repo(),
    }
    .execute(id)
    .await?;
    Ok(Json(record.into()))
}
