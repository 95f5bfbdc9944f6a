use std::collections::HashSet;

use chrono::{NaiveDate, Utc};
use serde_json::json;
use uuid::Uuid;

use hrdesk_auth_types::context::RequestContext;
use hrdesk_core::validation::FieldErrors;
use hrdesk_domain::audit::{AuditAction, AuditTarget};
use hrdesk_domain::employee::{EmploymentStatus, IdStatus};
use hrdesk_domain::pagination::{Page, PageRequest};

use crate::domain::repository::{
    ActivityLogRepository, BlobStore, BusinessUnitRepository, EmployeeRepository,
};
use crate::domain::types::{
    BlobBucket, BusinessUnit, Employee, EmployeeFilter, EmployeeProfile, EmployeeRecord,
    EmployeeSort, NewEmployee, Upload,
};
use crate::error::AdminServiceError;
use crate::usecase::audit::{AuditEvent, AuditTrail, ChangeSet};
use crate::usecase::storage::{StagedBlobs, check_upload, discard_blobs};

const MAX_TEXT_LEN: usize = 255;
const MAX_ADDRESS_LEN: usize = 1000;

/// Raw employee fields as submitted.
///
/// `None` means the field was not sent. On update an absent field keeps its
/// stored value, a blank one clears a nullable field and is rejected for a
/// required one.
#[derive(Debug, Clone, Default)]
pub struct EmployeeInput {
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    pub suffix: Option<String>,
    pub position: Option<String>,
    pub business_unit_id: Option<String>,
    pub birthday: Option<String>,
    pub address: Option<String>,
    pub contact_number: Option<String>,
    pub sss_number: Option<String>,
    pub philhealth_number: Option<String>,
    pub pagibig_number: Option<String>,
    pub tin_number: Option<String>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_number: Option<String>,
    pub emergency_contact_address: Option<String>,
    pub employment_status: Option<String>,
    pub id_status: Option<String>,
    pub photo: Option<Upload>,
    pub signature: Option<Upload>,
    pub qr_code: Option<Upload>,
}

// ── Field merging ────────────────────────────────────────────────────────────

fn check_len(errors: &mut FieldErrors, field: &str, value: &str, max: usize) {
    if value.chars().count() > max {
        errors.add(field, format!("may not be greater than {max} characters"));
    }
}

fn required_text(
    errors: &mut FieldErrors,
    field: &str,
    value: Option<&str>,
    current: Option<&str>,
) -> String {
    match (value.map(str::trim), current) {
        (Some(""), _) | (None, None) => {
            errors.add(field, "is required");
            String::new()
        }
        (Some(v), _) => {
            check_len(errors, field, v, MAX_TEXT_LEN);
            v.to_owned()
        }
        (None, Some(current)) => current.to_owned(),
    }
}

fn optional_text(
    errors: &mut FieldErrors,
    field: &str,
    value: Option<&str>,
    current: Option<&Option<String>>,
    max: usize,
) -> Option<String> {
    match value.map(str::trim) {
        Some("") => None,
        Some(v) => {
            check_len(errors, field, v, max);
            Some(v.to_owned())
        }
        None => current.cloned().flatten(),
    }
}

fn birthday(
    errors: &mut FieldErrors,
    value: Option<&str>,
    current: Option<Option<NaiveDate>>,
    today: NaiveDate,
) -> Option<NaiveDate> {
    match value.map(str::trim) {
        Some("") => None,
        Some(v) => match NaiveDate::parse_from_str(v, "%Y-%m-%d") {
            Ok(date) if date < today => Some(date),
            Ok(_) => {
                errors.add("birthday", "must be a date before today");
                None
            }
            Err(_) => {
                errors.add("birthday", "must be a date in YYYY-MM-DD format");
                None
            }
        },
        None => current.flatten(),
    }
}

fn employment_status(
    errors: &mut FieldErrors,
    value: Option<&str>,
    current: Option<EmploymentStatus>,
) -> EmploymentStatus {
    match (value.map(str::trim).filter(|v| !v.is_empty()), current) {
        (Some(v), _) => v.parse().unwrap_or_else(|_| {
            errors.add(
                "employment_status",
                "must be one of: active, inactive, resigned, terminated",
            );
            EmploymentStatus::Active
        }),
        (None, Some(current)) if value.is_none() => current,
        _ => {
            errors.add("employment_status", "is required");
            EmploymentStatus::Active
        }
    }
}

fn id_status(errors: &mut FieldErrors, value: Option<&str>, current: Option<IdStatus>) -> IdStatus {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => v.parse().unwrap_or_else(|_| {
            errors.add("id_status", "must be one of: pending, printed");
            IdStatus::default()
        }),
        None => current.unwrap_or_default(),
    }
}

/// Apply `input` over `current` (or over nothing, for a create).
///
/// Image keys are carried over from `current`; replacements are stored later.
fn merge_profile(
    input: &EmployeeInput,
    current: Option<&EmployeeProfile>,
    errors: &mut FieldErrors,
) -> EmployeeProfile {
    let today = Utc::now().date_naive();
    let req = |errors: &mut FieldErrors, field: &str, value: &Option<String>, cur: Option<&String>| {
        required_text(errors, field, value.as_deref(), cur.map(String::as_str))
    };
    let opt = |errors: &mut FieldErrors, field: &str, value: &Option<String>, cur: Option<&Option<String>>| {
        optional_text(errors, field, value.as_deref(), cur, MAX_TEXT_LEN)
    };

    let profile = EmployeeProfile {
        first_name: req(errors, "first_name", &input.first_name, current.map(|c| &c.first_name)),
        middle_name: opt(errors, "middle_name", &input.middle_name, current.map(|c| &c.middle_name)),
        last_name: req(errors, "last_name", &input.last_name, current.map(|c| &c.last_name)),
        suffix: opt(errors, "suffix", &input.suffix, current.map(|c| &c.suffix)),
        position: req(errors, "position", &input.position, current.map(|c| &c.position)),
        business_unit_id: req(
            errors,
            "business_unit_id",
            &input.business_unit_id,
            current.map(|c| &c.business_unit_id),
        ),
        birthday: birthday(
            errors,
            input.birthday.as_deref(),
            current.map(|c| c.birthday),
            today,
        ),
        address: optional_text(
            errors,
            "address",
            input.address.as_deref(),
            current.map(|c| &c.address),
            MAX_ADDRESS_LEN,
        ),
        contact_number: opt(
            errors,
            "contact_number",
            &input.contact_number,
            current.map(|c| &c.contact_number),
        ),
        sss_number: opt(errors, "sss_number", &input.sss_number, current.map(|c| &c.sss_number)),
        philhealth_number: opt(
            errors,
            "philhealth_number",
            &input.philhealth_number,
            current.map(|c| &c.philhealth_number),
        ),
        pagibig_number: opt(
            errors,
            "pagibig_number",
            &input.pagibig_number,
            current.map(|c| &c.pagibig_number),
        ),
        tin_number: opt(errors, "tin_number", &input.tin_number, current.map(|c| &c.tin_number)),
        emergency_contact_name: opt(
            errors,
            "emergency_contact_name",
            &input.emergency_contact_name,
            current.map(|c| &c.emergency_contact_name),
        ),
        emergency_contact_number: opt(
            errors,
            "emergency_contact_number",
            &input.emergency_contact_number,
            current.map(|c| &c.emergency_contact_number),
        ),
        emergency_contact_address: optional_text(
            errors,
            "emergency_contact_address",
            input.emergency_contact_address.as_deref(),
            current.map(|c| &c.emergency_contact_address),
            MAX_ADDRESS_LEN,
        ),
        employment_status: employment_status(
            errors,
            input.employment_status.as_deref(),
            current.map(|c| c.employment_status),
        ),
        id_status: id_status(errors, input.id_status.as_deref(), current.map(|c| c.id_status)),
        photo: current.and_then(|c| c.photo.clone()),
        signature: current.and_then(|c| c.signature.clone()),
        qr_code: current.and_then(|c| c.qr_code.clone()),
    };

    check_upload(errors, "photo", input.photo.as_ref());
    check_upload(errors, "signature", input.signature.as_ref());
    check_upload(errors, "qr_code", input.qr_code.as_ref());
    profile
}

fn profile_changes(old: &EmployeeProfile, new: &EmployeeProfile) -> ChangeSet {
    let mut changes = ChangeSet::new();
    changes.track("first_name", &old.first_name, &new.first_name);
    changes.track("middle_name", &old.middle_name, &new.middle_name);
    changes.track("last_name", &old.last_name, &new.last_name);
    changes.track("suffix", &old.suffix, &new.suffix);
    changes.track("position", &old.position, &new.position);
    changes.track("business_unit_id", &old.business_unit_id, &new.business_unit_id);
    changes.track("birthday", &old.birthday, &new.birthday);
    changes.track("address", &old.address, &new.address);
    changes.track("contact_number", &old.contact_number, &new.contact_number);
    changes.track("sss_number", &old.sss_number, &new.sss_number);
    changes.track("philhealth_number", &old.philhealth_number, &new.philhealth_number);
    changes.track("pagibig_number", &old.pagibig_number, &new.pagibig_number);
    changes.track("tin_number", &old.tin_number, &new.tin_number);
    changes.track(
        "emergency_contact_name",
        &old.emergency_contact_name,
        &new.emergency_contact_name,
    );
    changes.track(
        "emergency_contact_number",
        &old.emergency_contact_number,
        &new.emergency_contact_number,
    );
    changes.track(
        "emergency_contact_address",
        &old.emergency_contact_address,
        &new.emergency_contact_address,
    );
    changes.track("employment_status", &old.employment_status, &new.employment_status);
    changes.track("id_status", &old.id_status, &new.id_status);
    changes.track("photo", &old.photo, &new.photo);
    changes.track("signature", &old.signature, &new.signature);
    changes.track("qr_code", &old.qr_code, &new.qr_code);
    changes
}

async fn ensure_business_unit<B: BusinessUnitRepository>(
    business_units: &B,
    id: &str,
    errors: &mut FieldErrors,
) -> Result<(), AdminServiceError> {
    if errors.contains("business_unit_id") {
        return Ok(());
    }
    if business_units.find_by_id(id).await?.is_none() {
        errors.add("business_unit_id", "the selected business unit is invalid");
    }
    Ok(())
}

// ── ListEmployees ────────────────────────────────────────────────────────────

pub struct EmployeeIndex {
    pub employees: Page<EmployeeRecord>,
    /// Every business unit, for the filter dropdown.
    pub business_units: Vec<BusinessUnit>,
}

pub struct ListEmployeesUseCase<E: EmployeeRepository, B: BusinessUnitRepository> {
    pub employees: E,
    pub business_units: B,
}

impl<E: EmployeeRepository, B: BusinessUnitRepository> ListEmployeesUseCase<E, B> {
    pub async fn execute(
        &self,
        filter: &EmployeeFilter,
        sort: EmployeeSort,
        page: PageRequest,
    ) -> Result<EmployeeIndex, AdminServiceError> {
        let employees = self.employees.list(filter, sort, page.clamped()).await?;
        let business_units = self.business_units.all().await?;
        Ok(EmployeeIndex {
            employees,
            business_units,
        })
    }
}

// ── GetEmployee ──────────────────────────────────────────────────────────────

pub struct GetEmployeeUseCase<E: EmployeeRepository> {
    pub employees: E,
}

impl<E: EmployeeRepository> GetEmployeeUseCase<E> {
    pub async fn execute(&self, id: Uuid) -> Result<EmployeeRecord, AdminServiceError> {
        self.employees
            .find_by_id(id)
            .await?
            .ok_or(AdminServiceError::EmployeeNotFound)
    }
}

// ── CreateEmployee ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedEmployee {
    pub id: Uuid,
    pub id_number: String,
}

pub struct CreateEmployeeUseCase<
    E: EmployeeRepository,
    B: BusinessUnitRepository,
    S: BlobStore,
    A: ActivityLogRepository,
> {
    pub employees: E,
    pub business_units: B,
    pub blobs: S,
    pub audit: AuditTrail<A>,
}

impl<E, B, S, A> CreateEmployeeUseCase<E, B, S, A>
where
    E: EmployeeRepository,
    B: BusinessUnitRepository,
    S: BlobStore,
    A: ActivityLogRepository,
{
    pub async fn execute(
        &self,
        ctx: &RequestContext,
        input: EmployeeInput,
    ) -> Result<CreatedEmployee, AdminServiceError> {
        let mut errors = FieldErrors::new();
        let mut profile = merge_profile(&input, None, &mut errors);
        ensure_business_unit(&self.business_units, &profile.business_unit_id, &mut errors).await?;
        errors.into_result()?;

        let mut staged = StagedBlobs::new(&self.blobs);
        profile.photo = staged
            .put(BlobBucket::EmployeePhotos, input.photo.as_ref())
            .await?;
        profile.signature = staged
            .put(BlobBucket::EmployeeSignatures, input.signature.as_ref())
            .await?;
        profile.qr_code = staged
            .put(BlobBucket::EmployeeQrCodes, input.qr_code.as_ref())
            .await?;

        let new = NewEmployee {
            id: Uuid::now_v7(),
            profile,
            hire_date: Utc::now().date_naive(),
        };
        let employee = match self.employees.create(&new).await {
            Ok(employee) => employee,
            Err(e) => {
                staged.rollback().await;
                return Err(e);
            }
        };

        tracing::info!(id = %employee.id, id_number = %employee.id_number, "employee created");
        self.audit
            .record(
                ctx,
                AuditEvent::new(AuditAction::EmployeeCreated)
                    .description(format!(
                        "Created employee {} ({})",
                        employee.profile.full_name(),
                        employee.id_number
                    ))
                    .target(AuditTarget::Employee(employee.id))
                    .properties(json!({
                        "id_number": employee.id_number,
                        "name": employee.profile.full_name(),
                        "position": employee.profile.position,
                        "business_unit_id": employee.profile.business_unit_id,
                        "employment_status": employee.profile.employment_status,
                    })),
            )
            .await;

        Ok(CreatedEmployee {
            id: employee.id,
            id_number: employee.id_number,
        })
    }
}

// ── UpdateEmployee ───────────────────────────────────────────────────────────

pub struct UpdateEmployeeUseCase<
    E: EmployeeRepository,
    B: BusinessUnitRepository,
    S: BlobStore,
    A: ActivityLogRepository,
> {
    pub employees: E,
    pub business_units: B,
    pub blobs: S,
    pub audit: AuditTrail<A>,
}

impl<E, B, S, A> UpdateEmployeeUseCase<E, B, S, A>
where
    E: EmployeeRepository,
    B: BusinessUnitRepository,
    S: BlobStore,
    A: ActivityLogRepository,
{
    pub async fn execute(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        input: EmployeeInput,
    ) -> Result<Employee, AdminServiceError> {
        let current = self
            .employees
            .find_by_id(id)
            .await?
            .ok_or(AdminServiceError::EmployeeNotFound)?
            .employee;

        let mut errors = FieldErrors::new();
        let mut profile = merge_profile(&input, Some(&current.profile), &mut errors);
        if profile.business_unit_id != current.profile.business_unit_id {
            ensure_business_unit(&self.business_units, &profile.business_unit_id, &mut errors)
                .await?;
        }
        errors.into_result()?;

        // Uploads always get fresh keys, so an empty diff means nothing was submitted.
        if input.photo.is_none()
            && input.signature.is_none()
            && input.qr_code.is_none()
            && profile_changes(&current.profile, &profile).is_empty()
        {
            return Ok(current);
        }

        // New blobs are written before the row changes; old ones go only after commit.
        let mut staged = StagedBlobs::new(&self.blobs);
        if let Some(key) = staged
            .put(BlobBucket::EmployeePhotos, input.photo.as_ref())
            .await?
        {
            profile.photo = Some(key);
        }
        if let Some(key) = staged
            .put(BlobBucket::EmployeeSignatures, input.signature.as_ref())
            .await?
        {
            profile.signature = Some(key);
        }
        if let Some(key) = staged
            .put(BlobBucket::EmployeeQrCodes, input.qr_code.as_ref())
            .await?
        {
            profile.qr_code = Some(key);
        }

        let updated = match self.employees.update(id, &profile).await {
            Ok(Some(employee)) => employee,
            Ok(None) => {
                staged.rollback().await;
                return Err(AdminServiceError::EmployeeNotFound);
            }
            Err(e) => {
                staged.rollback().await;
                return Err(e);
            }
        };

        let still_referenced = updated.profile.blobs();
        discard_blobs(
            &self.blobs,
            current
                .profile
                .blobs()
                .into_iter()
                .filter(|blob| !still_referenced.contains(blob)),
        )
        .await;

        let changes = profile_changes(&current.profile, &updated.profile);
        tracing::info!(id = %updated.id, changed = changes.fields().count(), "employee updated");
        self.audit
            .record(
                ctx,
                AuditEvent::new(AuditAction::EmployeeUpdated)
                    .description(format!(
                        "Updated employee {} ({})",
                        updated.profile.full_name(),
                        updated.id_number
                    ))
                    .target(AuditTarget::Employee(updated.id))
                    .properties(changes.into_properties()),
            )
            .await;

        Ok(updated)
    }
}

// ── DeleteEmployee ───────────────────────────────────────────────────────────

pub struct DeleteEmployeeUseCase<E: EmployeeRepository, S: BlobStore, A: ActivityLogRepository> {
    pub employees: E,
    pub blobs: S,
    pub audit: AuditTrail<A>,
}

impl<E, S, A> DeleteEmployeeUseCase<E, S, A>
where
    E: EmployeeRepository,
    S: BlobStore,
    A: ActivityLogRepository,
{
    pub async fn execute(&self, ctx: &RequestContext, id: Uuid) -> Result<(), AdminServiceError> {
        let deleted = self.employees.delete_many(&[id]).await?;
        let Some(employee) = deleted.into_iter().next() else {
            return Err(AdminServiceError::EmployeeNotFound);
        };
        discard_blobs(&self.blobs, employee.profile.blobs()).await;

        tracing::info!(id = %employee.id, "employee deleted");
        self.audit
            .record(
                ctx,
                AuditEvent::new(AuditAction::EmployeeDeleted)
                    .description(format!(
                        "Deleted employee {} ({})",
                        employee.profile.full_name(),
                        employee.id_number
                    ))
                    .target(AuditTarget::Employee(employee.id))
                    .properties(json!({
                        "id_number": employee.id_number,
                        "name": employee.profile.full_name(),
                        "business_unit_id": employee.profile.business_unit_id,
                    })),
            )
            .await;
        Ok(())
    }
}

// ── BulkDeleteEmployees ──────────────────────────────────────────────────────

pub struct BulkDeleteEmployeesUseCase<
    E: EmployeeRepository,
    S: BlobStore,
    A: ActivityLogRepository,
> {
    pub employees: E,
    pub blobs: S,
    pub audit: AuditTrail<A>,
}

impl<E, S, A> BulkDeleteEmployeesUseCase<E, S, A>
where
    E: EmployeeRepository,
    S: BlobStore,
    A: ActivityLogRepository,
{
    /// Delete every listed employee once. Returns the number removed.
    pub async fn execute(
        &self,
        ctx: &RequestContext,
        ids: Vec<Uuid>,
    ) -> Result<u64, AdminServiceError> {
        let mut seen = HashSet::new();
        let ids: Vec<Uuid> = ids.into_iter().filter(|id| seen.insert(*id)).collect();
        if ids.is_empty() {
            return Err(AdminServiceError::invalid("ids", "select at least one employee"));
        }

        let deleted = self.employees.delete_many(&ids).await?;
        let orphaned: Vec<_> = deleted
            .iter()
            .flat_map(|employee| employee.profile.blobs())
            .collect();
        discard_blobs(&self.blobs, orphaned).await;

        let count = deleted.len() as u64;
        tracing::info!(count, "employees bulk deleted");
        self.audit
            .record(
                ctx,
                AuditEvent::new(AuditAction::EmployeesBulkDeleted)
                    .description(format!("Bulk deleted {count} employee(s)"))
                    .properties(json!({
                        "count": count,
                        "id_numbers": deleted.iter().map(|e| e.id_number.as_str()).collect::<Vec<_>>(),
                    })),
            )
            .await;
        Ok(count)
    }
}

// ── RecordIdIssuance ─────────────────────────────────────────────────────────

pub struct RecordIdIssuanceUseCase<E: EmployeeRepository, A: ActivityLogRepository> {
    pub employees: E,
    pub audit: AuditTrail<A>,
}

impl<E: EmployeeRepository, A: ActivityLogRepository> RecordIdIssuanceUseCase<E, A> {
    pub async fn execute(
        &self,
        ctx: &RequestContext,
        id: Uuid,
    ) -> Result<Employee, AdminServiceError> {
        let employee = self
            .employees
            .record_issuance(id, Utc::now())
            .await?
            .ok_or(AdminServiceError::EmployeeNotFound)?;

        tracing::info!(id = %employee.id, issuance_count = employee.issuance_count, "employee ID issued");
        self.audit
            .record(
                ctx,
                AuditEvent::new(AuditAction::EmployeeIdIssued)
                    .description(format!(
                        "Issued ID card for {} ({})",
                        employee.profile.full_name(),
                        employee.id_number
                    ))
                    .target(AuditTarget::Employee(employee.id))
                    .properties(json!({
                        "issuance_count": employee.issuance_count,
                        "exported_at": employee.exported_at,
                        "expires_at": employee.id_expires_at(),
                    })),
            )
            .await;
        Ok(employee)
    }
}
