use std::collections::HashSet;

use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use hrdesk_auth_types::context::RequestContext;
use hrdesk_core::validation::FieldErrors;
use hrdesk_domain::audit::{AuditAction, AuditTarget};
use hrdesk_domain::pagination::{Page, PageRequest};

use crate::domain::repository::{ActivityLogRepository, BlobStore, BusinessUnitRepository};
use crate::domain::types::{BlobBucket, BusinessUnit, Upload};
use crate::error::AdminServiceError;
use crate::usecase::audit::{AuditEvent, AuditTrail, ChangeSet};
use crate::usecase::storage::{StagedBlobs, check_upload, discard_blobs};

const MAX_NAME_LEN: usize = 255;
const MAX_CODE_LEN: usize = 50;

#[derive(Debug, Clone, Default)]
pub struct BusinessUnitInput {
    pub name: Option<String>,
    /// Blank clears the code.
    pub code: Option<String>,
    pub image: Option<Upload>,
    /// Drop the current logo without uploading a new one.
    pub remove_image: bool,
}

fn validated_name(errors: &mut FieldErrors, name: Option<&str>) -> String {
    let name = name.map(str::trim).unwrap_or_default();
    if name.is_empty() {
        errors.add("name", "is required");
    } else if name.chars().count() > MAX_NAME_LEN {
        errors.add("name", format!("may not be greater than {MAX_NAME_LEN} characters"));
    }
    name.to_owned()
}

async fn validated_code<B: BusinessUnitRepository>(
    repo: &B,
    errors: &mut FieldErrors,
    code: Option<&str>,
    except: Option<&str>,
) -> Result<Option<String>, AdminServiceError> {
    let Some(code) = code.map(str::trim).filter(|c| !c.is_empty()) else {
        return Ok(None);
    };
    if code.chars().count() > MAX_CODE_LEN {
        errors.add("code", format!("may not be greater than {MAX_CODE_LEN} characters"));
    } else if repo.code_taken(code, except).await? {
        errors.add("code", "the code has already been taken");
    }
    Ok(Some(code.to_owned()))
}

fn snapshot(unit: &BusinessUnit) -> serde_json::Value {
    json!({
        "id": unit.id,
        "name": unit.name,
        "code": unit.code,
        "image": unit.image,
    })
}

// ── ListBusinessUnits ────────────────────────────────────────────────────────

pub struct ListBusinessUnitsUseCase<B: BusinessUnitRepository> {
    pub repo: B,
}

impl<B: BusinessUnitRepository> ListBusinessUnitsUseCase<B> {
    pub async fn execute(
        &self,
        search: Option<&str>,
        page: PageRequest,
    ) -> Result<Page<BusinessUnit>, AdminServiceError> {
        self.repo.list(search, page.clamped()).await
    }
}

// ── CreateBusinessUnit ───────────────────────────────────────────────────────

pub struct CreateBusinessUnitUseCase<
    B: BusinessUnitRepository,
    S: BlobStore,
    A: ActivityLogRepository,
> {
    pub repo: B,
    pub blobs: S,
    pub audit: AuditTrail<A>,
}

impl<B, S, A> CreateBusinessUnitUseCase<B, S, A>
where
    B: BusinessUnitRepository,
    S: BlobStore,
    A: ActivityLogRepository,
{
    pub async fn execute(
        &self,
        ctx: &RequestContext,
        input: BusinessUnitInput,
    ) -> Result<BusinessUnit, AdminServiceError> {
        let mut errors = FieldErrors::new();
        let name = validated_name(&mut errors, input.name.as_deref());
        let code = validated_code(&self.repo, &mut errors, input.code.as_deref(), None).await?;
        check_upload(&mut errors, "image", input.image.as_ref());
        errors.into_result()?;

        let mut staged = StagedBlobs::new(&self.blobs);
        let image = staged
            .put(BlobBucket::BusinessUnitLogos, input.image.as_ref())
            .await?;

        let now = Utc::now();
        let unit = BusinessUnit {
            id: Uuid::new_v4().to_string(),
            name,
            code,
            image,
            created_at: now,
            updated_at: now,
        };
        if let Err(e) = self.repo.create(&unit).await {
            staged.rollback().await;
            return Err(e);
        }

        tracing::info!(id = %unit.id, "business unit created");
        self.audit
            .record(
                ctx,
                AuditEvent::new(AuditAction::BusinessUnitCreated)
                    .description(format!("Created business unit {}", unit.name))
                    .target(AuditTarget::BusinessUnit(unit.id.clone()))
                    .properties(json!({
                        "name": unit.name,
                        "code": unit.code,
                        "has_image": unit.image.is_some(),
                        "created_by": ctx.actor_id(),
                    })),
            )
            .await;
        Ok(unit)
    }
}

// ── UpdateBusinessUnit ───────────────────────────────────────────────────────

pub struct UpdateBusinessUnitUseCase<
    B: BusinessUnitRepository,
    S: BlobStore,
    A: ActivityLogRepository,
> {
    pub repo: B,
    pub blobs: S,
    pub audit: AuditTrail<A>,
}

impl<B, S, A> UpdateBusinessUnitUseCase<B, S, A>
where
    B: BusinessUnitRepository,
    S: BlobStore,
    A: ActivityLogRepository,
{
    pub async fn execute(
        &self,
        ctx: &RequestContext,
        id: &str,
        input: BusinessUnitInput,
    ) -> Result<BusinessUnit, AdminServiceError> {
        let current = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(AdminServiceError::BusinessUnitNotFound)?;

        let mut errors = FieldErrors::new();
        let name = match input.name.as_deref() {
            Some(name) => validated_name(&mut errors, Some(name)),
            None => current.name.clone(),
        };
        let code = match input.code.as_deref() {
            Some(code) => validated_code(&self.repo, &mut errors, Some(code), Some(id)).await?,
            None => current.code.clone(),
        };
        check_upload(&mut errors, "image", input.image.as_ref());
        errors.into_result()?;

        let mut staged = StagedBlobs::new(&self.blobs);
        let image = match staged
            .put(BlobBucket::BusinessUnitLogos, input.image.as_ref())
            .await?
        {
            Some(key) => Some(key),
            None if input.remove_image => None,
            None => current.image.clone(),
        };

        let updated = BusinessUnit {
            name,
            code,
            image,
            updated_at: Utc::now(),
            ..current.clone()
        };

        let mut changes = ChangeSet::new();
        changes.track("name", &current.name, &updated.name);
        changes.track("code", &current.code, &updated.code);
        changes.track("image", &current.image, &updated.image);
        if changes.is_empty() {
            return Ok(current);
        }

        if let Err(e) = self.repo.update(&updated).await {
            staged.rollback().await;
            return Err(e);
        }
        if current.image != updated.image {
            discard_blobs(&self.blobs, current.blobs()).await;
        }

        tracing::info!(id = %updated.id, "business unit updated");
        self.audit
            .record(
                ctx,
                AuditEvent::new(AuditAction::BusinessUnitUpdated)
                    .description(format!("Updated business unit {}", updated.name))
                    .target(AuditTarget::BusinessUnit(updated.id.clone()))
                    .properties(changes.into_properties()),
            )
            .await;
        Ok(updated)
    }
}

// ── DeleteBusinessUnit ───────────────────────────────────────────────────────

pub struct DeleteBusinessUnitUseCase<
    B: BusinessUnitRepository,
    S: BlobStore,
    A: ActivityLogRepository,
> {
    pub repo: B,
    pub blobs: S,
    pub audit: AuditTrail<A>,
}

impl<B, S, A> DeleteBusinessUnitUseCase<B, S, A>
where
    B: BusinessUnitRepository,
    S: BlobStore,
    A: ActivityLogRepository,
{
    pub async fn execute(&self, ctx: &RequestContext, id: &str) -> Result<(), AdminServiceError> {
        let unit = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(AdminServiceError::BusinessUnitNotFound)?;

        let outcome = self.repo.delete_many(std::slice::from_ref(&unit.id)).await?;
        discard_blobs(
            &self.blobs,
            unit.blobs().into_iter().chain(outcome.dependent_blobs),
        )
        .await;

        tracing::info!(id = %unit.id, "business unit deleted");
        let mut properties = snapshot(&unit);
        properties["deleted_by_role"] = json!(ctx.actor.map(|actor| actor.role));
        self.audit
            .record(
                ctx,
                AuditEvent::new(AuditAction::BusinessUnitDeleted)
                    .description(format!("Deleted business unit {}", unit.name))
                    .target(AuditTarget::BusinessUnit(unit.id.clone()))
                    .properties(properties),
            )
            .await;
        Ok(())
    }
}

// ── BulkDeleteBusinessUnits ──────────────────────────────────────────────────

pub struct BulkDeleteBusinessUnitsUseCase<
    B: BusinessUnitRepository,
    S: BlobStore,
    A: ActivityLogRepository,
> {
    pub repo: B,
    pub blobs: S,
    pub audit: AuditTrail<A>,
}

impl<B, S, A> BulkDeleteBusinessUnitsUseCase<B, S, A>
where
    B: BusinessUnitRepository,
    S: BlobStore,
    A: ActivityLogRepository,
{
    /// Delete every listed unit. Every id must exist. Returns the number removed.
    pub async fn execute(
        &self,
        ctx: &RequestContext,
        ids: Vec<String>,
    ) -> Result<u64, AdminServiceError> {
        let mut seen = HashSet::new();
        let ids: Vec<String> = ids
            .into_iter()
            .map(|id| id.trim().to_owned())
            .filter(|id| !id.is_empty() && seen.insert(id.clone()))
            .collect();
        if ids.is_empty() {
            return Err(AdminServiceError::invalid(
                "ids",
                "select at least one business unit",
            ));
        }

        let units = self.repo.find_by_ids(&ids).await?;
        let missing: Vec<&str> = ids
            .iter()
            .filter(|id| !units.iter().any(|unit| &unit.id == *id))
            .map(String::as_str)
            .collect();
        if !missing.is_empty() {
            return Err(AdminServiceError::invalid(
                "ids",
                format!("unknown business unit(s): {}", missing.join(", ")),
            ));
        }

        let outcome = self.repo.delete_many(&ids).await?;
        discard_blobs(
            &self.blobs,
            units
                .iter()
                .flat_map(BusinessUnit::blobs)
                .chain(outcome.dependent_blobs),
        )
        .await;

        tracing::info!(count = outcome.deleted, "business units bulk deleted");
        self.audit
            .record(
                ctx,
                AuditEvent::new(AuditAction::BusinessUnitsBulkDeleted)
                    .description(format!("Bulk deleted {} business unit(s)", outcome.deleted))
                    .properties(json!({
                        "count": outcome.deleted,
                        "units": units.iter().map(snapshot).collect::<Vec<_>>(),
                        "deleted_by_role": ctx.actor.map(|actor| actor.role),
                    })),
            )
            .await;
        Ok(outcome.deleted)
    }
}
