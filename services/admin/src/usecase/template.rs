use chrono::Utc;
use serde_json::{Map, Value, json};

use hrdesk_auth_types::context::RequestContext;
use hrdesk_core::validation::FieldErrors;
use hrdesk_domain::audit::{AuditAction, AuditTarget};
use hrdesk_domain::layout::{LayoutField, check_coordinate};
use hrdesk_domain::pagination::{Page, PageRequest};

use crate::domain::repository::{
    ActivityLogRepository, BlobStore, BusinessUnitRepository, TemplateRepository,
};
use crate::domain::types::{
    BlobBucket, BusinessUnit, NewTemplate, TemplateImage, TemplateLayout, TemplateRecord, Upload,
};
use crate::error::AdminServiceError;
use crate::usecase::audit::{AuditEvent, AuditTrail, ChangeSet};
use crate::usecase::storage::{StagedBlobs, check_upload, discard_blobs};

#[derive(Debug, Clone, Default)]
pub struct TemplateInput {
    pub business_unit_id: Option<String>,
    pub front_image: Option<Upload>,
    pub back_image: Option<Upload>,
}

/// How a positions payload is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionUpdate {
    /// Any subset of the layout fields.
    Partial,
    /// Every layout field must be present.
    Full,
}

/// Validate a positions payload into the layout values it sets.
pub fn parse_positions(
    payload: &Map<String, Value>,
    mode: PositionUpdate,
) -> Result<TemplateLayout, FieldErrors> {
    let mut errors = FieldErrors::new();
    if payload.is_empty() {
        errors.add("positions", "at least one layout field is required");
    }

    let mut layout = TemplateLayout::default();
    for (key, value) in payload {
        let Some(field) = LayoutField::parse(key) else {
            errors.add(key.as_str(), "is not a layout field");
            continue;
        };
        match value.as_f64().map(check_coordinate) {
            Some(Ok(v)) => layout.set(field, v),
            Some(Err(message)) => errors.add(key.as_str(), message),
            None => errors.add(key.as_str(), "must be a number"),
        }
    }

    if mode == PositionUpdate::Full {
        for field in LayoutField::ALL {
            if !payload.contains_key(field.as_str()) {
                errors.add(field.as_str(), "is required");
            }
        }
    }
    errors.into_result().map(|()| layout)
}

async fn ensure_business_unit<B: BusinessUnitRepository>(
    business_units: &B,
    id: Option<&str>,
    errors: &mut FieldErrors,
) -> Result<Option<String>, AdminServiceError> {
    let Some(id) = id.map(str::trim).filter(|id| !id.is_empty()) else {
        errors.add("business_unit_id", "is required");
        return Ok(None);
    };
    if business_units.find_by_id(id).await?.is_none() {
        errors.add("business_unit_id", "the selected business unit is invalid");
    }
    Ok(Some(id.to_owned()))
}

fn snapshot(template: &TemplateImage) -> Value {
    json!({
        "id": template.id,
        "business_unit_id": template.business_unit_id,
        "front_image": template.front_image,
        "back_image": template.back_image,
        "layout": template.layout.to_full_json(),
    })
}

// ── ListTemplates ────────────────────────────────────────────────────────────

pub struct TemplateIndex {
    pub templates: Page<TemplateRecord>,
    pub business_units: Vec<BusinessUnit>,
}

pub struct ListTemplatesUseCase<T: TemplateRepository, B: BusinessUnitRepository> {
    pub templates: T,
    pub business_units: B,
}

impl<T: TemplateRepository, B: BusinessUnitRepository> ListTemplatesUseCase<T, B> {
    pub async fn execute(
        &self,
        business_unit_id: Option<&str>,
        page: PageRequest,
    ) -> Result<TemplateIndex, AdminServiceError> {
        let business_unit_id = business_unit_id.map(str::trim).filter(|id| !id.is_empty());
        let templates = self.templates.list(business_unit_id, page.clamped()).await?;
        let business_units = self.business_units.all().await?;
        Ok(TemplateIndex {
            templates,
            business_units,
        })
    }
}

// ── GetTemplate ──────────────────────────────────────────────────────────────

pub struct GetTemplateUseCase<T: TemplateRepository> {
    pub templates: T,
}

impl<T: TemplateRepository> GetTemplateUseCase<T> {
    pub async fn execute(&self, id: i32) -> Result<TemplateRecord, AdminServiceError> {
        self.templates
            .find_by_id(id)
            .await?
            .ok_or(AdminServiceError::TemplateNotFound)
    }
}

// ── CreateTemplate ───────────────────────────────────────────────────────────

pub struct CreateTemplateUseCase<
    T: TemplateRepository,
    B: BusinessUnitRepository,
    S: BlobStore,
    A: ActivityLogRepository,
> {
    pub templates: T,
    pub business_units: B,
    pub blobs: S,
    pub audit: AuditTrail<A>,
}

impl<T, B, S, A> CreateTemplateUseCase<T, B, S, A>
where
    T: TemplateRepository,
    B: BusinessUnitRepository,
    S: BlobStore,
    A: ActivityLogRepository,
{
    pub async fn execute(
        &self,
        ctx: &RequestContext,
        input: TemplateInput,
    ) -> Result<TemplateImage, AdminServiceError> {
        let mut errors = FieldErrors::new();
        let business_unit_id = ensure_business_unit(
            &self.business_units,
            input.business_unit_id.as_deref(),
            &mut errors,
        )
        .await?;
        for (field, upload) in [
            ("front_image", &input.front_image),
            ("back_image", &input.back_image),
        ] {
            if upload.is_none() {
                errors.add(field, "is required");
            }
            check_upload(&mut errors, field, upload.as_ref());
        }
        errors.into_result()?;

        let mut staged = StagedBlobs::new(&self.blobs);
        let front_image = staged
            .put(BlobBucket::TemplateArtwork, input.front_image.as_ref())
            .await?;
        let back_image = staged
            .put(BlobBucket::TemplateArtwork, input.back_image.as_ref())
            .await?;
        let (Some(business_unit_id), Some(front_image), Some(back_image)) =
            (business_unit_id, front_image, back_image)
        else {
            staged.rollback().await;
            return Err(AdminServiceError::MalformedRequest);
        };

        let template = match self
            .templates
            .create(&NewTemplate {
                business_unit_id,
                front_image,
                back_image,
            })
            .await
        {
            Ok(template) => template,
            Err(e) => {
                staged.rollback().await;
                return Err(e);
            }
        };

        tracing::info!(id = template.id, "template created");
        self.audit
            .record(
                ctx,
                AuditEvent::new(AuditAction::TemplateCreated)
                    .description(format!(
                        "Created template #{} for business unit {}",
                        template.id, template.business_unit_id
                    ))
                    .target(AuditTarget::TemplateImage(template.id))
                    .properties(json!({
                        "business_unit_id": template.business_unit_id,
                        "front_image": template.front_image,
                        "back_image": template.back_image,
                    })),
            )
            .await;
        Ok(template)
    }
}

// ── UpdateTemplateImages ─────────────────────────────────────────────────────

pub struct UpdateTemplateUseCase<
    T: TemplateRepository,
    B: BusinessUnitRepository,
    S: BlobStore,
    A: ActivityLogRepository,
> {
    pub templates: T,
    pub business_units: B,
    pub blobs: S,
    pub audit: AuditTrail<A>,
}

impl<T, B, S, A> UpdateTemplateUseCase<T, B, S, A>
where
    T: TemplateRepository,
    B: BusinessUnitRepository,
    S: BlobStore,
    A: ActivityLogRepository,
{
    pub async fn execute(
        &self,
        ctx: &RequestContext,
        id: i32,
        input: TemplateInput,
    ) -> Result<TemplateImage, AdminServiceError> {
        let current = self
            .templates
            .find_by_id(id)
            .await?
            .ok_or(AdminServiceError::TemplateNotFound)?
            .template;

        let mut errors = FieldErrors::new();
        let business_unit_id = match input.business_unit_id.as_deref() {
            Some(requested) if requested.trim() != current.business_unit_id => {
                ensure_business_unit(&self.business_units, Some(requested), &mut errors).await?
            }
            _ => Some(current.business_unit_id.clone()),
        };
        check_upload(&mut errors, "front_image", input.front_image.as_ref());
        check_upload(&mut errors, "back_image", input.back_image.as_ref());
        errors.into_result()?;

        let mut staged = StagedBlobs::new(&self.blobs);
        let front_image = staged
            .put(BlobBucket::TemplateArtwork, input.front_image.as_ref())
            .await?;
        let back_image = staged
            .put(BlobBucket::TemplateArtwork, input.back_image.as_ref())
            .await?;

        let updated = TemplateImage {
            business_unit_id: business_unit_id.unwrap_or_else(|| current.business_unit_id.clone()),
            front_image: front_image.unwrap_or_else(|| current.front_image.clone()),
            back_image: back_image.unwrap_or_else(|| current.back_image.clone()),
            updated_at: Utc::now(),
            ..current.clone()
        };

        let mut changes = ChangeSet::new();
        changes.track("business_unit_id", &current.business_unit_id, &updated.business_unit_id);
        changes.track("front_image", &current.front_image, &updated.front_image);
        changes.track("back_image", &current.back_image, &updated.back_image);
        if changes.is_empty() {
            return Ok(current);
        }

        if let Err(e) = self.templates.update_images(&updated).await {
            staged.rollback().await;
            return Err(e);
        }
        let still_referenced = updated.blobs();
        discard_blobs(
            &self.blobs,
            current
                .blobs()
                .into_iter()
                .filter(|blob| !still_referenced.contains(blob)),
        )
        .await;

        tracing::info!(id = updated.id, "template updated");
        let changed: Vec<&str> = changes.fields().collect();
        let mut properties = json!({ "changed": changed });
        properties["changes"] = changes.into_properties()["changes"].take();
        self.audit
            .record(
                ctx,
                AuditEvent::new(AuditAction::TemplateUpdated)
                    .description(format!("Updated template #{}", updated.id))
                    .target(AuditTarget::TemplateImage(updated.id))
                    .properties(properties),
            )
            .await;
        Ok(updated)
    }
}

// ── UpdateTemplatePositions ──────────────────────────────────────────────────

pub struct UpdateTemplatePositionsUseCase<T: TemplateRepository, A: ActivityLogRepository> {
    pub templates: T,
    pub audit: AuditTrail<A>,
}

impl<T: TemplateRepository, A: ActivityLogRepository> UpdateTemplatePositionsUseCase<T, A> {
    pub async fn execute(
        &self,
        ctx: &RequestContext,
        id: i32,
        payload: &Map<String, Value>,
        mode: PositionUpdate,
    ) -> Result<TemplateImage, AdminServiceError> {
        let current = self
            .templates
            .find_by_id(id)
            .await?
            .ok_or(AdminServiceError::TemplateNotFound)?
            .template;
        let changes = parse_positions(payload, mode)?;

        let updated = self
            .templates
            .update_layout(id, &changes)
            .await?
            .ok_or(AdminServiceError::TemplateNotFound)?;

        let submitted: Vec<LayoutField> = changes.fields().collect();
        tracing::info!(id, fields = submitted.len(), "template positions updated");
        self.audit
            .record(
                ctx,
                AuditEvent::new(AuditAction::TemplatePositionsUpdated)
                    .description(format!("Updated layout positions of template #{id}"))
                    .target(AuditTarget::TemplateImage(id))
                    .properties(json!({
                        "old": current.layout.to_json(submitted.iter().copied()),
                        "new": updated.layout.to_json(submitted.iter().copied()),
                    })),
            )
            .await;
        Ok(updated)
    }
}

// ── DeleteTemplate ───────────────────────────────────────────────────────────

pub struct DeleteTemplateUseCase<T: TemplateRepository, S: BlobStore, A: ActivityLogRepository> {
    pub templates: T,
    pub blobs: S,
    pub audit: AuditTrail<A>,
}

impl<T, S, A> DeleteTemplateUseCase<T, S, A>
where
    T: TemplateRepository,
    S: BlobStore,
    A: ActivityLogRepository,
{
    pub async fn execute(&self, ctx: &RequestContext, id: i32) -> Result<(), AdminServiceError> {
        let template = self
            .templates
            .find_by_id(id)
            .await?
            .ok_or(AdminServiceError::TemplateNotFound)?
            .template;
        if !self.templates.delete(id).await? {
            return Err(AdminServiceError::TemplateNotFound);
        }
        discard_blobs(&self.blobs, template.blobs()).await;

        tracing::info!(id, "template deleted");
        self.audit
            .record(
                ctx,
                AuditEvent::new(AuditAction::TemplateDeleted)
                    .description(format!("Deleted template #{id}"))
                    .target(AuditTarget::TemplateImage(id))
                    .properties(snapshot(&template)),
            )
            .await;
        Ok(())
    }
}
