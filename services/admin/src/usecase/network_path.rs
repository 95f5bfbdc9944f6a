use std::path::Path;

use serde_json::json;

use hrdesk_admin_schema::network_paths::NETWORK_IMAGE_ROOT;
use hrdesk_auth_types::context::RequestContext;
use hrdesk_domain::audit::AuditAction;

use crate::domain::repository::{ActivityLogRepository, NetworkPathRepository};
use crate::domain::types::NetworkPathSetting;
use crate::error::AdminServiceError;
use crate::usecase::audit::{AuditEvent, AuditTrail};

const MAX_PATH_LEN: usize = 1024;

/// Stored network image root, else `fallback`.
pub async fn effective_network_root<R: NetworkPathRepository>(
    repo: &R,
    fallback: &Path,
) -> Result<NetworkPathSetting, AdminServiceError> {
    Ok(match repo.get(NETWORK_IMAGE_ROOT).await? {
        Some(value) => NetworkPathSetting {
            value,
            overridden: true,
        },
        None => NetworkPathSetting {
            value: fallback.to_string_lossy().into_owned(),
            overridden: false,
        },
    })
}

// ── GetNetworkPath ───────────────────────────────────────────────────────────

pub struct GetNetworkPathUseCase<'a, R: NetworkPathRepository> {
    pub repo: R,
    pub fallback: &'a Path,
}

impl<R: NetworkPathRepository> GetNetworkPathUseCase<'_, R> {
    pub async fn execute(&self) -> Result<NetworkPathSetting, AdminServiceError> {
        effective_network_root(&self.repo, self.fallback).await
    }
}

// ── UpdateNetworkPath ────────────────────────────────────────────────────────

pub struct UpdateNetworkPathUseCase<'a, R: NetworkPathRepository, A: ActivityLogRepository> {
    pub repo: R,
    pub fallback: &'a Path,
    pub audit: AuditTrail<A>,
}

impl<R, A> UpdateNetworkPathUseCase<'_, R, A>
where
    R: NetworkPathRepository,
    A: ActivityLogRepository,
{
    pub async fn execute(
        &self,
        ctx: &RequestContext,
        value: Option<&str>,
    ) -> Result<NetworkPathSetting, AdminServiceError> {
        let value = value.map(str::trim).unwrap_or_default();
        if value.is_empty() {
            return Err(AdminServiceError::invalid("value", "is required"));
        }
        if value.chars().count() > MAX_PATH_LEN {
            return Err(AdminServiceError::invalid(
                "value",
                format!("may not be greater than {MAX_PATH_LEN} characters"),
            ));
        }

        let old = effective_network_root(&self.repo, self.fallback).await?;
        if old.overridden && old.value == value {
            return Ok(old);
        }
        self.repo.set(NETWORK_IMAGE_ROOT, value).await?;

        tracing::info!(value, "network image root updated");
        self.audit
            .record(
                ctx,
                AuditEvent::new(AuditAction::NetworkPathUpdated)
                    .description("Updated network image path")
                    .properties(json!({ "old": old.value, "new": value })),
            )
            .await;
        Ok(NetworkPathSetting {
            value: value.to_owned(),
            overridden: true,
        })
    }
}
