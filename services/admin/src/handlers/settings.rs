use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use hrdesk_auth_types::context::RequestContext;

use crate::domain::types::NetworkPathSetting;
use crate::error::AdminServiceError;
use crate::state::AppState;
use crate::usecase::network_path::{GetNetworkPathUseCase, UpdateNetworkPathUseCase};

#[derive(Serialize)]
pub struct NetworkPathResponse {
    pub value: String,
    /// `false` when the configured default is in effect.
    pub overridden: bool,
}

impl From<NetworkPathSetting> for NetworkPathResponse {
    fn from(setting: NetworkPathSetting) -> Self {
        Self {
            value: setting.value,
            overridden: setting.overridden,
        }
    }
}

// ── GET /settings/network-path ───────────────────────────────────────────────

pub async fn get_network_path(
    State(state): State<AppState>,
) -> Result<Json<NetworkPathResponse>, AdminServiceError> {
    let usecase = GetNetworkPathUseCase {
        repo: state.network_path_repo(),
        fallback: &state.config.network_image_root,
    };
    Ok(Json(usecase.execute().await?.into()))
}

// ── PUT /settings/network-path ───────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateNetworkPathRequest {
    pub value: Option<String>,
}

pub async fn update_network_path(
    ctx: RequestContext,
    State(state): State<AppState>,
    Json(body): Json<UpdateNetworkPathRequest>,
) -> Result<Json<NetworkPathResponse>, AdminServiceError> {
    let usecase = UpdateNetworkPathUseCase {
        repo: state.network_path_repo(),
        fallback: &state.config.network_image_root,
        audit: state.audit(),
    };
    Ok(Json(usecase.execute(&ctx, body.value.as_deref()).await?.into()))
}
