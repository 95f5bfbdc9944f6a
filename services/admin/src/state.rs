use std::path::PathBuf;
use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::AdminConfig;
use crate::error::AdminServiceError;
use crate::infra::db::{
    DbActivityLogRepository, DbBusinessUnitRepository, DbEmployeeRepository,
    DbNetworkPathRepository, DbTemplateRepository, DbUserRepository,
};
use crate::infra::password::Argon2PasswordHasher;
use crate::infra::storage::LocalBlobStore;
use crate::usecase::audit::AuditTrail;
use crate::usecase::network_path::effective_network_root;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Arc<AdminConfig>,
}

impl AppState {
    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn business_unit_repo(&self) -> DbBusinessUnitRepository {
        DbBusinessUnitRepository {
            db: self.db.clone(),
        }
    }

    pub fn employee_repo(&self) -> DbEmployeeRepository {
        DbEmployeeRepository {
            db: self.db.clone(),
        }
    }

    pub fn template_repo(&self) -> DbTemplateRepository {
        DbTemplateRepository {
            db: self.db.clone(),
        }
    }

    pub fn activity_log_repo(&self) -> DbActivityLogRepository {
        DbActivityLogRepository {
            db: self.db.clone(),
        }
    }

    pub fn network_path_repo(&self) -> DbNetworkPathRepository {
        DbNetworkPathRepository {
            db: self.db.clone(),
        }
    }

    pub fn audit(&self) -> AuditTrail<DbActivityLogRepository> {
        AuditTrail {
            repo: self.activity_log_repo(),
        }
    }

    pub fn password_hasher(&self) -> Argon2PasswordHasher {
        Argon2PasswordHasher
    }

    /// Blob store rooted at the network image path currently in effect.
    pub async fn blob_store(&self) -> Result<LocalBlobStore, AdminServiceError> {
        let network_root =
            effective_network_root(&self.network_path_repo(), &self.config.network_image_root)
                .await?;
        Ok(LocalBlobStore {
            public_root: self.config.public_storage_root.clone(),
            network_root: PathBuf::from(network_root.value),
        })
    }
}
