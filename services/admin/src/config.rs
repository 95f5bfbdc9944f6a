use std::path::PathBuf;

use anyhow::Context as _;

/// Admin service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// PostgreSQL connection URL. Env var: `DATABASE_URL`.
    pub database_url: String,
    /// TCP port for the HTTP server (default 3120). Env var: `ADMIN_PORT`.
    pub admin_port: u16,
    /// Disk served to browsers as-is (business unit logos). Env var: `PUBLIC_STORAGE_ROOT`.
    pub public_storage_root: PathBuf,
    /// Base network image path, used when no `network_image_root` row is stored.
    /// Env var: `NETWORK_IMAGE_ROOT`.
    pub network_image_root: PathBuf,
}

impl AdminConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            database_url: std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            admin_port: std::env::var("ADMIN_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3120),
            public_storage_root: std::env::var("PUBLIC_STORAGE_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("storage/public")),
            network_image_root: std::env::var("NETWORK_IMAGE_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("storage/network")),
        })
    }
}
