use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context as _;
use sea_orm::Database;
use tracing::info;

use hrdesk_admin::config::AdminConfig;
use hrdesk_admin::router::build_router;
use hrdesk_admin::state::AppState;
use hrdesk_core::tracing::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing("info,hrdesk_admin=debug");

    let config = AdminConfig::from_env()?;

    let db = Database::connect(&config.database_url)
        .await
        .context("failed to connect to database")?;

    let addr = format!("0.0.0.0:{}", config.admin_port);
    let state = AppState {
        db,
        config: Arc::new(config),
    };

    let router = build_router(state);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!("admin service listening on {addr}");
    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .context("server error")
}
