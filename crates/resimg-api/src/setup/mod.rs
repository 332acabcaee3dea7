//! Application setup: store, authorizer, routes and server

pub mod routes;
pub mod server;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use resimg_core::Config;
use resimg_processing::ImageStore;

use crate::auth::{AllowAll, Authorizer, BackendAuthorizer};
use crate::state::AppState;

/// Open the store, pick the authorizer and build the router.
pub async fn initialize_app(config: &Config) -> Result<(Arc<AppState>, Router), anyhow::Error> {
    let store = ImageStore::open_local(config.store.clone())
        .await
        .map_err(|e| anyhow::anyhow!("Failed to open image store: {}", e))?;

    let authorizer = setup_authorizer(config)?;

    let state = Arc::new(AppState::new(
        Arc::new(store),
        authorizer,
        config.public_base_url.clone(),
    ));

    let router = routes::setup_routes(config, state.clone())?;
    Ok((state, router))
}

fn setup_authorizer(config: &Config) -> Result<Arc<dyn Authorizer>, anyhow::Error> {
    if !config.auth_enabled {
        tracing::warn!("Authorization disabled - every request is accepted");
        return Ok(Arc::new(AllowAll));
    }

    let authorizer = BackendAuthorizer::new(
        &config.auth_backend_url,
        Duration::from_secs(config.auth_timeout_secs),
    )?;
    tracing::info!(check_url = %authorizer.check_url(), "Authorization via identity backend");
    Ok(Arc::new(authorizer))
}
