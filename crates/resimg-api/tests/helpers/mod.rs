//! Test helpers: build AppState and router for integration tests.
//!
//! Run from workspace root: `cargo test -p resimg-api`.

#![allow(dead_code)]

pub mod fixtures;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum_test::TestServer;
use resimg_api::auth::{AllowAll, Authorizer};
use resimg_api::setup::routes;
use resimg_api::AppState;
use resimg_core::Config;
use resimg_processing::ImageStore;
use tempfile::TempDir;

pub const PUBLIC_BASE_URL: &str = "http://cdn.test/images";

/// Test application: server plus the temp directory backing the store.
pub struct TestApp {
    pub server: TestServer,
    pub root: PathBuf,
    pub _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

pub fn test_config(root: &Path) -> Config {
    let root = root.to_string_lossy().into_owned();
    Config::from_lookup(|key| match key {
        "IMAGES_DIR" => Some(root.clone()),
        "PUBLIC_BASE_URL" => Some(PUBLIC_BASE_URL.to_string()),
        "MAX_CONCURRENT_PROCESSING" => Some("2".to_string()),
        _ => None,
    })
    .expect("Failed to build test config")
}

/// App with authorization disabled.
pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(Arc::new(AllowAll)).await
}

pub async fn setup_test_app_with(authorizer: Arc<dyn Authorizer>) -> TestApp {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let root = temp_dir.path().join("images");
    let config = test_config(&root);

    let store = ImageStore::open_local(config.store.clone())
        .await
        .expect("Failed to open image store");
    let state = Arc::new(AppState::new(
        Arc::new(store),
        authorizer,
        config.public_base_url.clone(),
    ));
    let app = routes::setup_routes(&config, state).expect("Failed to build routes");
    let server = TestServer::new(app).expect("Failed to create test server");

    TestApp {
        server,
        root,
        _temp_dir: temp_dir,
    }
}
