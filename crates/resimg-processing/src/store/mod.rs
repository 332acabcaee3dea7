//! Image store façade
//!
//! `ImageStore` is the single entry point for listing, uploading and deleting
//! assets. It validates every request before touching the filesystem, runs
//! the CPU heavy pipeline on the blocking pool under a concurrency limit, and
//! translates storage and pipeline failures into [`StoreError`].

mod delete;
mod upload;

use std::sync::Arc;

use resimg_core::models::{AssetRecord, ResourceRef};
use resimg_core::validation::validate_resource;
use resimg_core::{StoreConfig, StoreError, StoreResult};
use resimg_storage::{AssetCatalog, LocalStorage, PathResolver, Storage, StorageError};
use tokio::sync::Semaphore;

use crate::image::{ImageTransformer, ProcessingError};

pub struct ImageStore {
    config: StoreConfig,
    paths: PathResolver,
    storage: Arc<dyn Storage>,
    catalog: AssetCatalog,
    transformer: ImageTransformer,
    permits: Arc<Semaphore>,
}

impl ImageStore {
    /// Build a store over an arbitrary `Storage`. Paths are resolved under
    /// `config.store_root`, which must be the root the storage accepts.
    pub fn new(config: StoreConfig, storage: Arc<dyn Storage>) -> Self {
        let paths = PathResolver::new(config.store_root.clone());
        let catalog = AssetCatalog::new(
            paths.clone(),
            config.allowed_resources.clone(),
            config.image_extensions.clone(),
        );
        let transformer = ImageTransformer::new(config.jpeg_quality);
        let permits = Arc::new(Semaphore::new(config.max_concurrent_processing.max(1)));

        Self {
            config,
            paths,
            storage,
            catalog,
            transformer,
            permits,
        }
    }

    /// Build a store backed by the local filesystem, creating the root if needed.
    pub async fn open_local(config: StoreConfig) -> StoreResult<Self> {
        let storage = LocalStorage::new(config.store_root.clone())
            .await
            .map_err(|e| StoreError::storage(e.to_string()))?;

        tracing::info!(
            root = %config.store_root.display(),
            resources = ?config.allowed_resources,
            sizes = ?config.size_labels.iter().map(ToString::to_string).collect::<Vec<_>>(),
            "Image store opened"
        );

        Ok(Self::new(config, Arc::new(storage)))
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Every stored asset of every allow-listed resource, sorted by path.
    pub async fn list_assets(&self) -> StoreResult<Vec<AssetRecord>> {
        self.catalog.list_all().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to list assets");
            StoreError::storage(e.to_string())
        })
    }

    /// Assets of one resource instance. Unknown ids list as empty.
    pub async fn list_assets_for(&self, resource: &str, id: i64) -> StoreResult<Vec<AssetRecord>> {
        let target = self.resolve(resource, id)?;
        self.catalog.list_for_resource_id(&target).await.map_err(|e| {
            tracing::error!(asset = %target, error = %e, "Failed to list assets");
            StoreError::storage(e.to_string())
        })
    }

    fn resolve(&self, resource: &str, id: i64) -> StoreResult<ResourceRef> {
        validate_resource(resource, id, &self.config.allowed_resources)
    }

    /// Run pipeline work on the blocking pool once a processing permit is free.
    async fn run_blocking<T, F>(&self, task: F) -> Result<T, ProcessingError>
    where
        F: FnOnce() -> Result<T, ProcessingError> + Send + 'static,
        T: Send + 'static,
    {
        let _permit = self
            .permits
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| ProcessingError::Encode("Processing pool is closed".to_string()))?;

        tokio::task::spawn_blocking(task)
            .await
            .map_err(|e| ProcessingError::Encode(format!("Processing task failed: {}", e)))?
    }
}

/// Storage failures surface as `NotFound` when the target is missing and as
/// `StorageUnavailable` otherwise.
fn storage_failure(err: StorageError) -> StoreError {
    match err {
        StorageError::NotFound(path) => StoreError::NotFound(path),
        other => StoreError::storage(other.to_string()),
    }
}
