use resimg_core::models::DeleteOutcome;
use resimg_core::validation::sanitize_filename;
use resimg_core::{StoreError, StoreResult};
use resimg_storage::{find_files_named, StorageError};

use super::{storage_failure, ImageStore};

impl ImageStore {
    /// Remove the whole `{resource}/{id}` subtree, originals and derivatives.
    #[tracing::instrument(skip_all, fields(resource = %resource, id = id))]
    pub async fn delete_asset_group(&self, resource: &str, id: i64) -> StoreResult<DeleteOutcome> {
        let target = self.resolve(resource, id)?;
        let root = self.paths.resource_id_root(&target.resource, target.id);

        match self.storage.delete_tree(&root).await {
            Ok(removed_count) => {
                tracing::info!(asset = %target, removed_count, "Asset group deleted");
                Ok(DeleteOutcome { removed_count })
            }
            Err(StorageError::NotFound(_)) => {
                Err(StoreError::NotFound(format!("no assets for {}", target)))
            }
            Err(e) => {
                tracing::error!(asset = %target, error = %e, "Failed to delete asset group");
                Err(storage_failure(e))
            }
        }
    }

    /// Remove every file called `filename` under `{resource}/{id}`: the
    /// original and each derivative.
    ///
    /// All removals are attempted even after one fails; the error then
    /// reports how many files did go.
    #[tracing::instrument(skip_all, fields(resource = %resource, id = id, filename = %filename))]
    pub async fn delete_asset_by_filename(
        &self,
        resource: &str,
        id: i64,
        filename: &str,
    ) -> StoreResult<DeleteOutcome> {
        let target = self.resolve(resource, id)?;
        let name = sanitize_filename(filename);
        let root = self.paths.resource_id_root(&target.resource, target.id);

        let matches = find_files_named(&root, &name)
            .await
            .map_err(|e| StoreError::storage(format!("Failed to scan {}: {}", target, e)))?;

        let mut removed_count = 0;
        let mut first_error: Option<String> = None;
        for path in &matches {
            match self.storage.delete_file(path).await {
                Ok(()) => removed_count += 1,
                // Gone since the scan; nothing left to remove.
                Err(StorageError::NotFound(_)) => {}
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Failed to delete file");
                    first_error.get_or_insert_with(|| e.to_string());
                }
            }
        }

        if let Some(message) = first_error {
            return Err(StoreError::StorageUnavailable {
                message,
                removed: removed_count,
            });
        }

        if removed_count == 0 {
            return Err(StoreError::NotFound(format!("{}/{}", target, name)));
        }

        tracing::info!(asset = %target, file = %name, removed_count, "Asset deleted");
        Ok(DeleteOutcome { removed_count })
    }
}
