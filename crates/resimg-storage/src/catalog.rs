//! Asset catalog: rebuilds listings by walking the store tree.
//!
//! Nothing is cached. Every call re-reads the directories, because uploads and
//! deletes may change the tree at any time and the tree is the only index.
//! Entries that do not have the expected shape are skipped, never reported as
//! errors; only an unreadable store root fails a full listing.

use std::collections::{BTreeSet, HashSet};
use std::io;
use std::path::Path;

use resimg_core::models::{AssetRecord, ResourceRef, SizeLabel};
use resimg_core::validation::has_image_extension;

use crate::paths::{list_files, list_id_dirs, list_resource_dirs, list_subdirs, PathResolver};
use crate::traits::{StorageError, StorageResult};

#[derive(Debug, Clone)]
pub struct AssetCatalog {
    paths: PathResolver,
    allowed_resources: Vec<String>,
    image_extensions: Vec<String>,
}

impl AssetCatalog {
    pub fn new(
        paths: PathResolver,
        allowed_resources: Vec<String>,
        image_extensions: Vec<String>,
    ) -> Self {
        Self {
            paths,
            allowed_resources,
            image_extensions,
        }
    }

    /// Every asset of every allow-listed resource, sorted by path.
    pub async fn list_all(&self) -> StorageResult<Vec<AssetRecord>> {
        let root = self.paths.root();
        let resources = list_resource_dirs(root).await.map_err(|e| {
            StorageError::IoError(io::Error::new(
                e.kind(),
                format!("Failed to read store root {}: {}", root.display(), e),
            ))
        })?;

        let mut records = Vec::new();
        for resource in resources
            .iter()
            .filter(|name| self.allowed_resources.contains(name))
        {
            let resource_dir = self.paths.resource_dir(resource);
            let ids = match list_id_dirs(&resource_dir).await {
                Ok(ids) => ids,
                Err(e) => {
                    tracing::debug!(dir = %resource_dir.display(), error = %e, "Skipping unreadable resource directory");
                    continue;
                }
            };

            for id in ids {
                match self.scan_resource_id(resource, id).await {
                    Ok(mut found) => records.append(&mut found),
                    Err(e) => {
                        tracing::debug!(resource = %resource, id, error = %e, "Skipping unreadable resource id directory");
                    }
                }
            }
        }

        records.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(records)
    }

    /// Assets of one resource instance, sorted by path. A resource id with no
    /// directory yet has no assets.
    pub async fn list_for_resource_id(&self, target: &ResourceRef) -> StorageResult<Vec<AssetRecord>> {
        match self.scan_resource_id(&target.resource, target.id).await {
            Ok(mut records) => {
                records.sort_by(|a, b| a.path.cmp(&b.path));
                Ok(records)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(StorageError::IoError(e)),
        }
    }

    async fn scan_resource_id(&self, resource: &str, id: u64) -> io::Result<Vec<AssetRecord>> {
        let dir = self.paths.resource_id_root(resource, id);

        let size_dirs: Vec<String> = list_subdirs(&dir)
            .await?
            .into_iter()
            .filter(|name| SizeLabel::matches_dir_name(name))
            .collect();

        let originals: Vec<String> = list_files(&dir)
            .await?
            .into_iter()
            .filter(|name| has_image_extension(name, &self.image_extensions))
            .collect();

        if originals.is_empty() {
            return Ok(Vec::new());
        }

        let mut size_contents = Vec::with_capacity(size_dirs.len());
        for size in size_dirs {
            let files = Self::file_set(&dir.join(&size)).await;
            size_contents.push((size, files));
        }

        let records = originals
            .into_iter()
            .filter_map(|filename| {
                let path = self
                    .paths
                    .relative_key(&self.paths.original_path(resource, id, &filename))?;
                let sizes: BTreeSet<String> = size_contents
                    .iter()
                    .filter(|(_, files)| files.contains(&filename))
                    .map(|(size, _)| size.clone())
                    .collect();
                Some(AssetRecord {
                    resource: resource.to_string(),
                    resource_id: id,
                    filename,
                    path,
                    sizes,
                })
            })
            .collect();

        Ok(records)
    }

    /// Files inside one size directory. An unreadable directory counts as empty.
    async fn file_set(dir: &Path) -> HashSet<String> {
        match list_files(dir).await {
            Ok(files) => files.into_iter().collect(),
            Err(e) => {
                tracing::debug!(dir = %dir.display(), error = %e, "Treating unreadable size directory as empty");
                HashSet::new()
            }
        }
    }
}
