use crate::traits::{Storage, StorageError, StorageResult};
use async_trait::async_trait;
use bytes::Bytes;
use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::fs;
use tokio::io::AsyncWriteExt;

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Local filesystem storage implementation
#[derive(Clone, Debug)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory of the image store (e.g., "/var/www/public/images")
    pub async fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage { base_path })
    }

    /// Reject paths that escape the store root.
    ///
    /// Paths come from the resolver and are already joined onto the root, so
    /// a lexical check is enough: the path must start with the root and hold
    /// no `..` or root components after it.
    fn check_path(&self, path: &Path) -> StorageResult<()> {
        let relative = path.strip_prefix(&self.base_path).map_err(|_| {
            StorageError::InvalidPath(format!(
                "{} is outside storage directory {}",
                path.display(),
                self.base_path.display()
            ))
        })?;

        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            return Err(StorageError::InvalidPath(format!(
                "{} contains invalid components",
                path.display()
            )));
        }

        Ok(())
    }

    /// Unique hidden sibling used as the write target before the rename.
    /// The name has a fixed short length so it fits wherever the final name
    /// does.
    fn temp_path_for(path: &Path) -> PathBuf {
        let temp_name = format!(
            ".resimg-{}-{}.tmp",
            std::process::id(),
            TEMP_COUNTER.fetch_add(1, Ordering::Relaxed)
        );
        path.with_file_name(temp_name)
    }

    /// Ensure parent directory exists
    async fn ensure_parent_dir(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    async fn write_temp(temp_path: &Path, data: &[u8]) -> StorageResult<()> {
        let mut file = fs::File::create(temp_path).await.map_err(|e| {
            StorageError::WriteFailed(format!(
                "Failed to create file {}: {}",
                temp_path.display(),
                e
            ))
        })?;

        file.write_all(data).await.map_err(|e| {
            StorageError::WriteFailed(format!(
                "Failed to write file {}: {}",
                temp_path.display(),
                e
            ))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::WriteFailed(format!(
                "Failed to sync file {}: {}",
                temp_path.display(),
                e
            ))
        })?;

        // Readable by the static file server in front of the store
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(temp_path, std::fs::Permissions::from_mode(0o644)).await?;
        }

        Ok(())
    }

    /// Count regular files below `dir` without following symlinks.
    async fn count_files(dir: &Path) -> std::io::Result<usize> {
        let mut count = 0;
        let mut pending = vec![dir.to_path_buf()];
        while let Some(current) = pending.pop() {
            let mut entries = fs::read_dir(&current).await?;
            while let Some(entry) = entries.next_entry().await? {
                let file_type = entry.file_type().await?;
                if file_type.is_dir() {
                    pending.push(entry.path());
                } else if file_type.is_file() {
                    count += 1;
                }
            }
        }
        Ok(count)
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn write(&self, path: &Path, data: Bytes) -> StorageResult<()> {
        self.check_path(path)?;
        self.ensure_parent_dir(path).await?;

        let size = data.len();
        let start = std::time::Instant::now();
        let temp_path = Self::temp_path_for(path);

        if let Err(e) = Self::write_temp(&temp_path, &data).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e);
        }

        if let Err(e) = fs::rename(&temp_path, path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(StorageError::WriteFailed(format!(
                "Failed to move {} into place at {}: {}",
                temp_path.display(),
                path.display(),
                e
            )));
        }

        tracing::debug!(
            path = %path.display(),
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage write successful"
        );

        Ok(())
    }

    async fn create_dir_all(&self, path: &Path) -> StorageResult<()> {
        self.check_path(path)?;
        fs::create_dir_all(path).await.map_err(|e| {
            StorageError::WriteFailed(format!(
                "Failed to create directory {}: {}",
                path.display(),
                e
            ))
        })
    }

    async fn delete_file(&self, path: &Path) -> StorageResult<()> {
        self.check_path(path)?;

        match fs::remove_file(path).await {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "Local storage delete successful");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(path.display().to_string()))
            }
            Err(e) => Err(StorageError::DeleteFailed(format!(
                "Failed to delete file {}: {}",
                path.display(),
                e
            ))),
        }
    }

    async fn delete_tree(&self, path: &Path) -> StorageResult<usize> {
        self.check_path(path)?;
        let start = std::time::Instant::now();

        match fs::try_exists(path).await {
            Ok(true) => {}
            Ok(false) => return Err(StorageError::NotFound(path.display().to_string())),
            Err(e) => {
                return Err(StorageError::DeleteFailed(format!(
                    "Failed to stat {}: {}",
                    path.display(),
                    e
                )))
            }
        }

        let removed = Self::count_files(path).await.map_err(|e| {
            StorageError::DeleteFailed(format!("Failed to scan {}: {}", path.display(), e))
        })?;

        fs::remove_dir_all(path).await.map_err(|e| {
            StorageError::DeleteFailed(format!(
                "Failed to delete directory {}: {}",
                path.display(),
                e
            ))
        })?;

        tracing::info!(
            path = %path.display(),
            removed,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage tree delete successful"
        );

        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_local_storage_write_creates_parents() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        let path = dir.path().join("models/7/500x400/cat.jpeg");
        storage
            .write(&path, Bytes::from_static(b"jpeg bytes"))
            .await
            .unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"jpeg bytes");
    }

    #[tokio::test]
    async fn test_write_overwrites_and_leaves_no_temp_files() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        let path = dir.path().join("models/7/cat.jpeg");
        storage.write(&path, Bytes::from_static(b"first")).await.unwrap();
        storage.write(&path, Bytes::from_static(b"second")).await.unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"second");
        let names: Vec<String> = std::fs::read_dir(dir.path().join("models/7"))
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names, vec!["cat.jpeg"]);
    }

    #[tokio::test]
    async fn test_write_accepts_longest_file_name() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        let name = format!("{}.jpeg", "a".repeat(250));
        let path = dir.path().join("models/7").join(&name);
        storage.write(&path, Bytes::from_static(b"x")).await.unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"x");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_written_files_are_world_readable() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();
        let path = dir.path().join("models/1/cat.jpeg");
        storage.write(&path, Bytes::from_static(b"x")).await.unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
    }

    #[tokio::test]
    async fn test_path_outside_root_rejected() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path().join("images")).await.unwrap();

        let result = storage
            .write(&dir.path().join("elsewhere.jpeg"), Bytes::from_static(b"x"))
            .await;
        assert!(matches!(result, Err(StorageError::InvalidPath(_))));

        let sneaky = dir.path().join("images/models/../../elsewhere.jpeg");
        let result = storage.delete_file(&sneaky).await;
        assert!(matches!(result, Err(StorageError::InvalidPath(_))));
    }

    #[tokio::test]
    async fn test_delete_file_missing_is_not_found() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        let result = storage.delete_file(&dir.path().join("models/1/nope.jpeg")).await;
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_tree_counts_files() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        let root = dir.path().join("models/7");
        for rel in ["cat.jpeg", "500x400/cat.jpeg", "400x300/cat.jpeg", "dog.jpeg"] {
            storage
                .write(&root.join(rel), Bytes::from_static(b"x"))
                .await
                .unwrap();
        }
        storage.create_dir_all(&root.join("empty")).await.unwrap();

        let removed = storage.delete_tree(&root).await.unwrap();
        assert_eq!(removed, 4);
        assert!(!root.exists());

        let result = storage.delete_tree(&root).await;
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_tree_stat_failure_is_not_not_found() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        // a regular file where a directory is expected makes the stat fail
        std::fs::create_dir_all(dir.path().join("models")).unwrap();
        std::fs::write(dir.path().join("models/7"), b"not a directory").unwrap();

        let result = storage.delete_tree(&dir.path().join("models/7/500x400")).await;
        assert!(matches!(result, Err(StorageError::DeleteFailed(_))));
    }
}
