//! Path resolver: the single source of truth for the store layout.
//!
//! Joining is all it does. Callers validate the resource and id first.

use std::io;
use std::path::{Component, Path, PathBuf};

#[derive(Debug, Clone)]
pub struct PathResolver {
    root: PathBuf,
}

impl PathResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn resource_dir(&self, resource: &str) -> PathBuf {
        self.root.join(resource)
    }

    pub fn resource_id_root(&self, resource: &str, id: u64) -> PathBuf {
        self.resource_dir(resource).join(id.to_string())
    }

    pub fn original_path(&self, resource: &str, id: u64, filename: &str) -> PathBuf {
        self.resource_id_root(resource, id).join(filename)
    }

    pub fn size_dir(&self, resource: &str, id: u64, size: &str) -> PathBuf {
        self.resource_id_root(resource, id).join(size)
    }

    pub fn variant_path(&self, resource: &str, id: u64, size: &str, filename: &str) -> PathBuf {
        self.size_dir(resource, id, size).join(filename)
    }

    /// Path relative to the store root with `/` separators, e.g.
    /// `models/7/400x300/cat.jpeg`. `None` for paths outside the root.
    pub fn relative_key(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.root).ok()?;
        let mut parts = Vec::new();
        for component in relative.components() {
            match component {
                Component::Normal(part) => parts.push(part.to_str()?),
                _ => return None,
            }
        }
        Some(parts.join("/"))
    }
}

/// Names of the immediate subdirectories of the store root.
pub async fn list_resource_dirs(root: &Path) -> io::Result<Vec<String>> {
    list_subdirs(root).await
}

/// Ids of the immediate subdirectories of a resource directory whose names
/// are positive integers in canonical form, i.e. exactly what
/// [`PathResolver::resource_id_root`] produces. Anything else, including
/// `007`, is skipped.
pub async fn list_id_dirs(resource_dir: &Path) -> io::Result<Vec<u64>> {
    let mut ids: Vec<u64> = list_subdirs(resource_dir)
        .await?
        .iter()
        .filter_map(|name| parse_positive_id(name))
        .collect();
    ids.sort_unstable();
    Ok(ids)
}

fn parse_positive_id(name: &str) -> Option<u64> {
    if !name.bytes().all(|b| b.is_ascii_digit()) || name.starts_with('0') {
        return None;
    }
    name.parse::<u64>().ok().filter(|id| *id > 0)
}

/// Names of the immediate subdirectories of `dir`. Entries whose type cannot
/// be read or whose name is not UTF-8 are skipped.
pub(crate) async fn list_subdirs(dir: &Path) -> io::Result<Vec<String>> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut names = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let is_dir = match entry.file_type().await {
            Ok(file_type) => file_type.is_dir(),
            Err(_) => false,
        };
        if !is_dir {
            continue;
        }
        if let Ok(name) = entry.file_name().into_string() {
            names.push(name);
        }
    }
    names.sort();
    Ok(names)
}

/// Names of the regular files directly inside `dir`.
pub(crate) async fn list_files(dir: &Path) -> io::Result<Vec<String>> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut names = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let is_file = match entry.file_type().await {
            Ok(file_type) => file_type.is_file(),
            Err(_) => false,
        };
        if !is_file {
            continue;
        }
        if let Ok(name) = entry.file_name().into_string() {
            names.push(name);
        }
    }
    names.sort();
    Ok(names)
}

/// Every regular file named `filename` anywhere below `dir`, sorted.
///
/// A missing `dir` yields nothing. Symlinked directories are not followed.
pub async fn find_files_named(dir: &Path, filename: &str) -> io::Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    let mut pending = vec![dir.to_path_buf()];
    while let Some(current) = pending.pop() {
        let mut entries = match tokio::fs::read_dir(&current).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
            Err(e) => return Err(e),
        };
        while let Some(entry) = entries.next_entry().await? {
            let file_type = match entry.file_type().await {
                Ok(file_type) => file_type,
                Err(_) => continue,
            };
            if file_type.is_dir() {
                pending.push(entry.path());
            } else if file_type.is_file() && entry.file_name() == filename {
                found.push(entry.path());
            }
        }
    }
    found.sort();
    Ok(found)
}
