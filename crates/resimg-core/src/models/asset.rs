use serde::Serialize;
use std::collections::BTreeSet;

use super::SizeLabel;

/// One stored original and the size labels currently generated for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetRecord {
    pub resource: String,
    pub resource_id: u64,
    pub filename: String,
    /// Path of the original relative to the store root, `/` separated.
    pub path: String,
    /// Names of the size directories that contain this filename.
    pub sizes: BTreeSet<String>,
}

/// Result of a successful upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadOutcome {
    pub written: bool,
    pub resource: String,
    pub resource_id: u64,
    pub filename: String,
    pub path: String,
    pub sizes: Vec<SizeLabel>,
}

/// Result of a successful delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeleteOutcome {
    pub removed_count: usize,
}
