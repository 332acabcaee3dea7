//! Input validation applied before any filesystem access.

use std::path::Path;

use crate::constants::{FALLBACK_FILE_STEM, INVALID_FILENAME, OUTPUT_EXTENSION};
use crate::error::{StoreError, StoreResult};
use crate::models::ResourceRef;

const MAX_FILENAME_LEN: usize = 255;

/// Check a resource type against the allow-list and the id for positivity.
pub fn validate_resource(resource: &str, id: i64, allowed: &[String]) -> StoreResult<ResourceRef> {
    if !allowed.iter().any(|r| r == resource) {
        return Err(StoreError::InvalidResource(format!(
            "unknown resource type '{}'",
            resource
        )));
    }

    if id <= 0 {
        return Err(StoreError::InvalidResource(format!(
            "resource id must be a positive integer, got {}",
            id
        )));
    }

    Ok(ResourceRef::new(resource, id as u64))
}

/// Parse a textual resource id as received from a URL segment.
pub fn parse_resource_id(raw: &str) -> StoreResult<i64> {
    raw.trim().parse::<i64>().map_err(|_| {
        StoreError::InvalidResource(format!(
            "resource id must be a positive integer, got '{}'",
            raw
        ))
    })
}

/// Reduce a client supplied name to a safe base name.
///
/// Keeps the final path component only, replaces anything outside
/// `[A-Za-z0-9._-]` with `_`, and refuses traversal sequences outright.
pub fn sanitize_filename(filename: &str) -> String {
    let base = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename);
    if base.contains("..") {
        return INVALID_FILENAME.to_string();
    }
    let s: String = base
        .chars()
        .take(MAX_FILENAME_LEN)
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let stem_is_empty = s.trim_start_matches('.').is_empty();
    if stem_is_empty {
        FALLBACK_FILE_STEM.to_string()
    } else {
        s
    }
}

/// Name under which an upload is stored: sanitized, with its extension
/// replaced by the output format's extension.
///
/// `cat.png` becomes `cat.jpeg`; `archive.tar.gz` becomes `archive.tar.jpeg`.
/// The stem is shortened so the result stays within the filesystem's name
/// limit.
pub fn canonical_filename(filename: &str) -> String {
    let safe = sanitize_filename(filename);
    let stem = Path::new(&safe)
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or(FALLBACK_FILE_STEM);
    let max_stem = MAX_FILENAME_LEN - OUTPUT_EXTENSION.len() - 1;
    let stem = stem.get(..max_stem).unwrap_or(stem);
    format!("{}.{}", stem, OUTPUT_EXTENSION)
}

/// Whether `filename` carries one of the extensions in `mask` (case-insensitive).
pub fn has_image_extension(filename: &str, mask: &[String]) -> bool {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| mask.iter().any(|m| m.eq_ignore_ascii_case(e)))
        .unwrap_or(false)
}
