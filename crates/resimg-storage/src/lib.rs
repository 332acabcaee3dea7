//! resimg Storage Library
//!
//! This crate owns the on-disk layout of the image store and everything that
//! touches the filesystem directly: the path resolver, the `Storage` trait with
//! its local filesystem implementation, and the read-only asset catalog.
//!
//! # Directory layout
//!
//! - **Original**: `{root}/{resource}/{id}/{filename}`
//! - **Derivative**: `{root}/{resource}/{id}/{WIDTHxHEIGHT}/{filename}`
//!
//! There is no index besides this tree. Path construction is centralized in
//! the `paths` module so the writer and the catalog never disagree.

pub mod catalog;
pub mod local;
pub mod paths;
pub mod traits;

// Re-export commonly used types
pub use catalog::AssetCatalog;
pub use local::LocalStorage;
pub use paths::{find_files_named, PathResolver};
pub use traits::{Storage, StorageError, StorageResult};
