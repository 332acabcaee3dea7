//! resimg Core Library
//!
//! This crate provides the domain models, error taxonomy, configuration and
//! validation shared by every resimg component.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod validation;

// Re-export commonly used types
pub use config::{Config, StoreConfig};
pub use error::{ErrorMetadata, LogLevel, StoreError, StoreResult};
pub use models::{
    AssetRecord, CropOffset, DeleteOutcome, ResourceRef, SizeLabel, UploadOutcome,
};
