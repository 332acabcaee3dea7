//! Image derivative pipeline
//!
//! Decoding and validation live in `processor`, geometry in `crop` and
//! `resize`, and `transformer` chains them into stored originals and
//! derivatives. Everything here is synchronous and CPU bound; callers run it
//! on the blocking pool.

pub mod crop;
pub mod processor;
pub mod resize;
pub mod transformer;

pub use crop::ImageCrop;
pub use processor::ImageProcessor;
pub use resize::ImageResize;
pub use transformer::ImageTransformer;

use resimg_core::StoreError;
use thiserror::Error;

/// Failures of the derivative pipeline.
#[derive(Debug, Clone, Error)]
pub enum ProcessingError {
    #[error("Invalid image: {0}")]
    InvalidImage(String),

    #[error("Invalid crop: {0}")]
    InvalidCrop(String),

    #[error("Encoding failed: {0}")]
    Encode(String),
}

impl From<ProcessingError> for StoreError {
    fn from(err: ProcessingError) -> Self {
        match err {
            ProcessingError::InvalidImage(msg) => StoreError::InvalidImage(msg),
            ProcessingError::InvalidCrop(msg) => StoreError::InvalidCrop(msg),
            ProcessingError::Encode(msg) => StoreError::storage(msg),
        }
    }
}
