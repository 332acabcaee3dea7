//! resimg Image Processing Library
//!
//! This crate turns uploaded originals into stored assets: the derivative
//! pipeline (decode, crop, cover resize, extent, JPEG encode) and the
//! `ImageStore` façade that drives it and persists the results.

pub mod compression;
pub mod image;
pub mod store;

// Re-export commonly used types
pub use compression::JpegEncoder;
pub use self::image::{ImageProcessor, ImageResize, ImageTransformer, ProcessingError};
pub use store::ImageStore;
