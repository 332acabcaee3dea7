//! Domain models of the resource image store.

pub mod asset;
pub mod crop;
pub mod resource;
pub mod size_label;

pub use asset::{AssetRecord, DeleteOutcome, UploadOutcome};
pub use crop::CropOffset;
pub use resource::ResourceRef;
pub use size_label::SizeLabel;
