use image::{DynamicImage, GenericImageView};
use resimg_core::models::CropOffset;

use super::ProcessingError;

/// Crop operations driven by geometry offsets
pub struct ImageCrop;

impl ImageCrop {
    /// Apply each offset in order, each one to the result of the previous.
    ///
    /// An offset that would leave nothing of the current image is an error.
    pub fn apply_offsets(
        img: DynamicImage,
        offsets: &[CropOffset],
    ) -> Result<DynamicImage, ProcessingError> {
        offsets.iter().try_fold(img, |current, offset| {
            let (width, height) = current.dimensions();
            let (x, y, w, h) = offset.region(width, height).ok_or_else(|| {
                ProcessingError::InvalidCrop(format!(
                    "Offset {} leaves no pixels of a {}x{} image",
                    offset, width, height
                ))
            })?;
            Ok(current.crop_imm(x, y, w, h))
        })
    }
}
