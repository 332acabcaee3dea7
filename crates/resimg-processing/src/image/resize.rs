use image::{imageops::FilterType, DynamicImage, GenericImageView};
use resimg_core::models::SizeLabel;

/// Image resize operations
pub struct ImageResize;

impl ImageResize {
    /// Centered region of the source with the target's aspect ratio, as
    /// `(x, y, width, height)`. The region never exceeds the source and is
    /// at least one pixel on each side.
    pub fn cover_region(
        orig_width: u32,
        orig_height: u32,
        target_width: u32,
        target_height: u32,
    ) -> (u32, u32, u32, u32) {
        if orig_width == 0 || orig_height == 0 {
            return (0, 0, orig_width, orig_height);
        }
        let (ow, oh) = (orig_width as u64, orig_height as u64);
        let (tw, th) = (target_width.max(1) as u64, target_height.max(1) as u64);

        let (width, height) = if ow * th > oh * tw {
            // wider than the target: trim the sides
            let width = (oh * tw + th / 2) / th;
            (width.clamp(1, ow), oh)
        } else {
            let height = (ow * th + tw / 2) / tw;
            (ow, height.clamp(1, oh))
        };

        let (width, height) = (width as u32, height as u32);
        let x = (orig_width - width) / 2;
        let y = (orig_height - height) / 2;
        (x, y, width, height)
    }

    /// Select appropriate filter type based on resize ratio
    pub fn select_filter(
        orig_width: u32,
        orig_height: u32,
        new_width: u32,
        new_height: u32,
    ) -> FilterType {
        let width_ratio = orig_width as f32 / new_width as f32;
        let height_ratio = orig_height as f32 / new_height as f32;
        let max_ratio = width_ratio.max(height_ratio);

        if max_ratio > 2.0 {
            FilterType::Triangle
        } else if max_ratio > 1.5 {
            FilterType::CatmullRom
        } else {
            FilterType::Lanczos3
        }
    }

    /// Keep the centered region with the aspect ratio of `size`, then scale
    /// it to exactly `size.width` x `size.height`.
    ///
    /// No intermediate buffer is larger than the source or the target. Small
    /// sources are scaled up.
    pub fn cover_and_extent(img: &DynamicImage, size: SizeLabel) -> DynamicImage {
        let (orig_width, orig_height) = img.dimensions();
        let (x, y, width, height) =
            Self::cover_region(orig_width, orig_height, size.width, size.height);

        let region = if (width, height) == (orig_width, orig_height) {
            img.clone()
        } else {
            img.crop_imm(x, y, width, height)
        };

        if (width, height) == (size.width, size.height) {
            return region;
        }

        let filter = Self::select_filter(width, height, size.width, size.height);
        region.resize_exact(size.width, size.height, filter)
    }
}
