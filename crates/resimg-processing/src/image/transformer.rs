//! Image transformer - chains decode, crop, resize and encode
//!
//! Produces the two kinds of stored file: the canonical original (the whole
//! decoded upload, re-encoded) and derivatives (cropped, covered to a size
//! label, re-encoded). Output is a pure function of the inputs and the
//! configured quality.

use bytes::Bytes;
use image::DynamicImage;
use resimg_core::models::{CropOffset, SizeLabel};

use super::{ImageCrop, ImageProcessor, ImageResize, ProcessingError};
use crate::compression::JpegEncoder;

#[derive(Debug, Clone, Copy)]
pub struct ImageTransformer {
    encoder: JpegEncoder,
}

impl ImageTransformer {
    pub fn new(jpeg_quality: u8) -> Self {
        Self {
            encoder: JpegEncoder::new(jpeg_quality),
        }
    }

    /// Re-encode an uploaded payload as the stored original. No crop, no resize.
    pub fn produce_original(&self, data: &[u8]) -> Result<Bytes, ProcessingError> {
        let img = ImageProcessor::decode(data)?;
        self.encode_original(&img)
    }

    /// Produce one derivative of an uploaded payload.
    pub fn produce_variant(
        &self,
        data: &[u8],
        size: SizeLabel,
        crops: &[CropOffset],
    ) -> Result<Bytes, ProcessingError> {
        let img = ImageProcessor::decode(data)?;
        let cropped = ImageCrop::apply_offsets(img, crops)?;
        self.render_variant(&cropped, size)
    }

    pub fn encode_original(&self, img: &DynamicImage) -> Result<Bytes, ProcessingError> {
        self.encoder.encode(img)
    }

    /// Cover-resize an already decoded and cropped image to `size` and encode it.
    ///
    /// Lets a caller producing several sizes decode and crop once.
    pub fn render_variant(
        &self,
        cropped: &DynamicImage,
        size: SizeLabel,
    ) -> Result<Bytes, ProcessingError> {
        if size.is_empty() {
            return Err(ProcessingError::Encode(format!(
                "Size {} has a zero dimension",
                size
            )));
        }
        let resized = ImageResize::cover_and_extent(cropped, size);
        self.encoder.encode(&resized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_fn(width, height, |x, y| {
            Rgba([(x % 256) as u8, (y % 256) as u8, 200, 255])
        });
        let mut buffer = Cursor::new(Vec::new());
        img.write_to(&mut buffer, ImageFormat::Png).unwrap();
        buffer.into_inner()
    }

    fn decoded_dimensions(data: &[u8]) -> (u32, u32) {
        assert_eq!(image::guess_format(data).unwrap(), ImageFormat::Jpeg);
        image::load_from_memory(data).unwrap().dimensions()
    }

    #[test]
    fn test_original_keeps_dimensions() {
        let transformer = ImageTransformer::new(75);
        let out = transformer.produce_original(&png_bytes(640, 480)).unwrap();
        assert_eq!(decoded_dimensions(&out), (640, 480));
    }

    #[test]
    fn test_variant_has_exact_size() {
        let transformer = ImageTransformer::new(75);
        let data = png_bytes(640, 480);
        for size in [SizeLabel::new(500, 400), SizeLabel::new(400, 300), SizeLabel::new(32, 90)] {
            let out = transformer.produce_variant(&data, size, &[]).unwrap();
            assert_eq!(decoded_dimensions(&out), (size.width, size.height));
        }
    }

    #[test]
    fn test_small_source_is_scaled_up() {
        let transformer = ImageTransformer::new(75);
        let out = transformer
            .produce_variant(&png_bytes(20, 10), SizeLabel::new(500, 400), &[])
            .unwrap();
        assert_eq!(decoded_dimensions(&out), (500, 400));
    }

    #[test]
    fn test_variant_with_crop_still_has_exact_size() {
        let transformer = ImageTransformer::new(75);
        let crops = [CropOffset::new(10, 10), CropOffset::new(-100, -50)];
        let out = transformer
            .produce_variant(&png_bytes(640, 480), SizeLabel::new(400, 300), &crops)
            .unwrap();
        assert_eq!(decoded_dimensions(&out), (400, 300));
    }

    #[test]
    fn test_variant_is_deterministic() {
        let transformer = ImageTransformer::new(85);
        let data = png_bytes(300, 200);
        let size = SizeLabel::new(120, 120);
        let crops = [CropOffset::new(5, -5)];
        assert_eq!(
            transformer.produce_variant(&data, size, &crops).unwrap(),
            transformer.produce_variant(&data, size, &crops).unwrap()
        );
    }

    #[test]
    fn test_errors() {
        let transformer = ImageTransformer::new(75);
        let bad = transformer.produce_variant(b"GIF89a garbage", SizeLabel::new(10, 10), &[]);
        assert!(matches!(bad, Err(ProcessingError::InvalidImage(_))));

        let crop = transformer.produce_variant(
            &png_bytes(50, 50),
            SizeLabel::new(10, 10),
            &[CropOffset::new(-50, 0)],
        );
        assert!(matches!(crop, Err(ProcessingError::InvalidCrop(_))));
    }
}
