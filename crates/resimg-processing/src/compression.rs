use bytes::Bytes;
use image::DynamicImage;
use img_parts::jpeg::Jpeg;
use img_parts::{ImageEXIF, ImageICC};

use crate::image::ProcessingError;

/// JPEG encoder for every stored original and derivative.
///
/// Quality is fixed per encoder so the same input always produces the same
/// bytes; there is no content-adaptive tuning.
#[derive(Debug, Clone, Copy)]
pub struct JpegEncoder {
    quality: u8,
}

impl JpegEncoder {
    pub fn new(quality: u8) -> Self {
        Self {
            quality: quality.clamp(1, 100),
        }
    }

    pub fn quality(&self) -> u8 {
        self.quality
    }

    /// Encode to JPEG using mozjpeg, then strip metadata segments.
    pub fn encode(&self, img: &DynamicImage) -> Result<Bytes, ProcessingError> {
        let jpeg_data = self.compress(img).map_err(|e| {
            ProcessingError::Encode(format!("JPEG compression failed: {}", e))
        })?;
        Self::strip_metadata(Bytes::from(jpeg_data))
    }

    fn compress(&self, img: &DynamicImage) -> std::io::Result<Vec<u8>> {
        // JPEG has no alpha; transparent pixels keep their color channels
        let rgb_img = img.to_rgb8();
        let (width, height) = rgb_img.dimensions();

        let mut comp = mozjpeg::Compress::new(mozjpeg::ColorSpace::JCS_RGB);
        comp.set_size(width as usize, height as usize);
        comp.set_quality(self.quality as f32);
        comp.set_progressive_mode();
        comp.set_optimize_coding(true);

        let mut comp = comp.start_compress(Vec::new())?;
        comp.write_scanlines(&rgb_img)?;
        comp.finish()
    }

    /// Remove EXIF and ICC segments from an encoded JPEG.
    pub fn strip_metadata(data: Bytes) -> Result<Bytes, ProcessingError> {
        let mut jpeg = Jpeg::from_bytes(data).map_err(|e| {
            ProcessingError::Encode(format!("Encoded JPEG could not be re-read: {}", e))
        })?;
        jpeg.set_exif(None);
        jpeg.set_icc_profile(None);
        Ok(jpeg.encoder().bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, Rgba, RgbaImage};

    fn gradient(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_fn(width, height, |x, y| {
            Rgba([(x % 256) as u8, (y % 256) as u8, 128, 255])
        }))
    }

    #[test]
    fn test_encode_produces_decodable_jpeg() {
        let encoder = JpegEncoder::new(75);
        let data = encoder.encode(&gradient(40, 30)).unwrap();

        assert_eq!(
            image::guess_format(&data).unwrap(),
            image::ImageFormat::Jpeg
        );
        let decoded = image::load_from_memory(&data).unwrap();
        assert_eq!(decoded.dimensions(), (40, 30));
    }

    #[test]
    fn test_encode_is_deterministic() {
        let encoder = JpegEncoder::new(85);
        let img = gradient(64, 48);
        assert_eq!(encoder.encode(&img).unwrap(), encoder.encode(&img).unwrap());
    }

    #[test]
    fn test_encoded_output_carries_no_metadata() {
        let data = JpegEncoder::new(75).encode(&gradient(16, 16)).unwrap();
        let jpeg = Jpeg::from_bytes(data).unwrap();
        assert!(jpeg.exif().is_none());
        assert!(jpeg.icc_profile().is_none());
    }

    #[test]
    fn test_quality_is_clamped() {
        assert_eq!(JpegEncoder::new(0).quality(), 1);
        assert_eq!(JpegEncoder::new(200).quality(), 100);
    }
}
