//! Image processor - decoding and validation of uploaded payloads

use image::{DynamicImage, ImageReader, Limits};
use std::io::Cursor;

use super::ProcessingError;

/// Largest width or height accepted from an upload.
const MAX_DIMENSION: u32 = 16_384;
/// Upper bound on decoder allocations.
const MAX_DECODE_ALLOC: u64 = 512 * 1024 * 1024;

pub struct ImageProcessor;

impl ImageProcessor {
    /// Decode a payload in any supported raster format.
    ///
    /// The format is sniffed from the bytes; the client's filename and
    /// content type are never trusted.
    pub fn decode(data: &[u8]) -> Result<DynamicImage, ProcessingError> {
        if data.is_empty() {
            return Err(ProcessingError::InvalidImage("Payload is empty".to_string()));
        }

        let mut reader = ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(|e| ProcessingError::InvalidImage(format!("Failed to read payload: {}", e)))?;

        if reader.format().is_none() {
            return Err(ProcessingError::InvalidImage(
                "Unrecognized image format".to_string(),
            ));
        }

        let mut limits = Limits::default();
        limits.max_image_width = Some(MAX_DIMENSION);
        limits.max_image_height = Some(MAX_DIMENSION);
        limits.max_alloc = Some(MAX_DECODE_ALLOC);
        reader.limits(limits);

        let img = reader
            .decode()
            .map_err(|e| ProcessingError::InvalidImage(format!("Failed to decode image: {}", e)))?;

        if img.width() == 0 || img.height() == 0 {
            return Err(ProcessingError::InvalidImage(
                "Image has no pixels".to_string(),
            ));
        }

        Ok(img)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage};

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_pixel(width, height, Rgb([10, 20, 30]));
        let mut buffer = Cursor::new(Vec::new());
        img.write_to(&mut buffer, ImageFormat::Png).unwrap();
        buffer.into_inner()
    }

    #[test]
    fn test_decode_png() {
        let img = ImageProcessor::decode(&png_bytes(32, 24)).unwrap();
        assert_eq!((img.width(), img.height()), (32, 24));
    }

    #[test]
    fn test_rejects_non_image() {
        let result = ImageProcessor::decode(b"definitely not an image");
        assert!(matches!(result, Err(ProcessingError::InvalidImage(_))));
        assert!(matches!(
            ImageProcessor::decode(b""),
            Err(ProcessingError::InvalidImage(_))
        ));
    }

    #[test]
    fn test_rejects_truncated_png() {
        let data = png_bytes(64, 64);
        let result = ImageProcessor::decode(&data[..data.len() / 2]);
        assert!(matches!(result, Err(ProcessingError::InvalidImage(_))));
    }
}
