//! Test fixtures: encoded images.

use std::io::Cursor;

use image::{ImageFormat, Rgb, RgbImage};

/// A PNG with a gradient, so resizing has real content to work on.
pub fn create_test_png(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let mut buffer = Cursor::new(Vec::new());
    img.write_to(&mut buffer, ImageFormat::Png)
        .expect("Failed to encode PNG fixture");
    buffer.into_inner()
}
