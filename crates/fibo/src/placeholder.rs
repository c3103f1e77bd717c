//! Placeholder artifacts for offline mode and failed generations.

use std::path::Path;

use image::{Rgb, RgbImage};

pub const PLACEHOLDER_SIZE: u32 = 512;
pub const PLACEHOLDER_GRAY: Rgb<u8> = Rgb([128, 128, 128]);

/// Write a solid gray PNG to `path`, creating parent directories.
pub fn write_placeholder(path: &Path) -> Result<(), crate::api::FiboApiError> {
    tracing::warn!(path = %path.display(), "Writing placeholder image");

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    RgbImage::from_pixel(PLACEHOLDER_SIZE, PLACEHOLDER_SIZE, PLACEHOLDER_GRAY)
        .save_with_format(path, image::ImageFormat::Png)?;
    Ok(())
}
