//! Averaged HSV color summaries.
//!
//! [`analyze_image`] decodes an image, downsamples it to a fixed
//! [`ANALYSIS_SIZE`] square, converts every pixel to hue / saturation /
//! value and averages each channel. Working in HSV keeps a brightness
//! shift from masquerading as a hue shift.
//!
//! Analysis is **fail-soft**: an unreadable image yields
//! [`ColorSummary::SENTINEL`] and a logged error, so one bad artifact
//! cannot abort validation of a whole sequence.

use std::path::{Path, PathBuf};

use image::imageops::FilterType;
use image::DynamicImage;

/// Edge length of the square thumbnail colors are averaged over.
pub const ANALYSIS_SIZE: u32 = 64;

/// Averaged hue, saturation, and value of an image, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ColorSummary {
    pub hue: f64,
    pub saturation: f64,
    pub value: f64,
}

impl ColorSummary {
    /// Returned when an image cannot be analyzed.
    pub const SENTINEL: ColorSummary = ColorSummary {
        hue: 0.0,
        saturation: 0.0,
        value: 0.0,
    };

    pub const fn new(hue: f64, saturation: f64, value: f64) -> Self {
        Self {
            hue,
            saturation,
            value,
        }
    }

    /// Euclidean distance between two summaries treated as 3-vectors.
    pub fn distance(&self, other: &ColorSummary) -> f64 {
        let dh = self.hue - other.hue;
        let ds = self.saturation - other.saturation;
        let dv = self.value - other.value;
        (dh * dh + ds * ds + dv * dv).sqrt()
    }
}

/// Compute the color summary of the image at `path`.
///
/// Returns [`ColorSummary::SENTINEL`] if the file is missing, corrupt,
/// or in an unsupported format.
pub fn analyze_image(path: &Path) -> ColorSummary {
    match image::open(path) {
        Ok(img) => summarize_image(&img),
        Err(e) => {
            tracing::error!(
                path = %path.display(),
                error = %e,
                "Failed to read image for color analysis",
            );
            ColorSummary::SENTINEL
        }
    }
}

/// [`analyze_image`] on the blocking thread pool, for async callers.
///
/// A failed blocking task is logged and yields the sentinel like any
/// other analysis failure.
pub async fn analyze_image_offloaded(path: PathBuf) -> ColorSummary {
    let path_str = path.display().to_string();
    match tokio::task::spawn_blocking(move || analyze_image(&path)).await {
        Ok(summary) => summary,
        Err(e) => {
            tracing::error!(path = %path_str, error = %e, "Color analysis task failed");
            ColorSummary::SENTINEL
        }
    }
}

/// Compute the color summary of an already-decoded image.
pub fn summarize_image(img: &DynamicImage) -> ColorSummary {
    if img.width() == 0 || img.height() == 0 {
        return ColorSummary::SENTINEL;
    }

    let thumb = img
        .resize_exact(ANALYSIS_SIZE, ANALYSIS_SIZE, FilterType::Triangle)
        .to_rgb8();

    let mut sum_h = 0.0f64;
    let mut sum_s = 0.0f64;
    let mut sum_v = 0.0f64;
    for px in thumb.pixels() {
        let (h, s, v) = rgb_to_hsv(px[0], px[1], px[2]);
        sum_h += h;
        sum_s += s;
        sum_v += v;
    }

    let n = f64::from(thumb.width() * thumb.height());
    ColorSummary::new(sum_h / n, sum_s / n, sum_v / n)
}

/// Convert an 8-bit RGB triple to HSV with every component in `[0, 1]`.
///
/// Hue is expressed as a fraction of a full turn; achromatic pixels get
/// hue 0.
pub fn rgb_to_hsv(r: u8, g: u8, b: u8) -> (f64, f64, f64) {
    let r = f64::from(r) / 255.0;
    let g = f64::from(g) / 255.0;
    let b = f64::from(b) / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let value = max;
    let saturation = if max > 0.0 { delta / max } else { 0.0 };

    let hue = if delta == 0.0 {
        0.0
    } else if max == r {
        ((g - b) / delta).rem_euclid(6.0) / 6.0
    } else if max == g {
        ((b - r) / delta + 2.0) / 6.0
    } else {
        ((r - g) / delta + 4.0) / 6.0
    };

    (hue, saturation, value)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
