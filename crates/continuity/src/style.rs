//! Style extraction from a reference image.
//!
//! A few representative colors are sampled from the image and classified
//! along four axes (brightness, contrast, saturation, warmth). The
//! classification picks a named palette and maps onto continuity-map
//! parameters, so a user-supplied reference can steer the look of every
//! shot in a run.
//!
//! Like color analysis, extraction is fail-soft: an unreadable image
//! yields `None` and a logged error.

use std::path::{Path, PathBuf};

use image::DynamicImage;
use serde_json::json;
use storyframe_core::plan::{ContinuityMap, ParamGroup};

/// Longest edge images are shrunk to before sampling.
pub const SAMPLE_EDGE: u32 = 100;

/// Pixels sampled per image before de-duplication.
pub const MAX_SAMPLES: usize = 20;

/// Distinct colors kept after de-duplication.
pub const MAX_DOMINANT_COLORS: usize = 5;

/// Two samples closer than this (sum of per-channel differences) count
/// as the same color.
pub const SIMILAR_COLOR_DISTANCE: u32 = 30;

pub type Rgb = [u8; 3];

macro_rules! define_level_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $( $variant:ident => $label:literal ),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $( $variant ),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( Self::$variant => $label ),+
                }
            }
        }
    };
}

define_level_enum! {
    /// Mean per-color brightness.
    Brightness { Dark => "dark", Medium => "medium", Bright => "bright" }
}

define_level_enum! {
    /// Spread between the brightest and darkest sampled color.
    Contrast { Low => "low", Medium => "medium", High => "high" }
}

define_level_enum! {
    /// Mean HSV-style saturation of the sampled colors.
    Saturation { Muted => "muted", Normal => "normal", Vibrant => "vibrant" }
}

define_level_enum! {
    /// Red-over-blue bias of the sampled colors.
    Warmth { Cool => "cool", Neutral => "neutral", Warm => "warm" }
}

define_level_enum! {
    /// Named palette a set of colors is matched to.
    Palette {
        TealOrange => "teal_orange",
        Noir => "noir",
        GoldenHour => "golden_hour",
        MoodyBlue => "moody_blue",
        PastelDream => "pastel_dream",
        NeonCyber => "neon_cyber",
        EarthyNatural => "earthy_natural",
    }
}

/// Style extracted from a reference image.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleDna {
    /// At most [`MAX_DOMINANT_COLORS`] distinct colors, in sample order.
    pub dominant_colors: Vec<Rgb>,
    pub palette: Palette,
    pub brightness: Brightness,
    pub contrast: Contrast,
    pub saturation: Saturation,
    pub warmth: Warmth,
    pub suggested_hdr: bool,
    pub suggested_bit_depth: &'static str,
    pub notes: String,
}

/// Continuity-map parameters derived from a [`StyleDna`].
#[derive(Debug, Clone, PartialEq)]
pub struct StyleParams {
    pub global_style: ParamGroup,
    pub lighting: ParamGroup,
    pub notes: String,
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

fn brightness_of(c: &Rgb) -> f64 {
    (f64::from(c[0]) + f64::from(c[1]) + f64::from(c[2])) / 3.0
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

fn classify_brightness(colors: &[Rgb]) -> Brightness {
    match mean(colors.iter().map(brightness_of)) {
        Some(b) if b > 180.0 => Brightness::Bright,
        Some(b) if b < 80.0 => Brightness::Dark,
        _ => Brightness::Medium,
    }
}

fn classify_saturation(colors: &[Rgb]) -> Saturation {
    let saturations = colors.iter().filter_map(|c| {
        let max = c.iter().copied().max().unwrap_or(0);
        let min = c.iter().copied().min().unwrap_or(0);
        (max > 0).then(|| f64::from(max - min) / f64::from(max))
    });
    match mean(saturations) {
        Some(s) if s > 0.6 => Saturation::Vibrant,
        Some(s) if s < 0.25 => Saturation::Muted,
        _ => Saturation::Normal,
    }
}

fn classify_warmth(colors: &[Rgb]) -> Warmth {
    let bias = colors
        .iter()
        .map(|c| (f64::from(c[0]) - f64::from(c[2])) / 255.0);
    match mean(bias) {
        Some(w) if w > 0.2 => Warmth::Warm,
        Some(w) if w < -0.2 => Warmth::Cool,
        _ => Warmth::Neutral,
    }
}

fn classify_contrast(colors: &[Rgb]) -> Contrast {
    if colors.len() < 2 {
        return Contrast::Medium;
    }
    let (lo, hi) = colors
        .iter()
        .map(brightness_of)
        .fold((f64::MAX, f64::MIN), |(lo, hi), b| (lo.min(b), hi.max(b)));
    match hi - lo {
        r if r > 150.0 => Contrast::High,
        r if r < 50.0 => Contrast::Low,
        _ => Contrast::Medium,
    }
}

/// First matching rule wins; anything unmatched reads as teal/orange.
fn match_palette(brightness: Brightness, saturation: Saturation, warmth: Warmth) -> Palette {
    use Brightness as B;
    use Saturation as S;
    use Warmth as W;
    match (brightness, saturation, warmth) {
        (B::Dark, S::Vibrant, _) => Palette::NeonCyber,
        (_, S::Vibrant, W::Warm) => Palette::GoldenHour,
        (B::Dark, _, W::Cool) => Palette::MoodyBlue,
        (_, S::Muted, W::Cool) => Palette::Noir,
        (_, S::Muted, W::Warm) => Palette::EarthyNatural,
        (B::Bright, S::Muted, _) => Palette::PastelDream,
        _ => Palette::TealOrange,
    }
}

/// Classify a list of colors. `source` names where they came from and
/// is echoed in the notes.
pub fn style_from_colors(colors: &[Rgb], source: &str) -> StyleDna {
    let brightness = classify_brightness(colors);
    let contrast = classify_contrast(colors);
    let saturation = classify_saturation(colors);
    let warmth = classify_warmth(colors);
    let palette = match_palette(brightness, saturation, warmth);
    let suggested_hdr = contrast == Contrast::High || saturation == Saturation::Vibrant;

    let mut notes = format!(
        "Style from {source}. Palette: {}. Mood: {} lighting with {} contrast.",
        palette.as_str(),
        brightness.as_str(),
        contrast.as_str(),
    );
    if warmth != Warmth::Neutral {
        notes.push_str(&format!(" Color temperature leans {}.", warmth.as_str()));
    }

    StyleDna {
        dominant_colors: colors.iter().take(MAX_DOMINANT_COLORS).copied().collect(),
        palette,
        brightness,
        contrast,
        saturation,
        warmth,
        suggested_hdr,
        suggested_bit_depth: if suggested_hdr { "16bit" } else { "8bit" },
        notes,
    }
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

/// Sample up to [`MAX_DOMINANT_COLORS`] distinct colors from an image.
///
/// The image is shrunk to fit [`SAMPLE_EDGE`], every tenth of its pixels
/// is sampled in row-major order, and near-duplicates are dropped.
pub fn sample_colors(img: &DynamicImage) -> Vec<Rgb> {
    let small = if img.width() > SAMPLE_EDGE || img.height() > SAMPLE_EDGE {
        img.thumbnail(SAMPLE_EDGE, SAMPLE_EDGE)
    } else {
        img.clone()
    };
    let rgb = small.to_rgb8();
    let step = (rgb.width() as usize * rgb.height() as usize / 10).max(1);

    let mut distinct: Vec<Rgb> = Vec::new();
    for pixel in rgb.pixels().step_by(step).take(MAX_SAMPLES) {
        let similar = distinct.iter().any(|seen| {
            let distance: u32 = seen
                .iter()
                .zip(pixel.0.iter())
                .map(|(a, b)| u32::from(a.abs_diff(*b)))
                .sum();
            distance < SIMILAR_COLOR_DISTANCE
        });
        if !similar {
            distinct.push(pixel.0);
        }
    }
    distinct.truncate(MAX_DOMINANT_COLORS);
    distinct
}

/// Extract the style of the image at `path`.
///
/// Returns `None` if the file is missing, corrupt, or in an unsupported
/// format.
pub fn extract_style(path: &Path) -> Option<StyleDna> {
    let img = match image::open(path) {
        Ok(img) => img,
        Err(e) => {
            tracing::error!(
                path = %path.display(),
                error = %e,
                "Failed to read reference image for style extraction",
            );
            return None;
        }
    };
    let source = path
        .file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
    let style = style_from_colors(&sample_colors(&img), &source);
    tracing::info!(
        path = %path.display(),
        palette = style.palette.as_str(),
        hdr = style.suggested_hdr,
        "Extracted reference style",
    );
    Some(style)
}

/// [`extract_style`] on the blocking thread pool, for async callers.
pub async fn extract_style_offloaded(path: PathBuf) -> Option<StyleDna> {
    let path_str = path.display().to_string();
    match tokio::task::spawn_blocking(move || extract_style(&path)).await {
        Ok(style) => style,
        Err(e) => {
            tracing::error!(path = %path_str, error = %e, "Style extraction task failed");
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Parameter mapping
// ---------------------------------------------------------------------------

impl StyleDna {
    /// Map the style onto continuity-map parameters.
    ///
    /// Warmth sets the color temperature; contrast sets fill intensity
    /// inversely, so high-contrast references get a weaker fill light.
    pub fn params(&self) -> StyleParams {
        let temperature_k = match self.warmth {
            Warmth::Warm => 3500,
            Warmth::Neutral => 5500,
            Warmth::Cool => 6500,
        };
        let fill_intensity = match self.contrast {
            Contrast::High => 0.3,
            Contrast::Medium => 0.5,
            Contrast::Low => 0.7,
        };

        let mut global_style = ParamGroup::new();
        global_style.insert("color_palette".into(), json!(self.palette.as_str()));
        global_style.insert("hdr".into(), json!(self.suggested_hdr));
        global_style.insert("bit_depth".into(), json!(self.suggested_bit_depth));

        let mut lighting = ParamGroup::new();
        lighting.insert("temperature_k".into(), json!(temperature_k));
        lighting.insert("fill_intensity".into(), json!(fill_intensity));

        StyleParams {
            global_style,
            lighting,
            notes: self.notes.clone(),
        }
    }
}

/// Copy of `map` with the style's parameters laid over it key by key.
/// `map` is left untouched.
pub fn apply_style(map: &ContinuityMap, params: &StyleParams) -> ContinuityMap {
    let mut styled = map.clone();
    styled.global_style.extend(params.global_style.clone());
    styled.lighting.extend(params.lighting.clone());
    styled
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
