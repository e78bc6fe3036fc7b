//! Asset processing for the forge pipeline
//!
//! Production builds recompress images per format; development builds pass
//! bytes through untouched so outputs stay byte-identical to their inputs.

use std::path::Path;

use forge_common::{ForgeError, Result};

pub mod image_codec;
pub mod svg;

/// Image formats the pipeline optimizes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Png,
    Jpeg,
    Gif,
    Svg,
}

/// Detect the image kind from the file extension
pub fn detect_kind(path: &Path) -> Option<ImageKind> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "png" => Some(ImageKind::Png),
        "jpg" | "jpeg" => Some(ImageKind::Jpeg),
        "gif" => Some(ImageKind::Gif),
        "svg" => Some(ImageKind::Svg),
        _ => None,
    }
}

/// Asset processing options
#[derive(Debug, Clone)]
pub struct AssetOptions {
    /// Recompress images; off in development
    pub optimize: bool,

    /// JPEG re-encode quality
    pub jpeg_quality: u8,
}

impl Default for AssetOptions {
    fn default() -> Self {
        Self {
            optimize: false,
            jpeg_quality: 75,
        }
    }
}

impl AssetOptions {
    /// Options for a production build
    pub fn optimized() -> Self {
        Self {
            optimize: true,
            ..Self::default()
        }
    }
}

/// Asset processor for the image task
pub struct AssetProcessor {
    options: AssetOptions,
}

impl AssetProcessor {
    /// Create a new asset processor
    pub fn new(options: AssetOptions) -> Self {
        Self { options }
    }

    /// Process one image file, returning the bytes to write
    pub fn process(&self, path: &Path) -> Result<Vec<u8>> {
        let kind = detect_kind(path).ok_or_else(|| {
            ForgeError::Image(format!("unsupported image format: {}", path.display()))
        })?;

        if !self.options.optimize {
            return Ok(std::fs::read(path)?);
        }

        tracing::debug!("Optimizing image: {}", path.display());

        match kind {
            ImageKind::Svg => {
                let source = std::fs::read_to_string(path)?;
                Ok(svg::cleanup(&source).into_bytes())
            }
            ImageKind::Jpeg => image_codec::recompress_jpeg(path, self.options.jpeg_quality),
            ImageKind::Png => image_codec::recompress_png(path),
            ImageKind::Gif => image_codec::recompress_gif(path),
        }
    }
}
