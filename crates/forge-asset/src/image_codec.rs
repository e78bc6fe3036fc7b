//! Per-format image recompression
//!
//! JPEG is re-encoded lossily at a fixed quality; PNG and GIF re-encodes are
//! lossless. Format and dimensions are always preserved.

use std::path::Path;

use image::codecs::gif::GifEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};

use forge_common::{ForgeError, Result};

fn open(path: &Path) -> Result<image::DynamicImage> {
    image::open(path).map_err(|e| ForgeError::Image(format!("{}: {}", path.display(), e)))
}

/// Re-encode a JPEG at the configured quality
pub fn recompress_jpeg(path: &Path, quality: u8) -> Result<Vec<u8>> {
    let img = open(path)?;
    let mut buf = Vec::new();

    let encoder = JpegEncoder::new_with_quality(&mut buf, quality);
    // JPEG carries no alpha channel
    img.to_rgb8()
        .write_with_encoder(encoder)
        .map_err(|e| ForgeError::Image(format!("{}: {}", path.display(), e)))?;

    Ok(buf)
}

/// Re-encode a PNG at best compression with adaptive filtering
pub fn recompress_png(path: &Path) -> Result<Vec<u8>> {
    let img = open(path)?;
    let mut buf = Vec::new();

    let encoder = PngEncoder::new_with_quality(&mut buf, CompressionType::Best, FilterType::Adaptive);
    img.write_with_encoder(encoder)
        .map_err(|e| ForgeError::Image(format!("{}: {}", path.display(), e)))?;

    Ok(buf)
}

/// Losslessly re-encode a GIF (first frame; the fixed asset tree holds
/// static images only)
pub fn recompress_gif(path: &Path) -> Result<Vec<u8>> {
    let img = open(path)?;
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut buf = Vec::new();
    {
        let mut encoder = GifEncoder::new(&mut buf);
        encoder
            .encode(rgba.as_raw(), width, height, image::ExtendedColorType::Rgba8)
            .map_err(|e| ForgeError::Image(format!("{}: {}", path.display(), e)))?;
    }

    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};

    fn write_test_png(path: &Path, w: u32, h: u32) {
        let img = ImageBuffer::from_fn(w, h, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, 128u8])
        });
        img.save(path).unwrap();
    }

    #[test]
    fn test_png_roundtrip_preserves_dimensions() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("a.png");
        write_test_png(&path, 16, 9);

        let out = recompress_png(&path).unwrap();
        let reread = image::load_from_memory(&out).unwrap();
        assert_eq!(reread.width(), 16);
        assert_eq!(reread.height(), 9);
    }

    #[test]
    fn test_jpeg_output_is_jpeg() {
        let tmp = tempfile::TempDir::new().unwrap();
        let png_path = tmp.path().join("a.png");
        write_test_png(&png_path, 8, 8);
        let jpg_path = tmp.path().join("a.jpg");
        image::open(&png_path)
            .unwrap()
            .to_rgb8()
            .save(&jpg_path)
            .unwrap();

        let out = recompress_jpeg(&jpg_path, 75).unwrap();
        let format = image::guess_format(&out).unwrap();
        assert_eq!(format, image::ImageFormat::Jpeg);
    }

    #[test]
    fn test_gif_output_is_gif() {
        let tmp = tempfile::TempDir::new().unwrap();
        let png_path = tmp.path().join("a.png");
        write_test_png(&png_path, 4, 4);
        let gif_path = tmp.path().join("a.gif");
        image::open(&png_path).unwrap().save(&gif_path).unwrap();

        let out = recompress_gif(&gif_path).unwrap();
        let format = image::guess_format(&out).unwrap();
        assert_eq!(format, image::ImageFormat::Gif);
    }
}
