//! Image task: recompress in production, pass through in development

use anyhow::{Context, Result};

use forge_asset::{AssetOptions, AssetProcessor};
use forge_common::{AssetCategory, ForgeConfig};

use crate::sources;

/// Process the image tree into `dist/img`, preserving relative paths.
pub async fn images(config: &ForgeConfig) -> Result<()> {
    let options = if config.mode.is_production() {
        AssetOptions::optimized()
    } else {
        AssetOptions::default()
    };
    let processor = AssetProcessor::new(options);

    let inputs = sources::resolve(&config.src_pattern(AssetCategory::Image))?;
    let base = config.src_base(AssetCategory::Image);
    let dest = config.dest_dir(AssetCategory::Image);
    std::fs::create_dir_all(&dest)
        .with_context(|| format!("creating {}", dest.display()))?;

    for input in &inputs {
        let bytes = processor.process(input)?;

        let rel = input.strip_prefix(&base).unwrap_or(input.as_path());
        let out_path = dest.join(rel);
        if let Some(parent) = out_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&out_path, bytes)
            .with_context(|| format!("writing {}", out_path.display()))?;
    }

    tracing::info!(
        "images: {} file(s) written to {}",
        inputs.len(),
        dest.display()
    );
    Ok(())
}
