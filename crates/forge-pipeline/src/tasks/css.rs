//! Plain-CSS task: minify in production, concatenate, rename with `.min`

use anyhow::{Context, Result};

use forge_common::{AssetCategory, ForgeConfig};
use forge_transform::{transform_css, TransformOptions};

use crate::sources;

/// Bundle the plain CSS sources into `dist/css/app.min.css`.
///
/// Unlike the style task this one does not publish to the reload channel;
/// the asymmetry is part of the pipeline's contract.
pub async fn css(config: &ForgeConfig) -> Result<()> {
    let inputs = sources::resolve(&config.src_pattern(AssetCategory::Css))?;
    let dest = config.dest_dir(AssetCategory::Css);
    std::fs::create_dir_all(&dest)
        .with_context(|| format!("creating {}", dest.display()))?;

    let options = TransformOptions {
        mode: config.mode,
        source_maps: false,
    };

    let mut bundle = String::new();
    for input in &inputs {
        let source = std::fs::read_to_string(input)
            .with_context(|| format!("reading {}", input.display()))?;

        let chunk = if config.mode.is_production() {
            transform_css(&source, &input.display().to_string(), &options)?.code
        } else {
            source
        };

        bundle.push_str(&chunk);
        if !bundle.ends_with('\n') {
            bundle.push('\n');
        }
    }

    // Concatenated as app.css, then renamed with the .min suffix
    let out_path = dest.join("app.min.css");
    std::fs::write(&out_path, bundle)
        .with_context(|| format!("writing {}", out_path.display()))?;

    tracing::info!(
        "css: bundled {} file(s) into {}",
        inputs.len(),
        out_path.display()
    );
    Ok(())
}
