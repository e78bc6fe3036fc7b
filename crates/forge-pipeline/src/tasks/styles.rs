//! Style task: compile SCSS, prefix, minify or map, publish to the channel

use anyhow::{Context, Result};

use forge_common::{AssetCategory, ForgeConfig};
use forge_dev_server::ReloadChannel;
use forge_transform::{compile_style, TransformOptions};

use crate::sources;
use crate::tasks::display_rel;

/// Compile the style source tree into `dist/css`.
///
/// A file that fails to compile is logged and skipped; the rest of the set
/// still flows through. Written outputs are published to the reload channel
/// so connected clients hot-swap styles without a full page reload.
pub async fn styles(config: &ForgeConfig, channel: &ReloadChannel) -> Result<()> {
    let options = TransformOptions::for_mode(config.mode);
    let base = config.src_base(AssetCategory::Style);
    let dest = config.dest_dir(AssetCategory::Style);

    let inputs: Vec<_> = sources::resolve(&config.src_pattern(AssetCategory::Style))?
        .into_iter()
        .filter(|p| !sources::is_style_partial(p))
        .collect();

    std::fs::create_dir_all(&dest)
        .with_context(|| format!("creating {}", dest.display()))?;

    let mut written = Vec::new();
    for input in &inputs {
        let output = match compile_style(input, &base, &options) {
            Ok(output) => output,
            Err(e) if e.is_recoverable() => {
                tracing::error!("{}", e);
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        let rel = input
            .strip_prefix(&base)
            .unwrap_or(input.as_path())
            .with_extension("css");
        let out_path = dest.join(&rel);
        if let Some(parent) = out_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut code = output.code;
        if let Some(map) = output.source_map {
            // Inline map, the same shape the original pipeline emitted
            code.push_str(&format!(
                "\n/*# sourceMappingURL={} */\n",
                forge_transform::to_data_uri(&map)
            ));
        }
        std::fs::write(&out_path, code)
            .with_context(|| format!("writing {}", out_path.display()))?;

        written.push(display_rel(&out_path, &config.root));
    }

    tracing::info!(
        "styles: {} of {} file(s) written to {}",
        written.len(),
        inputs.len(),
        dest.display()
    );
    channel.stream(written);
    Ok(())
}
