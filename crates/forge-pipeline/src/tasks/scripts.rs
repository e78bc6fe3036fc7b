//! Script task: transpile, concatenate, minify or map, publish

use anyhow::{Context, Result};

use forge_common::{AssetCategory, ForgeConfig};
use forge_dev_server::ReloadChannel;
use forge_transform::{minify_script, transpile_script, SourceMapBuilder};

use crate::sources;
use crate::tasks::display_rel;

/// Bundle the script sources into `dist/js/app.js` in glob-match order.
pub async fn scripts(config: &ForgeConfig, channel: &ReloadChannel) -> Result<()> {
    let inputs = sources::resolve(&config.src_pattern(AssetCategory::Script))?;
    let dest = config.dest_dir(AssetCategory::Script);
    std::fs::create_dir_all(&dest)
        .with_context(|| format!("creating {}", dest.display()))?;

    let mut builder = SourceMapBuilder::new("app.js");
    let mut lines: Vec<String> = Vec::new();

    for input in &inputs {
        let source = std::fs::read_to_string(input)
            .with_context(|| format!("reading {}", input.display()))?;
        let transpiled = transpile_script(&source, input)?;

        // The downlevel rewrites never add or remove lines, so a
        // line-granular map stays accurate
        let src = builder.add_source(&display_rel(input, &config.root), &source);
        for (i, line) in transpiled.lines().enumerate() {
            builder.push_line(src, i);
            lines.push(line.to_string());
        }
    }

    let out_path = dest.join("app.js");
    let mut bundle = lines.join("\n");
    bundle.push('\n');

    if config.mode.is_production() {
        let minified = minify_script(&bundle)?;
        std::fs::write(&out_path, minified)
            .with_context(|| format!("writing {}", out_path.display()))?;
    } else {
        bundle.push_str(&format!(
            "//# sourceMappingURL={}\n",
            forge_transform::to_data_uri(&builder.build())
        ));
        std::fs::write(&out_path, bundle)
            .with_context(|| format!("writing {}", out_path.display()))?;
    }

    tracing::info!(
        "scripts: bundled {} file(s) into {}",
        inputs.len(),
        out_path.display()
    );
    channel.stream(vec![display_rel(&out_path, &config.root)]);
    Ok(())
}
