//! Vendor-copy task: third-party assets are copied verbatim

use anyhow::{Context, Result};

use forge_common::{AssetCategory, ForgeConfig};

/// Copy the vendor tree to `dist/vendors` without transformation.
pub async fn vendors(config: &ForgeConfig) -> Result<()> {
    let base = config.src_base(AssetCategory::Vendor);
    let dest = config.dest_dir(AssetCategory::Vendor);

    if !base.exists() {
        tracing::debug!("No vendor tree at {}", base.display());
        return Ok(());
    }

    std::fs::create_dir_all(&dest)
        .with_context(|| format!("creating {}", dest.display()))?;

    let mut copied = 0usize;
    for entry in walkdir::WalkDir::new(&base) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        // `**/*.*` semantics: only names carrying an extension are copied
        if entry.path().extension().is_none() {
            continue;
        }

        let rel = entry.path().strip_prefix(&base)?;
        let out_path = dest.join(rel);
        if let Some(parent) = out_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::copy(entry.path(), &out_path)
            .with_context(|| format!("copying {}", entry.path().display()))?;
        copied += 1;
    }

    tracing::info!("vendors: copied {} file(s) to {}", copied, dest.display());
    Ok(())
}
