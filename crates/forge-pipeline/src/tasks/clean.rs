//! Clean task: remove the output tree

use anyhow::Result;

use forge_common::ForgeConfig;

/// Delete `dist/` recursively. A missing directory is success, so the task
/// is idempotent.
pub async fn clean(config: &ForgeConfig) -> Result<()> {
    let dist = config.dist_dir();

    match std::fs::remove_dir_all(&dist) {
        Ok(()) => {
            tracing::info!("clean: removed {}", dist.display());
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("clean: {} already absent", dist.display());
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
