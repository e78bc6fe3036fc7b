//! Watch task: rerun tasks when source files change
//!
//! Five independent watches, one per source location. Triggered runs are
//! independent; rapid successive changes may start overlapping runs. A
//! failed rerun is logged and leaves the previous output stale until the
//! next successful one.

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;

use forge_common::{AssetCategory, ForgeConfig};
use forge_dev_server::{FileWatcher, ReloadChannel};

use crate::tasks;

/// What a changed file under one watch root triggers
#[derive(Debug, Clone, Copy)]
enum WatchRoute {
    /// Root HTML changed: reload directly
    Html,
    /// Style sources: rebuild; the task itself hot-swaps via the channel
    Styles,
    /// Script sources: rebuild, then reload
    Scripts,
    /// Image sources: rebuild, then reload
    Images,
    /// Vendor sources: recopy, then reload
    Vendors,
}

impl WatchRoute {
    fn matches(self, path: &Path) -> bool {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match self {
            WatchRoute::Html => ext == "html",
            WatchRoute::Styles => ext == "scss",
            WatchRoute::Scripts => ext == "js",
            WatchRoute::Images => matches!(ext.as_str(), "png" | "jpg" | "jpeg" | "gif" | "svg"),
            WatchRoute::Vendors => true,
        }
    }

    async fn run(self, config: &ForgeConfig, channel: &ReloadChannel) -> Result<()> {
        match self {
            WatchRoute::Html => {
                channel.reload("page sources changed");
                Ok(())
            }
            WatchRoute::Styles => tasks::styles(config, channel).await,
            WatchRoute::Scripts => {
                tasks::scripts(config, channel).await?;
                channel.reload("scripts rebuilt");
                Ok(())
            }
            WatchRoute::Images => {
                tasks::images(config).await?;
                channel.reload("images rebuilt");
                Ok(())
            }
            WatchRoute::Vendors => {
                tasks::vendors(config).await?;
                channel.reload("vendors rebuilt");
                Ok(())
            }
        }
    }
}

/// Keeps the watches and their dispatch loops alive. Dropping the guard
/// stops watching; in practice it lives until process exit.
pub struct WatchGuard {
    _watchers: Vec<FileWatcher>,
    _tasks: Vec<tokio::task::JoinHandle<()>>,
}

/// Register the five source watches.
///
/// A missing source root is skipped with a warning: there is nothing to
/// watch there, and the corresponding task would produce nothing anyway.
pub async fn watch(config: Arc<ForgeConfig>, channel: ReloadChannel) -> Result<WatchGuard> {
    let routes = [
        (config.root.clone(), false, WatchRoute::Html),
        (config.src_base(AssetCategory::Style), true, WatchRoute::Styles),
        (config.src_base(AssetCategory::Script), true, WatchRoute::Scripts),
        (config.src_base(AssetCategory::Image), true, WatchRoute::Images),
        (config.src_base(AssetCategory::Vendor), true, WatchRoute::Vendors),
    ];

    let mut watchers = Vec::new();
    let mut dispatchers = Vec::new();

    for (root, recursive, route) in routes {
        if !root.exists() {
            tracing::warn!("watch: {} does not exist, skipping", root.display());
            continue;
        }

        let watcher = FileWatcher::new(&root, recursive)?;
        let mut rx = watcher.subscribe();
        let config = config.clone();
        let channel = channel.clone();

        dispatchers.push(tokio::spawn(async move {
            while let Ok(path) = rx.recv().await {
                if !route.matches(&path) {
                    continue;
                }
                tracing::info!("File changed: {}", path.display());
                if let Err(e) = route.run(&config, &channel).await {
                    tracing::error!("Rerun after change failed: {:#}", e);
                }
            }
        }));
        watchers.push(watcher);
    }

    tracing::info!("watch: {} watch(es) active", watchers.len());
    Ok(WatchGuard {
        _watchers: watchers,
        _tasks: dispatchers,
    })
}
