//! File watcher for detecting source changes

use std::path::{Path, PathBuf};

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::broadcast;

use forge_common::{ForgeError, Result};

/// One filesystem watch rooted at a source location
pub struct FileWatcher {
    _watcher: RecommendedWatcher,
    tx: broadcast::Sender<PathBuf>,
}

impl FileWatcher {
    /// Watch `root`, forwarding changed paths to subscribers
    pub fn new(root: &Path, recursive: bool) -> Result<Self> {
        let (tx, _) = broadcast::channel(100);
        let tx_clone = tx.clone();

        let mut watcher =
            notify::recommended_watcher(move |res: std::result::Result<Event, notify::Error>| {
                if let Ok(event) = res {
                    // Access events fire constantly on some platforms
                    if !matches!(
                        event.kind,
                        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
                    ) {
                        return;
                    }
                    for path in event.paths {
                        let _ = tx_clone.send(path);
                    }
                }
            })
            .map_err(|e| ForgeError::Watch(e.to_string()))?;

        let mode = if recursive {
            RecursiveMode::Recursive
        } else {
            RecursiveMode::NonRecursive
        };
        watcher
            .watch(root, mode)
            .map_err(|e| ForgeError::Watch(format!("{}: {}", root.display(), e)))?;

        tracing::debug!("Watching {} (recursive: {})", root.display(), recursive);

        Ok(Self {
            _watcher: watcher,
            tx,
        })
    }

    /// Subscribe to file change events
    pub fn subscribe(&self) -> broadcast::Receiver<PathBuf> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_watcher_reports_writes() {
        let tmp = tempfile::TempDir::new().unwrap();
        let watcher = FileWatcher::new(tmp.path(), true).unwrap();
        let mut rx = watcher.subscribe();

        // Give the backend a moment to arm before writing
        tokio::time::sleep(Duration::from_millis(200)).await;
        std::fs::write(tmp.path().join("a.scss"), "a {}").unwrap();

        let changed = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("no event within timeout")
            .unwrap();
        assert_eq!(changed.file_name().unwrap(), "a.scss");
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let missing = tmp.path().join("nope");
        assert!(FileWatcher::new(&missing, true).is_err());
    }
}
