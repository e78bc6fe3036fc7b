//! The pipeline tasks
//!
//! Each task is an independently invocable unit with no state retained
//! between runs. Build mode and paths arrive through [`ForgeConfig`]; tasks
//! that notify browsers take the reload channel as an explicit parameter.

use std::path::Path;

mod clean;
mod css;
mod images;
mod scripts;
mod serve;
mod styles;
mod vendors;
pub mod watch;

pub use clean::clean;
pub use css::css;
pub use images::images;
pub use scripts::scripts;
pub use serve::serve;
pub use styles::styles;
pub use vendors::vendors;
pub use watch::{watch, WatchGuard};

/// Path relative to the project root, with forward slashes, for logs and
/// reload-channel payloads
pub(crate) fn display_rel(path: &Path, root: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.display().to_string().replace('\\', "/")
}
