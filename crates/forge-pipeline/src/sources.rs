//! Source file discovery
//!
//! Resolves the configured glob patterns to sorted file lists. The glob
//! matcher has no brace alternation, so `{png,jpg}` groups are expanded
//! before matching.

use std::path::PathBuf;

use forge_common::{ForgeError, Result};

/// Expand one level of `{a,b,c}` alternation into plain glob patterns
pub fn expand_braces(pattern: &str) -> Vec<String> {
    let (open, close) = match (pattern.find('{'), pattern.find('}')) {
        (Some(open), Some(close)) if open < close => (open, close),
        _ => return vec![pattern.to_string()],
    };

    let prefix = &pattern[..open];
    let body = &pattern[open + 1..close];
    let suffix = &pattern[close + 1..];

    body.split(',')
        .flat_map(|alt| expand_braces(&format!("{}{}{}", prefix, alt, suffix)))
        .collect()
}

/// Resolve a glob pattern to the matching files in glob-match order
pub fn resolve(pattern: &str) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();

    for expanded in expand_braces(pattern) {
        let matches = glob::glob(&expanded).map_err(|e| ForgeError::Pattern {
            pattern: expanded.clone(),
            message: e.to_string(),
        })?;

        for entry in matches {
            match entry {
                Ok(path) if path.is_file() => paths.push(path),
                Ok(_) => {}
                Err(e) => return Err(ForgeError::Io(e.into_error())),
            }
        }
    }

    paths.sort();
    paths.dedup();
    Ok(paths)
}

/// Style sources whose basename starts with `_` are partials: they compile
/// only through `@use`/`@import`, never standalone
pub fn is_style_partial(path: &std::path::Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.starts_with('_'))
        .unwrap_or(false)
}
