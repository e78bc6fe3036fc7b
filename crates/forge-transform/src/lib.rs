//! Source transforms for the forge pipeline
//!
//! Style sources go through SCSS compilation, vendor prefixing and optional
//! minification; script sources go through a legacy-baseline transpile and an
//! optional token-level minifier. Development builds carry source maps,
//! production builds do not.

use forge_common::BuildMode;

pub mod script;
pub mod sourcemap;
pub mod style;

pub use script::{minify_script, transpile_script};
pub use sourcemap::{to_data_uri, SourceMapBuilder};
pub use style::{compile_style, transform_css, StyleOutput};

/// Transform options threaded through both pipelines
#[derive(Debug, Clone, Copy)]
pub struct TransformOptions {
    /// Build mode for the whole process lifetime
    pub mode: BuildMode,

    /// Enable source maps
    pub source_maps: bool,
}

impl TransformOptions {
    /// Derive the options a build mode implies: production minifies,
    /// development emits source maps.
    pub fn for_mode(mode: BuildMode) -> Self {
        Self {
            mode,
            source_maps: !mode.is_production(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_for_mode() {
        let dev = TransformOptions::for_mode(BuildMode::Development);
        assert!(dev.source_maps);

        let prod = TransformOptions::for_mode(BuildMode::Production);
        assert!(!prod.source_maps);
    }
}
