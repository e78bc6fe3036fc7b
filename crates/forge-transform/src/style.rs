//! Style pipeline: SCSS compilation, vendor prefixing, minification
//!
//! Compilation is handled by grass; prefixing, minification and source maps
//! by lightningcss with a legacy IE 8 compatibility target.

use std::path::Path;

use lightningcss::stylesheet::{MinifyOptions, ParserOptions, PrinterOptions, StyleSheet};
use lightningcss::targets::{Browsers, Targets};

use forge_common::{ForgeError, Result};

use crate::TransformOptions;

/// Transformed stylesheet
#[derive(Debug, Clone)]
pub struct StyleOutput {
    /// CSS text, prefixed and (in production) minified
    pub code: String,

    /// Source map JSON (development only)
    pub source_map: Option<String>,
}

/// Compatibility baseline for prefixing and minification
fn legacy_targets() -> Targets {
    Targets::from(Browsers {
        // Version numbers are encoded as major << 16 | minor << 8 | patch
        ie: Some(8 << 16),
        ..Browsers::default()
    })
}

/// Compile one SCSS file and run it through the CSS pipeline.
///
/// A compile error is reported as [`ForgeError::StyleCompile`], which the
/// style task treats as recoverable: the file is skipped, the task goes on.
pub fn compile_style(
    path: &Path,
    load_path: &Path,
    options: &TransformOptions,
) -> Result<StyleOutput> {
    tracing::debug!("Compiling style source: {}", path.display());

    let grass_options = grass::Options::default()
        .style(grass::OutputStyle::Expanded)
        .load_path(load_path);

    let css = grass::from_path(path, &grass_options).map_err(|e| ForgeError::StyleCompile {
        file: path.display().to_string(),
        message: e.to_string(),
    })?;

    transform_css(&css, &path.display().to_string(), options)
}

/// Prefix and optionally minify a CSS source.
///
/// Used both as the back half of [`compile_style`] and directly by the
/// plain-CSS task in production mode.
pub fn transform_css(source: &str, filename: &str, options: &TransformOptions) -> Result<StyleOutput> {
    let mut stylesheet = StyleSheet::parse(
        source,
        ParserOptions {
            filename: filename.to_string(),
            ..ParserOptions::default()
        },
    )
    .map_err(|e| ForgeError::CssTransform(e.to_string()))?;

    // Applies the compat transforms, including vendor prefix expansion,
    // for the configured targets. Runs in both modes.
    stylesheet
        .minify(MinifyOptions {
            targets: legacy_targets(),
            ..MinifyOptions::default()
        })
        .map_err(|e| ForgeError::CssTransform(e.to_string()))?;

    let mut source_map = if options.source_maps {
        let mut map = parcel_sourcemap::SourceMap::new("/");
        map.add_source(filename);
        map.set_source_content(0, source)
            .map_err(|e| ForgeError::CssTransform(e.to_string()))?;
        Some(map)
    } else {
        None
    };

    let output = stylesheet
        .to_css(PrinterOptions {
            minify: options.mode.is_production(),
            source_map: source_map.as_mut(),
            targets: legacy_targets(),
            ..PrinterOptions::default()
        })
        .map_err(|e| ForgeError::CssTransform(e.to_string()))?;

    let source_map = match source_map.as_mut() {
        Some(map) => Some(
            map.to_json(None)
                .map_err(|e| ForgeError::CssTransform(e.to_string()))?,
        ),
        None => None,
    };

    Ok(StyleOutput {
        code: output.code,
        source_map,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use forge_common::BuildMode;

    fn dev() -> TransformOptions {
        TransformOptions::for_mode(BuildMode::Development)
    }

    fn prod() -> TransformOptions {
        TransformOptions::for_mode(BuildMode::Production)
    }

    #[test]
    fn test_compile_style_basic() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("a.scss");
        std::fs::write(&path, "$c: red;\nbody { color: $c; }\n").unwrap();

        let output = compile_style(&path, tmp.path(), &dev()).unwrap();
        assert!(output.code.contains("color: red"));
        assert!(output.source_map.is_some());
    }

    #[test]
    fn test_compile_style_error_is_recoverable() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("b.scss");
        std::fs::write(&path, "body { color: ; }").unwrap();

        let err = compile_style(&path, tmp.path(), &dev()).unwrap_err();
        assert!(err.is_recoverable());
        assert!(err.to_string().contains("b.scss"));
    }

    #[test]
    fn test_compile_style_resolves_partials() {
        let tmp = tempfile::TempDir::new().unwrap();
        std::fs::write(tmp.path().join("_vars.scss"), "$accent: #00f;\n").unwrap();
        let path = tmp.path().join("main.scss");
        std::fs::write(&path, "@use \"vars\";\na { color: vars.$accent; }\n").unwrap();

        let output = compile_style(&path, tmp.path(), &dev()).unwrap();
        assert!(output.code.contains("#00f"));
    }

    #[test]
    fn test_production_minifies() {
        let source = "body {\n  color: red;\n  margin: 0px;\n}\n";
        let minified = transform_css(source, "app.css", &prod()).unwrap();
        let expanded = transform_css(source, "app.css", &dev()).unwrap();

        assert!(minified.code.len() <= source.len());
        assert!(!minified.code.contains('\n'));
        assert!(minified.source_map.is_none());
        assert!(expanded.code.len() >= minified.code.len());
    }

    #[test]
    fn test_dev_source_map_is_valid_json() {
        let output = transform_css("a { color: red; }", "a.scss", &dev()).unwrap();
        let map: serde_json::Value =
            serde_json::from_str(&output.source_map.unwrap()).unwrap();
        assert_eq!(map["version"], 3);
    }
}
