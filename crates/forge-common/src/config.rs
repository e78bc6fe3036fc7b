//! Pipeline configuration
//!
//! All configuration is constructed once at startup and passed by reference
//! into every task. There is no ambient global state: the build mode, the
//! path table, and the server settings all travel inside [`ForgeConfig`].

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::Result;

/// Build variant selected at process start, immutable afterwards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildMode {
    /// Debuggability: source maps, unminified output, live reload
    Development,
    /// Minified, compressed, map-free output
    Production,
}

impl BuildMode {
    pub fn is_production(self) -> bool {
        matches!(self, BuildMode::Production)
    }

    /// Derive the mode from the `--prod` CLI switch
    pub fn from_prod_flag(prod: bool) -> Self {
        if prod {
            BuildMode::Production
        } else {
            BuildMode::Development
        }
    }
}

/// One asset category: a source glob and a destination directory,
/// both relative to the project root
#[derive(Debug, Clone)]
pub struct PathSpec {
    /// Source glob pattern, e.g. `src/scss/**/*.scss`
    pub src: String,

    /// Destination directory, e.g. `dist/css`
    pub dest: PathBuf,
}

impl PathSpec {
    fn new(src: &str, dest: &str) -> Self {
        Self {
            src: src.to_string(),
            dest: PathBuf::from(dest),
        }
    }
}

/// The five asset categories the pipeline knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetCategory {
    Style,
    Css,
    Script,
    Image,
    Vendor,
}

/// Fixed mapping from asset categories to source globs and output
/// directories. Read once at startup; immutable thereafter.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Output root, removed wholesale by the clean task
    pub dist: PathBuf,

    /// Glob for the HTML files served from the project root
    pub html: String,

    pub styles: PathSpec,
    pub css: PathSpec,
    pub scripts: PathSpec,
    pub images: PathSpec,
    pub vendors: PathSpec,
}

impl Default for Paths {
    fn default() -> Self {
        Self {
            dist: PathBuf::from("dist"),
            html: "*.html".to_string(),
            styles: PathSpec::new("src/scss/**/*.scss", "dist/css"),
            css: PathSpec::new("src/css/**/*.css", "dist/css"),
            scripts: PathSpec::new("src/js/*.js", "dist/js"),
            images: PathSpec::new("src/img/**/*.{png,jpg,gif,svg}", "dist/img"),
            vendors: PathSpec::new("src/vendors/**/*.*", "dist/vendors"),
        }
    }
}

impl Paths {
    pub fn spec(&self, category: AssetCategory) -> &PathSpec {
        match category {
            AssetCategory::Style => &self.styles,
            AssetCategory::Css => &self.css,
            AssetCategory::Script => &self.scripts,
            AssetCategory::Image => &self.images,
            AssetCategory::Vendor => &self.vendors,
        }
    }
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

/// Optional `forge.toml` overlay applied on top of the defaults
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    server: ServerSection,
}

#[derive(Debug, Default, Deserialize)]
struct ServerSection {
    host: Option<String>,
    port: Option<u16>,
}

/// Complete pipeline configuration, constructed once at startup
#[derive(Debug, Clone)]
pub struct ForgeConfig {
    /// Project root; source globs and output dirs resolve against it
    pub root: PathBuf,

    /// Build mode for the whole process lifetime
    pub mode: BuildMode,

    pub paths: Paths,
    pub server: ServerConfig,
}

impl ForgeConfig {
    /// Build a configuration from the CLI inputs, overlaying an optional
    /// `forge.toml`. A missing config file is not an error.
    pub fn load(root: impl Into<PathBuf>, mode: BuildMode, config_file: &Path) -> Result<Self> {
        let root = root.into();
        let mut config = Self {
            root,
            mode,
            paths: Paths::default(),
            server: ServerConfig::default(),
        };

        let file_path = if config_file.is_absolute() {
            config_file.to_path_buf()
        } else {
            config.root.join(config_file)
        };

        match std::fs::read_to_string(&file_path) {
            Ok(raw) => {
                let overlay: ConfigFile = toml::from_str(&raw)?;
                if let Some(host) = overlay.server.host {
                    config.server.host = host;
                }
                if let Some(port) = overlay.server.port {
                    config.server.port = port;
                }
                tracing::debug!("Loaded config overlay from {}", file_path.display());
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No config file at {}, using defaults", file_path.display());
            }
            Err(e) => return Err(e.into()),
        }

        Ok(config)
    }

    /// Source glob for a category, resolved against the project root
    pub fn src_pattern(&self, category: AssetCategory) -> String {
        self.root
            .join(&self.paths.spec(category).src)
            .to_string_lossy()
            .to_string()
    }

    /// Destination directory for a category, resolved against the project root
    pub fn dest_dir(&self, category: AssetCategory) -> PathBuf {
        self.root.join(&self.paths.spec(category).dest)
    }

    /// Source directory a category's glob is anchored at; relative output
    /// paths are computed against this base
    pub fn src_base(&self, category: AssetCategory) -> PathBuf {
        let pattern = &self.paths.spec(category).src;
        let base: PathBuf = Path::new(pattern)
            .components()
            .take_while(|c| {
                let s = c.as_os_str().to_string_lossy();
                !s.contains('*') && !s.contains('{')
            })
            .collect();
        self.root.join(base)
    }

    /// Output root resolved against the project root
    pub fn dist_dir(&self) -> PathBuf {
        self.root.join(&self.paths.dist)
    }
}
