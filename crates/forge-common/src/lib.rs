//! Common types for forge
//!
//! This crate provides the error type, build mode, and path/server
//! configuration shared by every pipeline crate.

pub mod config;
pub mod error;

pub use config::{AssetCategory, BuildMode, ForgeConfig, PathSpec, Paths, ServerConfig};
pub use error::{ForgeError, Result};
