//! forge - static asset pipeline CLI
//!
//! Usage:
//!   forge                       Clean, build, serve and watch (default)
//!   forge scss                  Compile the style tree
//!   forge css                   Bundle the plain CSS sources
//!   forge js                    Transpile and bundle the scripts
//!   forge images                Process the image tree
//!   forge vendors               Copy vendor assets
//!   forge clean-dist            Remove the output directory
//!   forge serve                 Start the dev server
//!   forge watch                 Watch sources and rerun tasks
//!
//!   forge --prod [task]         Production mode: minified, compressed,
//!                               map-free output
//!   forge --root ./site [task]  Run against another project root

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use forge_common::{BuildMode, ForgeConfig};
use forge_pipeline::{Runner, Task, TaskGraph};

#[derive(Parser)]
#[command(name = "forge")]
#[command(about = "Static asset pipeline: build, serve, watch", long_about = None)]
#[command(version)]
struct Cli {
    /// Production mode: minify and compress, skip source maps
    #[arg(long, global = true)]
    prod: bool,

    /// Project root directory
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    /// Config file path, relative to the project root unless absolute
    #[arg(long, global = true, default_value = "forge.toml")]
    config: PathBuf,

    /// Log level when RUST_LOG is not set
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Override the configured server host
    #[arg(long, global = true)]
    host: Option<String>,

    /// Override the configured server port
    #[arg(long, global = true)]
    port: Option<u16>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile SCSS with prefixing and minification or source maps
    Scss,
    /// Bundle plain CSS into app.min.css
    Css,
    /// Transpile and bundle scripts into app.js
    Js,
    /// Copy images, recompressing in production
    Images,
    /// Copy vendor assets verbatim
    Vendors,
    /// Remove the output directory
    #[command(name = "clean-dist", alias = "cleanDist")]
    CleanDist,
    /// Start the static server with live reload
    Serve,
    /// Watch sources and rerun tasks on change
    Watch,
    /// Clean, build everything, serve and watch (the default)
    Dev,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let mode = BuildMode::from_prod_flag(cli.prod);
    let mut config = ForgeConfig::load(cli.root, mode, &cli.config)?;
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    let command = cli.command.unwrap_or(Commands::Dev);
    let (graph, stay_resident) = match command {
        Commands::Scss => (TaskGraph::single(Task::Styles), false),
        Commands::Css => (TaskGraph::single(Task::Css), false),
        Commands::Js => (TaskGraph::single(Task::Scripts), false),
        Commands::Images => (TaskGraph::single(Task::Images), false),
        Commands::Vendors => (TaskGraph::single(Task::Vendors), false),
        Commands::CleanDist => (TaskGraph::single(Task::Clean), false),
        Commands::Serve => (TaskGraph::single(Task::Serve), true),
        Commands::Watch => (TaskGraph::single(Task::Watch), true),
        Commands::Dev => (TaskGraph::dev(), true),
    };

    let mut runner = Runner::new(config);
    runner.run(&graph).await?;

    if stay_resident {
        // The server and the watches live until the process exits
        tokio::signal::ctrl_c().await?;
        tracing::info!("Shutting down");
    }

    Ok(())
}

/// Initialize logging based on log level
fn init_logging(level: &str) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .try_init()
        .ok(); // Ignore error if already initialized
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parses() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_default_is_dev() {
        let cli = Cli::parse_from(["forge"]);
        assert!(cli.command.is_none());
        assert!(!cli.prod);
    }

    #[test]
    fn test_prod_flag_with_task() {
        let cli = Cli::parse_from(["forge", "--prod", "scss"]);
        assert!(cli.prod);
        assert!(matches!(cli.command, Some(Commands::Scss)));
    }

    #[test]
    fn test_clean_dist_alias() {
        let cli = Cli::parse_from(["forge", "cleanDist"]);
        assert!(matches!(cli.command, Some(Commands::CleanDist)));
    }
}
