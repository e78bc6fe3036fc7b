//! Serve task: start the dev server wired to the reload channel

use std::net::SocketAddr;

use anyhow::Result;

use forge_common::ForgeConfig;
use forge_dev_server::{DevServer, ReloadChannel};

/// Start the static server over the project root. Returns the bound address
/// once the server is listening; the accept loop runs in the background for
/// the rest of the process lifetime.
pub async fn serve(config: &ForgeConfig, channel: &ReloadChannel) -> Result<SocketAddr> {
    let server = DevServer::new(
        config.root.clone(),
        config.server.clone(),
        channel.clone(),
    );
    Ok(server.start().await?)
}
