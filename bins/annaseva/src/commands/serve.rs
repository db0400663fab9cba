//! Serve command

use annaseva_core::config::ConfigSchema;
use annaseva_core::{Error, ResultExt};
use anyhow::Result;
use tracing::info;

/// Run the HTTP API until interrupted.
pub async fn run(mut schema: ConfigSchema, host: Option<String>, port: Option<u16>) -> Result<()> {
    if let Some(host) = host {
        schema.server.host = host;
    }
    if let Some(port) = port {
        schema.server.port = port;
    }

    info!(
        host = %schema.server.host,
        port = schema.server.port,
        remote_providers = schema.providers.remote_enabled,
        "Starting Anna Seva API"
    );

    annaseva_server::start_server(schema)
        .await
        .map_err(Error::from)
        .context("Running the HTTP API")?;
    Ok(())
}
