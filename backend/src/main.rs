//! Backend entry-point: wires configuration, persistence, and the HTTP server.

use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use userdir::server::{self, ServerConfig};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let config = ServerConfig::from_env().map_err(std::io::Error::other)?;
    info!(
        environment = config.environment(),
        address = %config.bind_addr(),
        "starting user directory backend"
    );

    let state = server::build_state(&config).await?;
    server::create_server(&config, state)?.await
}
