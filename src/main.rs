use tracing_subscriber::{EnvFilter, fmt};
use tracing::info;

use cookie_realm::config::{ServerConfig, ENV_HTTP_PORT, ENV_REALMS};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Init logging
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))?;
    fmt().with_env_filter(filter).init();

    let config = ServerConfig::from_env()?;
    let rust_log = std::env::var("RUST_LOG").unwrap_or_else(|_| "<unset>".to_string());
    info!(
        target: "startup",
        "cookie-realm starting: RUST_LOG='{}', {}={}, {}={:?}",
        rust_log, ENV_HTTP_PORT, config.http_port, ENV_REALMS, config.realms_path
    );

    cookie_realm::server::run(config).await
}
