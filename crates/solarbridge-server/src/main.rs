use solarbridge_server::config::ServerConfig;
use solarbridge_server::{server, telemetry};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let config = ServerConfig::from_env();

    // Logging comes up even when the config is bad, so the error is logged.
    telemetry::init_tracing(config.as_ref().map(|c| c.log_format).unwrap_or_default());

    let config = config.inspect_err(|e| {
        tracing::error!(error = %e, "invalid configuration");
    })?;

    server::run(config).await.inspect_err(|e| {
        tracing::error!(error = %e, "server exited with error");
    })
}
