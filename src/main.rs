use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;

use prompt_relay::config::{Cli, Config};
use prompt_relay::server::relay_api::{build_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments.
    let cli = Cli::parse();

    // Initialize tracing/logging.
    let filter = if cli.verbose {
        "prompt_relay=debug,tower_http=debug"
    } else {
        "prompt_relay=info,tower_http=info"
    };

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| filter.into());

    if cli.json_logs {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    }

    info!("prompt-relay v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration.
    let mut config = Config::load(&cli.config)?;
    if let Some(listen) = cli.listen {
        config.server.listen = listen;
    }
    let config = Arc::new(config);

    info!(
        upstream = %config.upstream.responses_url(),
        model = %config.upstream.model,
        timeout_ms = config.upstream.timeout_ms,
        api_key_env = %config.upstream.api_key_env,
        "Configuration loaded"
    );

    // The credential is resolved per request; its absence only affects POST /generate.
    let state = Arc::new(AppState::from_config(config.clone())?);

    // Build the HTTP router.
    let app = build_router(state)?;

    // Start the server.
    let listen_addr = config.server.listen.clone();
    info!(addr = %listen_addr, "Starting server");

    let listener = TcpListener::bind(&listen_addr).await?;
    info!("Listening on {listen_addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
