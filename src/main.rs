use anyhow::Context;
use clap::Parser;
use payment_relay::{build_router, build_state, Config};
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "payment-relay", about = "Relay between a storefront and the Cashfree gateway")]
struct Cli {
    /// Listen port; overrides `PORT`.
    #[arg(long, short)]
    port: Option<u16>,

    /// Env file loaded before reading configuration.
    #[arg(long, env = "RELAY_ENV_FILE")]
    env_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let dotenv = match &cli.env_file {
        Some(path) => dotenvy::from_path(path).map(|_| Some(path.clone())),
        None => dotenvy::dotenv().map(Some),
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match dotenv {
        Ok(Some(path)) => info!(path = %path.display(), "Loaded environment file"),
        Ok(None) => {}
        Err(e) if cli.env_file.is_some() => {
            return Err(e).context("failed to load environment file");
        }
        Err(_) => {}
    }

    let mut config = Config::from_env();
    if let Some(port) = cli.port {
        config.server_port = port;
    }

    info!(
        port = config.server_port,
        environment = %config.environment,
        environment_name = %config.environment_name,
        gateway = %config.gateway_base_url(),
        "Starting payment relay"
    );
    if !config.environment_recognised() {
        warn!(
            environment_name = %config.environment_name,
            "Unrecognised CASHFREE_ENVIRONMENT; using production"
        );
    }
    if !config.has_credentials() {
        warn!("Cashfree credentials not configured; payment routes will fail");
    }
    if !config.verify_webhook_signatures {
        warn!("Webhook signature verification disabled");
    }

    let addr = format!("0.0.0.0:{}", config.server_port);
    let app = build_router(build_state(config)?);

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
