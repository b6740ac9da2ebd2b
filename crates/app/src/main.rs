use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::Request;
use axum::ServiceExt;
use clap::Parser;
use tower::Layer;
use tower_http::normalize_path::NormalizePathLayer;
use tracing_subscriber::EnvFilter;

use app::{app_router, AppState};
use domain::config::GatewayConfig;
use infra::ContentApi;

/// GeoPress — AI-friendly JSON projections of geo-scoped content.
#[derive(Parser, Debug)]
#[command(name = "geopress", version, about = "GeoPress content projection server")]
struct Cli {
    /// Address to bind the HTTP listener
    #[arg(long, env = "GEOPRESS_BIND", default_value = "127.0.0.1:8080")]
    bind: SocketAddr,

    /// Base URL of the upstream content API
    #[arg(long, env = "GEOPRESS_API_BASE")]
    api_base: String,

    /// Upstream request timeout in seconds
    #[arg(long, env = "GEOPRESS_API_TIMEOUT", default_value_t = 30)]
    api_timeout: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .try_init();

    let cli = Cli::parse();

    let config = GatewayConfig::new(&cli.api_base, Duration::from_secs(cli.api_timeout))?;
    let gateway = ContentApi::new(config)?;
    let state = AppState::new(Arc::new(gateway));

    let routes = app_router(state);
    let routes = NormalizePathLayer::trim_trailing_slash().layer(routes);
    let app = ServiceExt::<Request>::into_make_service(routes);

    let listener = tokio::net::TcpListener::bind(cli.bind).await?;
    tracing::info!("listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
