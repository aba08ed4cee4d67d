use std::net::{Ipv4Addr, SocketAddr};

use dashboard::{config::Config, mock};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().expect("Failed to load configuration");

    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, config.mock_upstream_port));
    tracing::info!("Mock upstream listening on {}", addr);
    axum::serve(
        tokio::net::TcpListener::bind(&addr)
            .await
            .expect("Failed to bind"),
        mock::router(),
    )
    .await
    .expect("Failed to start mock upstream");
}
