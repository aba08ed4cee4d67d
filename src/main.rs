use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use dashboard::{
    AppState,
    config::Config,
    router::create_router,
    store::FileStore,
    upstream::{UpstreamCache, UpstreamOptions},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // 初始化日志
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 加载配置
    let config = Config::from_env().expect("Failed to load configuration");

    // 打开数据目录
    let store = FileStore::open(config.data_dir.clone())
        .await
        .expect("Failed to open data directory");

    // 上游数据缓存
    let options = UpstreamOptions::from_config(&config);
    tracing::info!(
        "Upstream API at {} (cache ttl {:?}, timeout {:?})",
        options.base_url,
        options.cache_ttl,
        options.request_timeout
    );
    let upstream = UpstreamCache::from_options(&options).expect("Failed to build HTTP client");

    // 设置应用状态
    let state = AppState {
        config: config.clone(),
        store,
        upstream: Arc::new(upstream),
    };

    let app = create_router(state);

    // 启动服务器
    let addr = SocketAddr::new(
        config.server_host.parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid server_host, falling back to dual-stack default");
            IpAddr::V6(std::net::Ipv6Addr::UNSPECIFIED)
        }),
        config.server_port,
    );
    tracing::info!("Server listening on {}", addr);
    axum::serve(
        tokio::net::TcpListener::bind(&addr)
            .await
            .expect("Failed to bind"),
        app,
    )
    .await
    .expect("Failed to start server");
}
