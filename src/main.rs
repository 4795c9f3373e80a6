use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use handetect::{
    AppState, classify::RoboflowClient, config::Config, content::StaticContent,
    router::build_router,
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

    #[cfg(debug_assertions)]
    tracing::info!("Running in debug mode with CORS enabled");

    #[cfg(not(debug_assertions))]
    tracing::info!("Running in production mode with CORS disabled");

    // 静态文本只在启动时解析一次
    let content = StaticContent::load().expect("Failed to parse embedded content");

    let classifier = RoboflowClient::new(&config).expect("Failed to build HTTP client");
    tracing::info!(
        "Classification endpoint: {} (credentials file: {})",
        classifier.endpoint(),
        config.credentials_path.display()
    );

    let state = AppState::new(config, Arc::new(classifier), content);
    let addr = SocketAddr::new(
        state.config.server_host.parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid server_host, falling back to dual-stack default");
            IpAddr::V6(std::net::Ipv6Addr::UNSPECIFIED)
        }),
        state.config.server_port,
    );
    let app = build_router(state);

    // 启动服务器
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
