use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};

use crate::{
    AppState,
    middleware::{log_errors, require_main},
    routes,
};

// 登录门禁相关的路由，未登录也可访问
fn gate_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(routes::page::health))
        .route("/page", get(routes::page::show_page))
        .route("/navigate", post(routes::user::navigate))
        .route("/login", post(routes::user::login))
        .route("/register", post(routes::user::register))
        .route("/logout", post(routes::user::logout))
}

// 需要登录后才能访问的路由
fn analysis_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/analyze", post(routes::analysis::analyze))
        .route_layer(DefaultBodyLimit::max(state.config.max_upload_bytes))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_main,
        ))
}

// 创建主路由
pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .merge(gate_routes())
        .merge(analysis_routes(&state));

    let base = state.config.api_base_uri.trim_end_matches('/');
    let router = if base.is_empty() {
        api
    } else {
        Router::new().nest(base, api)
    };

    let router = router.layer(axum::middleware::from_fn(log_errors));

    // 开发模式下允许跨域
    #[cfg(debug_assertions)]
    let router = router.layer(tower_http::cors::CorsLayer::permissive());

    router.with_state(state)
}
