use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer};

use crate::{
    AppState,
    middleware::{endpoint_not_found, handle_panic, log_errors},
    routes,
};

// 显示配置相关的路由
pub fn display_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/display/activeProfile",
            get(routes::profile::get_active_profile).put(routes::profile::put_active_profile),
        )
        .route("/display/profiles", get(routes::profile::list_profiles))
        .route(
            "/display/profiles/{id}",
            get(routes::profile::get_profile)
                .put(routes::profile::put_profile)
                .delete(routes::profile::delete_profile),
        )
        .route("/display/cards", get(routes::card::list_cards))
        .route(
            "/display/cards/{id}",
            get(routes::card::get_card)
                .put(routes::card::put_card)
                .delete(routes::card::delete_card),
        )
        .route("/display/status", get(routes::status::status))
}

// 面向 UI 的路由
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/api/profile/active", get(routes::dashboard::get_active_profile_view))
        .route("/api/sources/{kind}", get(routes::dashboard::get_source))
        .route("/api/cache/invalidate", post(routes::dashboard::invalidate_cache))
}

// 创建主路由
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(display_routes())
        .merge(api_routes())
        .fallback(endpoint_not_found)
        // panic 在最内层转换成 500，日志中间件才能记录到
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(axum::middleware::from_fn(log_errors))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
