//! hab-sim HTTP 服务：轮询接口、控制接口、健康检查与指标。

pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod utils;

use axum::Router;
use hab_control::ControlService;
use hab_storage::DeviceStateStore;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<DeviceStateStore>,
    pub control: ControlService,
}

/// 组装路由与中间件。
pub fn build_app(state: AppState) -> Router {
    routes::create_router()
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        // 注入 request_id/trace_id
        .layer(axum::middleware::from_fn(middleware::request_context))
}
