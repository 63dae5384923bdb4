//! 路由定义
//!
//! - 健康检查：/health
//! - 指标：/metrics
//! - 公寓级条目：/{apartment}/items/{item}/state（GET 轮询，PUT 控制）
//! - 房间级条目：/{apartment}/items/{item}/{room}/state（墙壁开关）

use crate::AppState;
use crate::handlers::*;
use axum::{Router, routing::get};

pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(get_metrics))
        .route(
            "/:apartment/items/:item_name/state",
            get(get_item_state).put(put_item_state),
        )
        .route(
            "/:apartment/items/:item_name/:room/state",
            get(get_room_item_state).put(put_room_item_state),
        )
}
