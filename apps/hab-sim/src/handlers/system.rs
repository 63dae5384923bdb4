//! 健康检查与指标快照
//!
//! - GET /health
//! - GET /metrics

use crate::AppState;
use api_contract::{ApiResponse, HealthDto, MetricsSnapshotDto};
use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use hab_telemetry::metrics;

pub async fn health(State(state): State<AppState>) -> Response {
    (
        StatusCode::OK,
        Json(ApiResponse::success(HealthDto {
            status: "ok".to_string(),
            apartments: state.store.len(),
        })),
    )
        .into_response()
}

pub async fn get_metrics() -> Response {
    let snapshot = metrics().snapshot();
    (
        StatusCode::OK,
        Json(ApiResponse::success(MetricsSnapshotDto {
            uplinks_published: snapshot.uplinks_published,
            uplinks_failed: snapshot.uplinks_failed,
            downlinks_published: snapshot.downlinks_published,
            downlinks_failed: snapshot.downlinks_failed,
            control_accepted: snapshot.control_accepted,
            control_rejected: snapshot.control_rejected,
            simulation_ticks: snapshot.simulation_ticks,
            deferred_reports: snapshot.deferred_reports,
        })),
    )
        .into_response()
}
