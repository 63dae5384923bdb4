//! 控制 handlers
//!
//! - PUT /{apartment}/items/Update_Apartment_smart_<Kind>/state
//! - PUT /{apartment}/items/Update_Apartment_smart_Switch/{room}/state

use crate::AppState;
use crate::handlers::items::{ItemPath, RoomItemPath};
use crate::utils::response::{control_error, not_found_error, outcome_to_dto};
use api_contract::ApiResponse;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use domain::DeviceCategory;
use hab_control::{ControlParams, control_category};

/// 公寓级设备控制
pub async fn put_item_state(
    State(state): State<AppState>,
    Path(path): Path<ItemPath>,
    Query(params): Query<ControlParams>,
) -> Response {
    let Some(category) = control_category(&path.item_name) else {
        return not_found_error("Item not found");
    };
    respond(&state, &path.apartment, category, None, &params).await
}

/// 墙壁开关控制（按房间）
pub async fn put_room_item_state(
    State(state): State<AppState>,
    Path(path): Path<RoomItemPath>,
    Query(params): Query<ControlParams>,
) -> Response {
    match control_category(&path.item_name) {
        Some(DeviceCategory::WallSwitch) => {
            respond(
                &state,
                &path.apartment,
                DeviceCategory::WallSwitch,
                Some(&path.room),
                &params,
            )
            .await
        }
        _ => not_found_error("Item not found"),
    }
}

async fn respond(
    state: &AppState,
    apartment_id: &str,
    category: DeviceCategory,
    room: Option<&str>,
    params: &ControlParams,
) -> Response {
    match state
        .control
        .apply(apartment_id, category, room, params)
        .await
    {
        Ok(outcome) => (
            StatusCode::OK,
            Json(ApiResponse::success(outcome_to_dto(outcome))),
        )
            .into_response(),
        Err(err) => control_error(err),
    }
}
