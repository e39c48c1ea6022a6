use axum::{
    extract::{Path, State},
    Json,
};
use mongodb::bson::oid::ObjectId;

use crate::controllers::poll_controllers::models::ResultView;
use crate::state::AppState;
use crate::utils::error::{AppError, AppResult};

/// `GET /api/votes/:pollId/results`. Public: results bypass the auth gate.
pub async fn get_results(
    Path(poll_id): Path<String>,
    State(state): State<AppState>,
) -> AppResult<Json<ResultView>> {
    let obj_id = ObjectId::parse_str(&poll_id)
        .map_err(|_| AppError::ValidationError("Invalid poll id".to_string()))?;

    let poll = state
        .polls
        .find_poll(obj_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Vote poll not found.".to_string()))?;

    Ok(Json(ResultView::from_poll(&poll)))
}
