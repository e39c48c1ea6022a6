use axum::{
    extract::{Extension, Path, State},
    Json,
};
use mongodb::bson::oid::ObjectId;

use crate::controllers::poll_controllers::models::{
    CastVoteRequest, CastVoteResponse, ResultView,
};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::utils::error::{AppError, AppResult};

/// `POST /api/votes/:pollId/cast`. The membership checks up front are the
/// cheap rejection path; the store's conditional update is what actually
/// enforces one vote per user when requests race.
pub async fn cast_vote(
    Path(poll_id): Path<String>,
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CastVoteRequest>,
) -> AppResult<Json<CastVoteResponse>> {
    let choice_id = payload
        .choice_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| {
            AppError::ValidationError("A choice ID is required to cast a vote.".to_string())
        })?;

    let poll_obj_id = ObjectId::parse_str(&poll_id)
        .map_err(|_| AppError::ValidationError("Invalid poll id".to_string()))?;

    let poll = state
        .polls
        .find_poll(poll_obj_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Vote poll not found.".to_string()))?;

    if poll.has_voted(&user.user_id) {
        return Err(AppError::AlreadyVoted(
            "You have already voted in this poll.".to_string(),
        ));
    }

    if !poll.has_choice(choice_id) {
        return Err(AppError::InvalidChoice(
            "Invalid choice ID for this poll.".to_string(),
        ));
    }

    let updated = state
        .polls
        .apply_vote(poll_obj_id, choice_id, user.user_id)
        .await?;

    let updated = match updated {
        Some(poll) => poll,
        // The conditional filter matched nothing; one re-read tells us why.
        None => {
            let current = state
                .polls
                .find_poll(poll_obj_id)
                .await?
                .ok_or_else(|| AppError::NotFound("Vote poll not found.".to_string()))?;
            if current.has_voted(&user.user_id) {
                return Err(AppError::AlreadyVoted(
                    "You have already voted in this poll.".to_string(),
                ));
            }
            return Err(AppError::UpdateConflict(
                "Failed to update vote or choice not found.".to_string(),
            ));
        }
    };

    Ok(Json(CastVoteResponse {
        message: "Vote cast successfully".to_string(),
        results: ResultView::from_poll(&updated),
    }))
}
