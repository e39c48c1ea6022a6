use axum::{
    extract::{Extension, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use mongodb::bson::oid::ObjectId;

use crate::controllers::poll_controllers::models::{CreatePollRequest, PollResponse};
use crate::middleware::auth::AuthUser;
use crate::models::poll_models::{Choice, Poll};
use crate::state::AppState;
use crate::utils::error::{AppError, AppResult};

pub async fn create_poll(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreatePollRequest>,
) -> AppResult<(StatusCode, Json<PollResponse>)> {
    let question = payload.question.trim().to_string();
    let choice_texts: Vec<String> = payload
        .choices
        .iter()
        .map(|text| text.trim().to_string())
        .collect();

    if question.is_empty()
        || choice_texts.len() < 2
        || choice_texts.iter().any(|text| text.is_empty())
    {
        return Err(AppError::ValidationError(
            "Please provide a question and at least two choices.".to_string(),
        ));
    }

    let now = Utc::now();
    let poll = Poll {
        id: ObjectId::new(),
        question,
        choices: choice_texts
            .into_iter()
            .map(|text| Choice {
                id: ObjectId::new().to_hex(),
                text,
                vote_count: 0,
            })
            .collect(),
        voter_ids: Vec::new(),
        creator_id: user.user_id,
        created_at: now,
        updated_at: now,
    };

    state.polls.insert_poll(&poll).await?;

    Ok((StatusCode::CREATED, Json(PollResponse::from_poll(&poll))))
}
