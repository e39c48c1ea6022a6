use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::poll_models::Poll;

#[derive(Debug, Deserialize)]
pub struct CreatePollRequest {
    pub question: String,
    pub choices: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct CastVoteRequest {
    #[serde(rename = "choiceId", default)]
    pub choice_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollResponse {
    pub id: String,
    pub question: String,
    pub creator_id: String,
    pub choices: Vec<ChoiceResponse>,
    pub total_votes: u32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChoiceResponse {
    pub id: String,
    pub text: String,
    pub votes: u32,
}

impl PollResponse {
    pub fn from_poll(poll: &Poll) -> Self {
        Self {
            id: poll.id.to_hex(),
            question: poll.question.clone(),
            creator_id: poll.creator_id.to_hex(),
            choices: poll
                .choices
                .iter()
                .map(|c| ChoiceResponse {
                    id: c.id.clone(),
                    text: c.text.clone(),
                    votes: c.vote_count,
                })
                .collect(),
            total_votes: poll.total_votes(),
            created_at: poll.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CastVoteResponse {
    pub message: String,
    pub results: ResultView,
}

/// Percentage-annotated projection of a poll, in stored choice order.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResultView {
    pub id: String,
    pub question: String,
    pub choices: Vec<ChoiceResult>,
    pub total_votes: u32,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ChoiceResult {
    pub id: String,
    pub text: String,
    pub votes: u32,
    pub percentage: f64,
}

impl ResultView {
    /// Pure aggregation. Percentages round half-away-from-zero to two
    /// decimals and are computed per choice, so they need not sum to 100.
    pub fn from_poll(poll: &Poll) -> Self {
        let total_votes = poll.total_votes();

        let choices = poll
            .choices
            .iter()
            .map(|choice| ChoiceResult {
                id: choice.id.clone(),
                text: choice.text.clone(),
                votes: choice.vote_count,
                percentage: if total_votes > 0 {
                    round2(f64::from(choice.vote_count) / f64::from(total_votes) * 100.0)
                } else {
                    0.0
                },
            })
            .collect();

        Self {
            id: poll.id.to_hex(),
            question: poll.question.clone(),
            choices,
            total_votes,
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
