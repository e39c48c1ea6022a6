use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// A poll document. `question` carries a unique index, `choices` keeps its
/// creation order, and `voter_ids` is the set of users that have already
/// voted. `sum(choice.vote_count)` always equals `voter_ids.len()` because
/// the increment and the voter append are committed in one store operation.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Poll {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub question: String,
    pub choices: Vec<Choice>,
    pub voter_ids: Vec<ObjectId>,
    pub creator_id: ObjectId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Choice {
    pub id: String,
    pub text: String,
    pub vote_count: u32,
}

impl Poll {
    pub fn total_votes(&self) -> u32 {
        self.choices.iter().map(|c| c.vote_count).sum()
    }

    pub fn has_voted(&self, user_id: &ObjectId) -> bool {
        self.voter_ids.contains(user_id)
    }

    pub fn has_choice(&self, choice_id: &str) -> bool {
        self.choices.iter().any(|c| c.id == choice_id)
    }
}
