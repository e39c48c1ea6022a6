use async_trait::async_trait;
use chrono::Utc;
use mongodb::{
    bson::{doc, oid::ObjectId},
    options::ReturnDocument,
    Collection, Database,
};

use crate::db::is_duplicate_key;
use crate::models::poll_models::Poll;
use crate::utils::error::{AppError, AppResult};

/// Abstract poll persistence: point lookup, insert under the question
/// uniqueness constraint, and one atomic conditional update primitive.
#[async_trait]
pub trait PollStore: Send + Sync {
    async fn find_poll(&self, id: ObjectId) -> AppResult<Option<Poll>>;

    /// Fails with `DuplicateQuestion` when the store's uniqueness constraint
    /// on `question` is violated.
    async fn insert_poll(&self, poll: &Poll) -> AppResult<()>;

    /// The single enforcement boundary for the one-vote-per-user invariant.
    /// In one atomic step, and only if `choice_id` belongs to the poll AND
    /// `user_id` is not yet in `voter_ids`: increment that choice's counter
    /// and append the voter. Returns the updated document, or `None` when
    /// the conditional filter matched nothing.
    async fn apply_vote(
        &self,
        poll_id: ObjectId,
        choice_id: &str,
        user_id: ObjectId,
    ) -> AppResult<Option<Poll>>;
}

pub struct MongoPollStore {
    polls: Collection<Poll>,
}

impl MongoPollStore {
    pub fn new(db: &Database) -> Self {
        Self {
            polls: db.collection::<Poll>("polls"),
        }
    }
}

#[async_trait]
impl PollStore for MongoPollStore {
    async fn find_poll(&self, id: ObjectId) -> AppResult<Option<Poll>> {
        Ok(self.polls.find_one(doc! { "_id": id }).await?)
    }

    async fn insert_poll(&self, poll: &Poll) -> AppResult<()> {
        self.polls.insert_one(poll).await.map_err(|e| {
            if is_duplicate_key(&e) {
                AppError::DuplicateQuestion("A poll with this question already exists.".to_string())
            } else {
                e.into()
            }
        })?;
        Ok(())
    }

    async fn apply_vote(
        &self,
        poll_id: ObjectId,
        choice_id: &str,
        user_id: ObjectId,
    ) -> AppResult<Option<Poll>> {
        // The `voter_ids $ne` clause makes the duplicate-vote check part of
        // the same conditional write as the increment; two racing requests
        // from one user cannot both match.
        let filter = doc! {
            "_id": poll_id,
            "choices.id": choice_id,
            "voter_ids": { "$ne": user_id },
        };
        let update = doc! {
            "$inc": { "choices.$.vote_count": 1 },
            "$push": { "voter_ids": user_id },
            "$set": { "updated_at": Utc::now().to_rfc3339() },
        };

        let updated = self
            .polls
            .find_one_and_update(filter, update)
            .return_document(ReturnDocument::After)
            .await?;

        Ok(updated)
    }
}
