//! In-memory store implementations. They back the test suite and provide
//! the same atomic conditional-update semantics as the Mongo stores: each
//! `apply_vote` call runs its check-and-mutate inside one critical section.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;

use crate::db::poll_store::PollStore;
use crate::db::refresh_store::{RefreshStatus, RefreshStore};
use crate::db::user_store::UserStore;
use crate::models::poll_models::Poll;
use crate::models::refresh_token_models::RefreshTokenDoc;
use crate::models::user_models::User;
use crate::utils::error::{AppError, AppResult};

#[derive(Default)]
pub struct MemoryPollStore {
    polls: Mutex<HashMap<ObjectId, Poll>>,
}

#[async_trait]
impl PollStore for MemoryPollStore {
    async fn find_poll(&self, id: ObjectId) -> AppResult<Option<Poll>> {
        let polls = self.polls.lock().unwrap();
        Ok(polls.get(&id).cloned())
    }

    async fn insert_poll(&self, poll: &Poll) -> AppResult<()> {
        let mut polls = self.polls.lock().unwrap();
        if polls.values().any(|p| p.question == poll.question) {
            return Err(AppError::DuplicateQuestion(
                "A poll with this question already exists.".to_string(),
            ));
        }
        polls.insert(poll.id, poll.clone());
        Ok(())
    }

    async fn apply_vote(
        &self,
        poll_id: ObjectId,
        choice_id: &str,
        user_id: ObjectId,
    ) -> AppResult<Option<Poll>> {
        let mut polls = self.polls.lock().unwrap();
        let Some(poll) = polls.get_mut(&poll_id) else {
            return Ok(None);
        };
        if poll.has_voted(&user_id) {
            return Ok(None);
        }
        let Some(choice) = poll.choices.iter_mut().find(|c| c.id == choice_id) else {
            return Ok(None);
        };
        choice.vote_count += 1;
        poll.voter_ids.push(user_id);
        poll.updated_at = Utc::now();
        Ok(Some(poll.clone()))
    }
}

#[derive(Default)]
pub struct MemoryUserStore {
    users: Mutex<Vec<User>>,
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn insert_user(&self, user: &User) -> AppResult<()> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == user.email) {
            return Err(AppError::ValidationError(
                "A user with this email already exists.".to_string(),
            ));
        }
        users.push(user.clone());
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.email == email).cloned())
    }
}

#[derive(Default)]
pub struct MemoryRefreshStore {
    tokens: Mutex<Vec<RefreshTokenDoc>>,
}

#[async_trait]
impl RefreshStore for MemoryRefreshStore {
    async fn save(
        &self,
        user_id: ObjectId,
        jti: &str,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<()> {
        self.tokens.lock().unwrap().push(RefreshTokenDoc {
            id: ObjectId::new(),
            user_id,
            jti: jti.to_string(),
            token_hash: token_hash.to_string(),
            expires_at,
            created_at: Utc::now(),
            revoked: false,
        });
        Ok(())
    }

    async fn status(&self, token_hash: &str) -> AppResult<RefreshStatus> {
        let tokens = self.tokens.lock().unwrap();
        Ok(match tokens.iter().find(|t| t.token_hash == token_hash) {
            None => RefreshStatus::Unknown,
            Some(t) if t.revoked => RefreshStatus::Revoked,
            Some(t) if t.expires_at < Utc::now() => RefreshStatus::Expired,
            Some(t) => RefreshStatus::Valid(t.user_id),
        })
    }

    async fn revoke(&self, token_hash: &str) -> AppResult<()> {
        let mut tokens = self.tokens.lock().unwrap();
        if let Some(t) = tokens.iter_mut().find(|t| t.token_hash == token_hash) {
            t.revoked = true;
        }
        Ok(())
    }
}
