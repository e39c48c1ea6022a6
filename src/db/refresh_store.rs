use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mongodb::{
    bson::{doc, oid::ObjectId},
    Collection, Database,
};

use crate::models::refresh_token_models::RefreshTokenDoc;
use crate::utils::error::AppResult;

#[derive(Debug, PartialEq, Eq)]
pub enum RefreshStatus {
    Valid(ObjectId),
    Expired,
    Revoked,
    Unknown,
}

/// Server-side validity/revocation collaborator for refresh tokens. Keyed by
/// the SHA-256 digest of the raw token; the token itself is never stored.
#[async_trait]
pub trait RefreshStore: Send + Sync {
    async fn save(
        &self,
        user_id: ObjectId,
        jti: &str,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<()>;

    async fn status(&self, token_hash: &str) -> AppResult<RefreshStatus>;

    async fn revoke(&self, token_hash: &str) -> AppResult<()>;
}

pub struct MongoRefreshStore {
    tokens: Collection<RefreshTokenDoc>,
}

impl MongoRefreshStore {
    pub fn new(db: &Database) -> Self {
        Self {
            tokens: db.collection::<RefreshTokenDoc>("refresh_tokens"),
        }
    }
}

#[async_trait]
impl RefreshStore for MongoRefreshStore {
    async fn save(
        &self,
        user_id: ObjectId,
        jti: &str,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<()> {
        let record = RefreshTokenDoc {
            id: ObjectId::new(),
            user_id,
            jti: jti.to_string(),
            token_hash: token_hash.to_string(),
            expires_at,
            created_at: Utc::now(),
            revoked: false,
        };
        self.tokens.insert_one(&record).await?;
        Ok(())
    }

    async fn status(&self, token_hash: &str) -> AppResult<RefreshStatus> {
        let record = self
            .tokens
            .find_one(doc! { "token_hash": token_hash })
            .await?;

        Ok(match record {
            None => RefreshStatus::Unknown,
            Some(r) if r.revoked => RefreshStatus::Revoked,
            Some(r) if r.expires_at < Utc::now() => RefreshStatus::Expired,
            Some(r) => RefreshStatus::Valid(r.user_id),
        })
    }

    async fn revoke(&self, token_hash: &str) -> AppResult<()> {
        self.tokens
            .update_one(
                doc! { "token_hash": token_hash },
                doc! { "$set": { "revoked": true } },
            )
            .await?;
        Ok(())
    }
}
