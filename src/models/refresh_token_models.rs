use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Server-side record of an issued refresh token. Only the SHA-256 digest of
/// the raw token is stored; revocation flips `revoked` instead of deleting.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RefreshTokenDoc {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub user_id: ObjectId,
    pub jti: String,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub revoked: bool,
}
