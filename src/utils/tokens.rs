use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::config::Config;

pub const ACCESS_COOKIE: &str = "accessToken";
pub const REFRESH_COOKIE: &str = "refreshToken";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    pub jti: String,
}

#[derive(Debug, PartialEq, Eq)]
pub enum TokenError {
    Expired,
    Invalid,
}

/// Gate classification of the credential set presented on a request.
/// A missing access token with a refresh cookie present is treated the same
/// as an expired one: the client is told to run the refresh exchange.
#[derive(Debug)]
pub enum TokenGateState {
    NoToken,
    ValidAccess(Claims),
    ExpiredAccessWithRefresh,
    ExpiredAccessNoRefresh,
    InvalidAccess,
}

/// Issues and verifies access/refresh token pairs. Secrets and expiry
/// horizons come from `Config` at construction; nothing here touches the
/// environment.
pub struct TokenService {
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenService {
    pub fn new(
        access_secret: &str,
        refresh_secret: &str,
        access_ttl: Duration,
        refresh_ttl: Duration,
    ) -> Self {
        Self {
            access_encoding: EncodingKey::from_secret(access_secret.as_bytes()),
            access_decoding: DecodingKey::from_secret(access_secret.as_bytes()),
            refresh_encoding: EncodingKey::from_secret(refresh_secret.as_bytes()),
            refresh_decoding: DecodingKey::from_secret(refresh_secret.as_bytes()),
            access_ttl,
            refresh_ttl,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            &config.access_token_secret,
            &config.refresh_token_secret,
            Duration::seconds(config.access_token_ttl_secs),
            Duration::seconds(config.refresh_token_ttl_secs),
        )
    }

    pub fn access_max_age(&self) -> i64 {
        self.access_ttl.num_seconds()
    }

    pub fn refresh_max_age(&self) -> i64 {
        self.refresh_ttl.num_seconds()
    }

    pub fn issue_access(&self, user_id: &str) -> Result<String, TokenError> {
        let (claims, _) = build_claims(user_id, self.access_ttl);
        encode(&Header::default(), &claims, &self.access_encoding).map_err(|_| TokenError::Invalid)
    }

    /// Returns the encoded token along with the jti and expiry instant the
    /// revocation store needs to record.
    pub fn issue_refresh(
        &self,
        user_id: &str,
    ) -> Result<(String, String, DateTime<Utc>), TokenError> {
        let (claims, expires_at) = build_claims(user_id, self.refresh_ttl);
        let token = encode(&Header::default(), &claims, &self.refresh_encoding)
            .map_err(|_| TokenError::Invalid)?;
        Ok((token, claims.jti, expires_at))
    }

    pub fn verify_access(&self, token: &str) -> Result<Claims, TokenError> {
        verify(token, &self.access_decoding)
    }

    pub fn verify_refresh(&self, token: &str) -> Result<Claims, TokenError> {
        verify(token, &self.refresh_decoding)
    }

    pub fn classify(&self, access: Option<&str>, has_refresh: bool) -> TokenGateState {
        match access {
            None if has_refresh => TokenGateState::ExpiredAccessWithRefresh,
            None => TokenGateState::NoToken,
            Some(token) => match self.verify_access(token) {
                Ok(claims) => TokenGateState::ValidAccess(claims),
                Err(TokenError::Expired) if has_refresh => {
                    TokenGateState::ExpiredAccessWithRefresh
                }
                Err(TokenError::Expired) => TokenGateState::ExpiredAccessNoRefresh,
                Err(TokenError::Invalid) => TokenGateState::InvalidAccess,
            },
        }
    }
}

fn build_claims(user_id: &str, ttl: Duration) -> (Claims, DateTime<Utc>) {
    let expires_at = Utc::now() + ttl;
    let claims = Claims {
        sub: user_id.to_string(),
        exp: expires_at.timestamp() as usize,
        jti: Uuid::new_v4().to_string(),
    };
    (claims, expires_at)
}

fn verify(token: &str, key: &DecodingKey) -> Result<Claims, TokenError> {
    decode::<Claims>(token, key, &Validation::default())
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Invalid,
        })
}

/// Digest used to look refresh tokens up server-side without storing them
/// in the clear.
pub fn token_digest(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}
