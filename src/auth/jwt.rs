//! JWT issue and validation.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};

use crate::config::ConfigLoadError;
use crate::error::{AppError, AppResult, AuthError};
use crate::models::Identity;

/// Token payload: the identity plus issue and (optional) expiry timestamps.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "userName")]
    pub user_name: String,
    pub iat: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

/// Signs and verifies bearer tokens with one HS256 secret.
#[derive(Clone)]
pub struct TokenAuthority {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Option<Duration>,
}

impl TokenAuthority {
    /// `ttl = None` issues tokens without `exp`; they stay valid until the secret changes.
    pub fn new(secret: &str, ttl: Option<Duration>) -> Result<Self, ConfigLoadError> {
        if secret.is_empty() {
            return Err(ConfigLoadError::MissingJwtSecret);
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.required_spec_claims.clear();
        if ttl.is_some() {
            validation.required_spec_claims.insert("exp".to_string());
        }

        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        })
    }

    pub fn expires(&self) -> bool {
        self.ttl.is_some()
    }

    pub fn issue(&self, identity: &Identity) -> AppResult<String> {
        self.issue_at(identity, Utc::now())
    }

    /// Issue a token as if signed at `now`. Same identity, key and `now` give the same token.
    pub fn issue_at(&self, identity: &Identity, now: DateTime<Utc>) -> AppResult<String> {
        let claims = Claims {
            id: identity.id.clone(),
            user_name: identity.user_name.clone(),
            iat: now.timestamp(),
            exp: self.ttl.map(|ttl| (now + ttl).timestamp()),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("jwt encode: {}", e)))
    }

    pub fn verify(&self, token: &str) -> Result<Identity, AuthError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => AuthError::Invalid,
                ErrorKind::ExpiredSignature => AuthError::Expired,
                _ => AuthError::Malformed,
            }
        })?;
        Ok(Identity {
            id: data.claims.id,
            user_name: data.claims.user_name,
        })
    }
}
