//! Signed access tokens.
//!
//! A token carries the user id, username and role of its holder. The command
//! engine records `sub` as the actor of every command executed with it.

use cytomine_core::types::DbId;
use jsonwebtoken::errors::Error as JwtError;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::env_or;

/// Payload of an access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: DbId,
    pub username: String,
    pub role: String,
    pub iat: i64,
    pub exp: i64,
}

/// A freshly issued token and its lifetime in seconds.
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub token: String,
    pub expires_in: i64,
}

/// Signing secret and token lifetime.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    /// Lifetime of issued tokens, in minutes.
    pub access_token_expiry_mins: i64,
}

impl JwtConfig {
    /// Read `JWT_SECRET` (required) and `JWT_ACCESS_EXPIRY_MINS` (default 60).
    ///
    /// # Panics
    ///
    /// Panics when the secret is missing or empty.
    pub fn from_env() -> Self {
        let secret = std::env::var("JWT_SECRET").unwrap_or_default();
        assert!(!secret.is_empty(), "JWT_SECRET must be set");
        Self {
            secret,
            access_token_expiry_mins: env_or("JWT_ACCESS_EXPIRY_MINS", 60),
        }
    }

    /// Sign a token for a user.
    pub fn issue(
        &self,
        user_id: DbId,
        username: &str,
        role: &str,
    ) -> Result<AccessToken, JwtError> {
        let expires_in = self.access_token_expiry_mins * 60;
        let iat = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: user_id,
            username: username.to_owned(),
            role: role.to_owned(),
            iat,
            exp: iat + expires_in,
        };
        self.sign(&claims).map(|token| AccessToken { token, expires_in })
    }

    fn sign(&self, claims: &Claims) -> Result<String, JwtError> {
        jsonwebtoken::encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
    }

    /// Check the signature and expiry of a token and return its claims.
    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        jsonwebtoken::decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
    }
}
