//! Bearer-token identity: claim decoding and role resolution.
//!
//! Tokens are issued elsewhere; this service only verifies them with the
//! shared HS256 secret.

use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::database::graph::Entity;
use crate::database::storage::{Storage, StorageError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Account id
    pub uid: i64,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub role_id: Option<i64>,
    #[serde(default)]
    pub roles: Option<Vec<String>>,
    #[serde(default)]
    pub role_name: Option<String>,
    pub exp: i64,
    #[serde(default)]
    pub iat: Option<i64>,
}

#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("JWT secret not configured")]
    InvalidSecret,
    #[error("Invalid JWT token: {0}")]
    Invalid(#[from] jsonwebtoken::errors::Error),
}

/// Verify signature and expiry, returning the claims
pub fn decode_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let token_data = decode::<Claims>(token, &decoding_key, &Validation::default())?;
    Ok(token_data.claims)
}

/// Role names for the caller: the token's `roles`, else its `role_name`,
/// else the role of the stored account.
pub async fn resolve_roles(claims: &Claims, storage: &dyn Storage) -> Result<Vec<String>, StorageError> {
    if let Some(roles) = &claims.roles {
        return Ok(roles.clone());
    }
    if let Some(role_name) = &claims.role_name {
        return Ok(vec![role_name.clone()]);
    }

    let Some(account) = storage.find_by_id(Entity::Account, claims.uid).await? else {
        tracing::debug!("Account {} from token not found; no roles", claims.uid);
        return Ok(Vec::new());
    };
    let Some(role_id) = account.get_i64("role_id") else {
        return Ok(Vec::new());
    };
    let role = storage.find_by_id(Entity::Role, role_id).await?;
    Ok(role
        .and_then(|r| r.get_str("name").map(str::to_string))
        .into_iter()
        .collect())
}
