use crate::error::ApiError;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;

/// User role, stored as an integer in the `users` table and in token claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "i32", try_from = "i32")]
pub enum Role {
    Admin = 1,
    Teacher = 2,
    Parent = 3,
}

impl From<Role> for i32 {
    fn from(role: Role) -> i32 {
        role as i32
    }
}

impl TryFrom<i32> for Role {
    type Error = String;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Role::Admin),
            2 => Ok(Role::Teacher),
            3 => Ok(Role::Parent),
            other => Err(format!("unknown role {other}")),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Teacher => write!(f, "teacher"),
            Role::Parent => write!(f, "parent"),
        }
    }
}

/// Signed session token claims. Stateless: never persisted server-side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "UserID")]
    pub user_id: i32,
    #[serde(rename = "Username")]
    pub username: String,
    #[serde(rename = "Role")]
    pub role: Role,
    #[serde(rename = "FullName")]
    pub full_name: String,
    /// Expiry, seconds since the epoch
    pub exp: usize,
}

/// Issues and verifies HS256 session tokens with a fixed validity window.
///
/// Verification collapses every failure mode (bad signature, malformed
/// token, expired) into one `Unauthenticated` error; callers cannot tell
/// them apart.
#[derive(Clone)]
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validity: Duration,
}

impl TokenCodec {
    pub fn new(secret: &str, validity_hours: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validity: Duration::hours(validity_hours),
        }
    }

    /// Sign a token for the given identity, valid for the configured window.
    pub fn issue(
        &self,
        user_id: i32,
        username: &str,
        role: Role,
        full_name: &str,
    ) -> Result<String, ApiError> {
        let claims = Claims {
            user_id,
            username: username.to_string(),
            role,
            full_name: full_name.to_string(),
            exp: (Utc::now() + self.validity).timestamp() as usize,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| ApiError::Internal(format!("token signing failed: {e}")))
    }

    /// Decode and verify a token, including expiry.
    pub fn verify(&self, token: &str) -> Result<Claims, ApiError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|_| ApiError::Unauthenticated("invalid or expired token".to_string()))
    }
}
