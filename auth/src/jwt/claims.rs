use std::collections::HashMap;

use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Claims carried by access tokens.
///
/// The custom `id` claim identifies the authenticated user; `exp` and `iat`
/// follow RFC 7519. Every field is optional so tokens from other issuers can
/// still be decoded; unknown fields survive a round-trip through `extra`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    /// User identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Expiration time (Unix timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,

    /// Issued at (Unix timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,

    /// Additional custom fields (flattened into the token)
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl Claims {
    /// Create new empty claims.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create claims for an authenticated user.
    ///
    /// # Arguments
    /// * `user_id` - Unique user identifier, stored in the `id` claim
    /// * `expiration_minutes` - Minutes until the token expires
    ///
    /// # Returns
    /// Claims with `id`, `exp`, and `iat` set
    pub fn for_user(user_id: impl ToString, expiration_minutes: i64) -> Self {
        let now = Utc::now();
        let expiration = now + Duration::minutes(expiration_minutes);

        Self {
            id: Some(user_id.to_string()),
            exp: Some(expiration.timestamp()),
            iat: Some(now.timestamp()),
            extra: HashMap::new(),
        }
    }

    /// Set expiration (Unix timestamp).
    pub fn with_expiration(mut self, exp: i64) -> Self {
        self.exp = Some(exp);
        self
    }

    /// Get the user identifier from the `id` claim.
    pub fn user_id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Check whether the token is expired at `current_timestamp`.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp.map_or(false, |exp| exp < current_timestamp)
    }
}
