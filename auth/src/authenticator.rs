use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// Authentication facade combining password verification and token handling.
///
/// Constructed once at startup from the configured JWT secret and shared
/// across requests.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    jwt_handler: JwtHandler,
}

impl Authenticator {
    /// Create a new authenticator signing tokens with `jwt_secret`.
    pub fn new(jwt_secret: &[u8]) -> Self {
        Self {
            password_hasher: PasswordHasher::new(),
            jwt_handler: JwtHandler::new(jwt_secret),
        }
    }

    /// Check a plaintext password against a stored hash.
    ///
    /// A mismatch is a normal `Ok(false)`.
    ///
    /// # Errors
    /// * `PasswordError` - The stored hash could not be parsed
    pub fn validate_password(
        &self,
        password: &str,
        stored_hash: &str,
    ) -> Result<bool, PasswordError> {
        self.password_hasher.verify(password, stored_hash)
    }

    /// Issue a signed token for the given claims.
    ///
    /// # Errors
    /// * `JwtError` - Token generation failed
    pub fn generate_token<T: Serialize>(&self, claims: &T) -> Result<String, JwtError> {
        self.jwt_handler.encode(claims)
    }

    /// Validate and decode a token presented on a request.
    ///
    /// # Errors
    /// * `JwtError` - Signature invalid, token malformed, or expired
    pub fn validate_token<T: DeserializeOwned>(&self, token: &str) -> Result<T, JwtError> {
        self.jwt_handler.decode(token)
    }
}
