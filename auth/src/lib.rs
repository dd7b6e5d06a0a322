//! Authentication support library
//!
//! Provides the credential infrastructure for the user management service:
//! - Password hashing (Argon2id)
//! - JWT access token generation and validation
//!
//! The service defines its own domain traits and adapts these implementations,
//! so this crate stays free of domain types.
//!
//! # Examples
//!
//! ## Password hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash).unwrap());
//! assert!(!hasher.verify("not_my_password", &hash).unwrap());
//! ```
//!
//! ## Login flow
//! ```
//! use auth::{Authenticator, Claims, PasswordHasher};
//!
//! let authenticator = Authenticator::new(b"secret_key_at_least_32_bytes_long!");
//!
//! // Registration stored this hash.
//! let hash = PasswordHasher::new().hash("password123").unwrap();
//!
//! // Login: verify, then issue a token carrying the user id.
//! assert!(authenticator.validate_password("password123", &hash).unwrap());
//! let claims = Claims::for_user(42, 30);
//! let token = authenticator.generate_token(&claims).unwrap();
//!
//! // Each authorized request validates the token.
//! let decoded: Claims = authenticator.validate_token(&token).unwrap();
//! assert_eq!(decoded.user_id(), Some("42"));
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use authenticator::Authenticator;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use password::PasswordError;
pub use password::PasswordHasher;
