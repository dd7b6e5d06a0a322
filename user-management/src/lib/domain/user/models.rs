use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;

use crate::user::errors::EmailError;

/// User aggregate entity.
///
/// Represents a registered user record. `deleted_at` is the soft-delete
/// marker: lookups treat a set marker as absent, but no write path in this
/// service ever populates it.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub age: i32,
    pub country: String,
    pub province: String,
    pub city: String,
    pub email: EmailAddress,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// User unique identifier type.
///
/// Assigned by the store; zero until the record is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub i32);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Validates email format using RFC 5322 compliant parser. Email is the
/// natural external lookup key; uniqueness is enforced by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated email address.
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Command to create a new user with validated fields.
#[derive(Debug, Clone)]
pub struct CreateUserCommand {
    pub first_name: String,
    pub last_name: String,
    pub age: i32,
    pub country: String,
    pub province: String,
    pub city: String,
    pub email: EmailAddress,
    pub password: String,
}

impl CreateUserCommand {
    /// Build the entity to persist, substituting the hash for the plaintext.
    ///
    /// The id stays zero until the store assigns one.
    pub fn into_user(self, password_hash: String, created_at: DateTime<Utc>) -> User {
        User {
            id: UserId(0),
            first_name: self.first_name,
            last_name: self.last_name,
            age: self.age,
            country: self.country,
            province: self.province,
            city: self.city,
            email: self.email,
            password_hash,
            created_at,
            deleted_at: None,
        }
    }
}

/// Command to update an existing user with optional fields.
///
/// Only provided fields are replaced; an omitted field never nulls out the
/// stored value. Password and creation timestamp are not updatable.
#[derive(Debug, Clone, Default)]
pub struct UpdateUserCommand {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub age: Option<i32>,
    pub country: Option<String>,
    pub province: Option<String>,
    pub city: Option<String>,
    pub email: Option<EmailAddress>,
}

impl UpdateUserCommand {
    /// Merge this patch onto the current record, yielding the new state.
    pub fn apply_to(&self, user: &User) -> User {
        User {
            id: user.id,
            first_name: self.first_name.clone().unwrap_or_else(|| user.first_name.clone()),
            last_name: self.last_name.clone().unwrap_or_else(|| user.last_name.clone()),
            age: self.age.unwrap_or(user.age),
            country: self.country.clone().unwrap_or_else(|| user.country.clone()),
            province: self.province.clone().unwrap_or_else(|| user.province.clone()),
            city: self.city.clone().unwrap_or_else(|| user.city.clone()),
            email: self.email.clone().unwrap_or_else(|| user.email.clone()),
            password_hash: user.password_hash.clone(),
            created_at: user.created_at,
            deleted_at: user.deleted_at,
        }
    }
}

/// Filtered, paginated listing request.
///
/// `page` is 1-based. No bounds are validated here; out-of-range values are
/// whatever the store makes of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListUsersQuery {
    pub page: i32,
    pub page_size: i32,
    pub age: Option<i32>,
    pub country: Option<String>,
}

/// One page of results together with the store-computed totals.
///
/// `total_count` and `total_pages` come from the store and are passed
/// through verbatim, never recomputed.
#[derive(Debug, Clone, PartialEq)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub page: i32,
    pub page_size: i32,
    pub total_pages: i32,
    pub total_count: i32,
}
