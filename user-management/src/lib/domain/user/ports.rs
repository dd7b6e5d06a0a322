use async_trait::async_trait;

use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::ListUsersQuery;
use crate::domain::user::models::PaginatedResult;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;

/// Port for user domain service operations, one method per use case.
#[async_trait]
pub trait UserServicePort: Send + Sync + 'static {
    /// Create a new user from a validated command.
    ///
    /// Hashes the password and stamps the creation time before persisting.
    ///
    /// # Returns
    /// Created user entity with its store-assigned id
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    /// * `Unknown` - Password hashing failed
    async fn create_user(&self, command: CreateUserCommand) -> Result<User, UserError>;

    /// Create a batch of users in one bulk load.
    ///
    /// Passwords are hashed on independent tasks; results are joined by
    /// input index so output order always matches input order.
    ///
    /// # Returns
    /// Created users, in input order, with store-assigned ids
    ///
    /// # Errors
    /// * `InvalidBatchSize` - Batch is empty or larger than 1000
    /// * `DatabaseError` - Database operation failed
    /// * `Unknown` - Password hashing failed
    async fn create_users(&self, commands: Vec<CreateUserCommand>) -> Result<Vec<User>, UserError>;

    /// Retrieve a user by unique identifier.
    ///
    /// A record carrying a soft-delete marker is treated as absent.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist or is soft-deleted
    /// * `DatabaseError` - Database operation failed
    async fn get_user(&self, id: UserId) -> Result<User, UserError>;

    /// Retrieve a user by email address.
    ///
    /// A record carrying a soft-delete marker is treated as absent.
    ///
    /// # Errors
    /// * `NotFoundByEmail` - No user with this email, or it is soft-deleted
    /// * `DatabaseError` - Database operation failed
    async fn get_user_by_email(&self, email: &str) -> Result<User, UserError>;

    /// Retrieve one page of users with optional age and country filters.
    ///
    /// Passed through to the store verbatim; totals are trusted as
    /// reported.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn list_users(&self, query: ListUsersQuery) -> Result<PaginatedResult<User>, UserError>;

    /// Update an existing user with optional fields.
    ///
    /// Omitted fields retain their current values.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Database operation failed
    async fn update_user(
        &self,
        id: UserId,
        command: UpdateUserCommand,
    ) -> Result<User, UserError>;

    /// Delete a user.
    ///
    /// No existence check; deleting a missing id is a no-op.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn delete_user(&self, id: UserId) -> Result<(), UserError>;
}

/// Persistence operations for the user aggregate.
///
/// Each operation acquires its own connection from the pool for its
/// duration; nothing is held across operations.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist a new user.
    ///
    /// # Returns
    /// The user with its store-assigned id
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, user: User) -> Result<User, UserError>;

    /// Persist a batch of users through the bulk-load path.
    ///
    /// Runs as a single table-locked transaction.
    ///
    /// # Returns
    /// Created users in insertion order with store-assigned ids
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn create_bulk(&self, users: Vec<User>) -> Result<Vec<User>, UserError>;

    /// Retrieve a user by identifier.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserError>;

    /// Retrieve a user by email address.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError>;

    /// Retrieve one page of users; the store computes the totals.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn list(&self, query: ListUsersQuery) -> Result<PaginatedResult<User>, UserError>;

    /// Update an existing user in storage.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Database operation failed
    async fn update(&self, user: User) -> Result<User, UserError>;

    /// Remove a user from storage. Removing a missing id is a no-op.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn delete(&self, id: UserId) -> Result<(), UserError>;
}
