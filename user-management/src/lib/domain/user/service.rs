use std::sync::Arc;
use std::thread;

use async_trait::async_trait;
use chrono::Utc;
use futures::stream::{self, StreamExt, TryStreamExt};

use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::ListUsersQuery;
use crate::domain::user::models::PaginatedResult;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;
use crate::user::ports::UserRepository;
use crate::user::ports::UserServicePort;

/// Largest batch the bulk-create path accepts.
pub const MAX_BULK_USERS: usize = 1000;

/// Domain service implementation for user operations.
///
/// One method per use case; each delegates to exactly one repository call
/// after validating and transforming its input.
pub struct UserService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    password_hasher: auth::PasswordHasher,
}

impl<UR> UserService<UR>
where
    UR: UserRepository,
{
    pub fn new(repository: Arc<UR>) -> Self {
        Self {
            repository,
            password_hasher: auth::PasswordHasher::new(),
        }
    }
}

#[async_trait]
impl<UR> UserServicePort for UserService<UR>
where
    UR: UserRepository,
{
    async fn create_user(&self, command: CreateUserCommand) -> Result<User, UserError> {
        let password_hash = self
            .password_hasher
            .hash(&command.password)
            .map_err(|e| UserError::Unknown(format!("Password hashing failed: {}", e)))?;

        let user = command.into_user(password_hash, Utc::now());

        self.repository.create(user).await
    }

    async fn create_users(&self, commands: Vec<CreateUserCommand>) -> Result<Vec<User>, UserError> {
        let batch_size = commands.len();
        if batch_size == 0 || batch_size > MAX_BULK_USERS {
            return Err(UserError::InvalidBatchSize(batch_size));
        }

        // Hash on independent blocking tasks; `buffered` joins by input
        // index, so output order matches input order even when hashing
        // completes out of order. Each record is stamped when its own hash
        // finishes, so timestamps within a batch may differ.
        let parallelism = thread::available_parallelism().map(usize::from).unwrap_or(4);

        let users: Vec<User> = stream::iter(commands)
            .map(|command| {
                tokio::task::spawn_blocking(move || {
                    let password_hash = auth::PasswordHasher::new()
                        .hash(&command.password)
                        .map_err(|e| {
                            UserError::Unknown(format!("Password hashing failed: {}", e))
                        })?;
                    Ok(command.into_user(password_hash, Utc::now()))
                })
            })
            .buffered(parallelism)
            .map(|joined| match joined {
                Ok(result) => result,
                Err(e) => Err(UserError::Unknown(format!(
                    "Password hashing task failed: {}",
                    e
                ))),
            })
            .try_collect()
            .await?;

        self.repository.create_bulk(users).await
    }

    async fn get_user(&self, id: UserId) -> Result<User, UserError> {
        self.repository
            .find_by_id(id)
            .await?
            .filter(|user| user.deleted_at.is_none())
            .ok_or(UserError::NotFound(id))
    }

    async fn get_user_by_email(&self, email: &str) -> Result<User, UserError> {
        self.repository
            .find_by_email(email)
            .await?
            .filter(|user| user.deleted_at.is_none())
            .ok_or_else(|| UserError::NotFoundByEmail(email.to_string()))
    }

    async fn list_users(&self, query: ListUsersQuery) -> Result<PaginatedResult<User>, UserError> {
        self.repository.list(query).await
    }

    async fn update_user(
        &self,
        id: UserId,
        command: UpdateUserCommand,
    ) -> Result<User, UserError> {
        // Raw lookup: the merge target is whatever row the store holds,
        // soft-deleted or not.
        let user = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id))?;

        let updated = command.apply_to(&user);

        self.repository.update(updated).await
    }

    async fn delete_user(&self, id: UserId) -> Result<(), UserError> {
        self.repository.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use mockall::mock;

    use super::*;
    use crate::domain::user::models::EmailAddress;

    // Define mocks in the test module using mockall
    mock! {
        pub TestUserRepository {}

        #[async_trait]
        impl UserRepository for TestUserRepository {
            async fn create(&self, user: User) -> Result<User, UserError>;
            async fn create_bulk(&self, users: Vec<User>) -> Result<Vec<User>, UserError>;
            async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserError>;
            async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError>;
            async fn list(&self, query: ListUsersQuery) -> Result<PaginatedResult<User>, UserError>;
            async fn update(&self, user: User) -> Result<User, UserError>;
            async fn delete(&self, id: UserId) -> Result<(), UserError>;
        }
    }

    fn command(email: &str) -> CreateUserCommand {
        CreateUserCommand {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            age: 36,
            country: "UK".to_string(),
            province: "Greater London".to_string(),
            city: "London".to_string(),
            email: EmailAddress::new(email.to_string()).unwrap(),
            password: "pass_word!".to_string(),
        }
    }

    fn stored_user(id: i32, email: &str) -> User {
        User {
            id: UserId(id),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            age: 36,
            country: "UK".to_string(),
            province: "Greater London".to_string(),
            city: "London".to_string(),
            email: EmailAddress::new(email.to_string()).unwrap(),
            password_hash: "$argon2id$test_hash".to_string(),
            created_at: Utc::now(),
            deleted_at: None,
        }
    }

    #[tokio::test]
    async fn test_create_user_hashes_password_and_returns_assigned_id() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_create()
            .withf(|user| {
                user.id == UserId(0)
                    && user.email.as_str() == "ada@example.com"
                    && user.password_hash.starts_with("$argon2")
                    && user.password_hash != "pass_word!"
            })
            .times(1)
            .returning(|user| Ok(User { id: UserId(1), ..user }));

        let service = UserService::new(Arc::new(repository));

        let user = service
            .create_user(command("ada@example.com"))
            .await
            .expect("create_user failed");

        assert_eq!(user.id, UserId(1));
        // The stored hash verifies against the submitted plaintext.
        assert!(auth::PasswordHasher::new()
            .verify("pass_word!", &user.password_hash)
            .unwrap());
    }

    #[tokio::test]
    async fn test_create_user_propagates_repository_error() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_create()
            .times(1)
            .returning(|_| Err(UserError::DatabaseError("connection refused".to_string())));

        let service = UserService::new(Arc::new(repository));

        let result = service.create_user(command("ada@example.com")).await;
        assert!(matches!(result, Err(UserError::DatabaseError(_))));
    }

    #[tokio::test]
    async fn test_create_users_preserves_input_order() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_create_bulk()
            .withf(|users| users.len() == 3 && users.iter().all(|u| u.id == UserId(0)))
            .times(1)
            .returning(|users| {
                Ok(users
                    .into_iter()
                    .enumerate()
                    .map(|(i, user)| User {
                        id: UserId(i as i32 + 1),
                        ..user
                    })
                    .collect())
            });

        let service = UserService::new(Arc::new(repository));

        let commands = vec![
            command("first@example.com"),
            command("second@example.com"),
            command("third@example.com"),
        ];

        let users = service
            .create_users(commands)
            .await
            .expect("create_users failed");

        let emails: Vec<&str> = users.iter().map(|u| u.email.as_str()).collect();
        assert_eq!(
            emails,
            vec!["first@example.com", "second@example.com", "third@example.com"]
        );
        assert_eq!(
            users.iter().map(|u| u.id.0).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        // Each password was hashed independently with its own salt.
        assert_ne!(users[0].password_hash, users[1].password_hash);
    }

    #[tokio::test]
    async fn test_create_users_rejects_empty_batch() {
        let mut repository = MockTestUserRepository::new();
        repository.expect_create_bulk().times(0);

        let service = UserService::new(Arc::new(repository));

        let result = service.create_users(Vec::new()).await;
        assert!(matches!(result, Err(UserError::InvalidBatchSize(0))));
    }

    #[tokio::test]
    async fn test_create_users_rejects_oversized_batch() {
        let mut repository = MockTestUserRepository::new();
        repository.expect_create_bulk().times(0);

        let service = UserService::new(Arc::new(repository));

        let commands: Vec<_> = (0..1001)
            .map(|i| command(&format!("user{}@example.com", i)))
            .collect();

        let result = service.create_users(commands).await;
        assert!(matches!(result, Err(UserError::InvalidBatchSize(1001))));
    }

    #[tokio::test]
    async fn test_create_users_accepts_batch_of_one() {
        let mut repository = MockTestUserRepository::new();
        repository
            .expect_create_bulk()
            .times(1)
            .returning(|users| Ok(users));

        let service = UserService::new(Arc::new(repository));

        let users = service
            .create_users(vec![command("only@example.com")])
            .await
            .expect("create_users failed");
        assert_eq!(users.len(), 1);
    }

    #[tokio::test]
    async fn test_create_users_accepts_batch_of_one_thousand() {
        let mut repository = MockTestUserRepository::new();
        repository
            .expect_create_bulk()
            .times(1)
            .returning(|users| Ok(users));

        let service = UserService::new(Arc::new(repository));

        let commands: Vec<_> = (0..1000)
            .map(|i| command(&format!("user{}@example.com", i)))
            .collect();

        let users = service
            .create_users(commands)
            .await
            .expect("create_users failed");
        assert_eq!(users.len(), 1000);
        assert_eq!(users[999].email.as_str(), "user999@example.com");
    }

    #[tokio::test]
    async fn test_get_user_success() {
        let mut repository = MockTestUserRepository::new();

        let expected = stored_user(7, "ada@example.com");
        let returned = expected.clone();
        repository
            .expect_find_by_id()
            .withf(|id| *id == UserId(7))
            .times(1)
            .returning(move |_| Ok(Some(returned.clone())));

        let service = UserService::new(Arc::new(repository));

        let user = service.get_user(UserId(7)).await.expect("get_user failed");
        assert_eq!(user, expected);
    }

    #[tokio::test]
    async fn test_get_user_not_found() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_id()
            .times(1)
            .returning(|_| Ok(None));

        let service = UserService::new(Arc::new(repository));

        let result = service.get_user(UserId(999)).await;
        assert!(matches!(result, Err(UserError::NotFound(UserId(999)))));
    }

    #[tokio::test]
    async fn test_get_user_treats_soft_deleted_as_absent() {
        let mut repository = MockTestUserRepository::new();

        let mut user = stored_user(7, "ada@example.com");
        user.deleted_at = Some(Utc::now());
        repository
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));

        let service = UserService::new(Arc::new(repository));

        let result = service.get_user(UserId(7)).await;
        assert!(matches!(result, Err(UserError::NotFound(UserId(7)))));
    }

    #[tokio::test]
    async fn test_get_user_by_email_success() {
        let mut repository = MockTestUserRepository::new();

        let expected = stored_user(7, "ada@example.com");
        let returned = expected.clone();
        repository
            .expect_find_by_email()
            .times(1)
            .returning(move |_| Ok(Some(returned.clone())));

        let service = UserService::new(Arc::new(repository));

        let user = service
            .get_user_by_email("ada@example.com")
            .await
            .expect("get_user_by_email failed");
        assert_eq!(user, expected);
    }

    #[tokio::test]
    async fn test_get_user_by_email_not_found() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(None));

        let service = UserService::new(Arc::new(repository));

        let result = service.get_user_by_email("ghost@example.com").await;
        assert!(matches!(result, Err(UserError::NotFoundByEmail(_))));
    }

    #[tokio::test]
    async fn test_get_user_by_email_treats_soft_deleted_as_absent() {
        let mut repository = MockTestUserRepository::new();

        let mut user = stored_user(7, "ada@example.com");
        user.deleted_at = Some(Utc::now());
        repository
            .expect_find_by_email()
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));

        let service = UserService::new(Arc::new(repository));

        let result = service.get_user_by_email("ada@example.com").await;
        assert!(matches!(result, Err(UserError::NotFoundByEmail(_))));
    }

    #[tokio::test]
    async fn test_list_users_passes_totals_through_verbatim() {
        let mut repository = MockTestUserRepository::new();

        let page = PaginatedResult {
            items: vec![
                stored_user(1, "first@example.com"),
                stored_user(2, "second@example.com"),
            ],
            page: 1,
            page_size: 10,
            total_pages: 1,
            total_count: 2,
        };
        let returned = page.clone();
        repository
            .expect_list()
            .withf(|query| {
                *query
                    == ListUsersQuery {
                        page: 1,
                        page_size: 10,
                        age: None,
                        country: None,
                    }
            })
            .times(1)
            .returning(move |_| Ok(returned.clone()));

        let service = UserService::new(Arc::new(repository));

        let result = service
            .list_users(ListUsersQuery {
                page: 1,
                page_size: 10,
                age: None,
                country: None,
            })
            .await
            .expect("list_users failed");

        assert_eq!(result, page);
    }

    #[tokio::test]
    async fn test_update_user_merges_only_supplied_fields() {
        let mut repository = MockTestUserRepository::new();

        let existing = stored_user(7, "ada@example.com");
        let returned = existing.clone();
        repository
            .expect_find_by_id()
            .withf(|id| *id == UserId(7))
            .times(1)
            .returning(move |_| Ok(Some(returned.clone())));

        repository
            .expect_update()
            .withf(|user| {
                user.first_name == "Augusta"
                    && user.last_name == "Lovelace"
                    && user.age == 36
                    && user.email.as_str() == "ada@example.com"
                    && user.password_hash == "$argon2id$test_hash"
            })
            .times(1)
            .returning(|user| Ok(user));

        let service = UserService::new(Arc::new(repository));

        let command = UpdateUserCommand {
            first_name: Some("Augusta".to_string()),
            ..Default::default()
        };

        let updated = service
            .update_user(UserId(7), command)
            .await
            .expect("update_user failed");

        assert_eq!(updated.first_name, "Augusta");
        assert_eq!(updated.created_at, existing.created_at);
    }

    #[tokio::test]
    async fn test_update_user_with_empty_patch_is_a_noop() {
        let mut repository = MockTestUserRepository::new();

        let existing = stored_user(7, "ada@example.com");
        let found = existing.clone();
        repository
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(found.clone())));

        let unchanged = existing.clone();
        repository
            .expect_update()
            .withf(move |user| *user == unchanged)
            .times(1)
            .returning(|user| Ok(user));

        let service = UserService::new(Arc::new(repository));

        let updated = service
            .update_user(UserId(7), UpdateUserCommand::default())
            .await
            .expect("update_user failed");

        assert_eq!(updated, existing);
    }

    #[tokio::test]
    async fn test_update_user_not_found() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_id()
            .times(1)
            .returning(|_| Ok(None));
        repository.expect_update().times(0);

        let service = UserService::new(Arc::new(repository));

        let result = service
            .update_user(UserId(999), UpdateUserCommand::default())
            .await;
        assert!(matches!(result, Err(UserError::NotFound(UserId(999)))));
    }

    #[tokio::test]
    async fn test_delete_user_delegates_without_existence_check() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_delete()
            .withf(|id| *id == UserId(7))
            .times(1)
            .returning(|_| Ok(()));
        // No find_by_id expectation: the delete path never looks the user up.
        repository.expect_find_by_id().times(0);

        let service = UserService::new(Arc::new(repository));

        service
            .delete_user(UserId(7))
            .await
            .expect("delete_user failed");
    }

    #[tokio::test]
    async fn test_delete_user_on_missing_id_is_silent() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_delete()
            .times(1)
            .returning(|_| Ok(()));

        let service = UserService::new(Arc::new(repository));

        let result = service.delete_user(UserId(424242)).await;
        assert!(result.is_ok());
    }
}
