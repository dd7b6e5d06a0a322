use std::collections::BTreeMap;
use std::sync::atomic::AtomicI32;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use auth::Authenticator;
use user_management::domain::user::models::ListUsersQuery;
use user_management::domain::user::models::PaginatedResult;
use user_management::domain::user::models::User;
use user_management::domain::user::models::UserId;
use user_management::domain::user::ports::UserRepository;
use user_management::domain::user::ports::UserServicePort;
use user_management::domain::user::service::UserService;
use user_management::inbound::http::router::create_router;
use user_management::user::errors::UserError;

pub const TEST_JWT_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";
pub const TEST_JWT_EXPIRATION_MINUTES: i64 = 60;

/// In-memory stand-in for the relational store.
///
/// Implements the persistence port faithfully enough for end-to-end tests:
/// sequential id assignment, filtered pagination with store-side totals, and
/// silent deletes.
pub struct InMemoryUserRepository {
    users: Mutex<BTreeMap<i32, User>>,
    next_id: AtomicI32,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: Mutex::new(BTreeMap::new()),
            next_id: AtomicI32::new(1),
        }
    }

    fn matches(user: &User, age: Option<i32>, country: Option<&str>) -> bool {
        age.map_or(true, |a| user.age == a) && country.map_or(true, |c| user.country == c)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> Result<User, UserError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let user = User {
            id: UserId(id),
            ..user
        };
        self.users.lock().unwrap().insert(id, user.clone());
        Ok(user)
    }

    async fn create_bulk(&self, users: Vec<User>) -> Result<Vec<User>, UserError> {
        let mut store = self.users.lock().unwrap();
        let created = users
            .into_iter()
            .map(|user| {
                let id = self.next_id.fetch_add(1, Ordering::SeqCst);
                let user = User {
                    id: UserId(id),
                    ..user
                };
                store.insert(id, user.clone());
                user
            })
            .collect();
        Ok(created)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserError> {
        Ok(self.users.lock().unwrap().get(&id.0).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|user| user.email.as_str() == email)
            .cloned())
    }

    async fn list(&self, query: ListUsersQuery) -> Result<PaginatedResult<User>, UserError> {
        let store = self.users.lock().unwrap();
        let filtered: Vec<User> = store
            .values()
            .filter(|user| Self::matches(user, query.age, query.country.as_deref()))
            .cloned()
            .collect();

        let total_count = filtered.len() as i32;
        let total_pages = if query.page_size > 0 {
            (total_count + query.page_size - 1) / query.page_size
        } else {
            0
        };

        let offset = ((query.page - 1).max(0) * query.page_size.max(0)) as usize;
        let items = filtered
            .into_iter()
            .skip(offset)
            .take(query.page_size.max(0) as usize)
            .collect();

        Ok(PaginatedResult {
            items,
            page: query.page,
            page_size: query.page_size,
            total_pages,
            total_count,
        })
    }

    async fn update(&self, user: User) -> Result<User, UserError> {
        let mut store = self.users.lock().unwrap();
        if !store.contains_key(&user.id.0) {
            return Err(UserError::NotFound(user.id));
        }
        store.insert(user.id.0, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: UserId) -> Result<(), UserError> {
        self.users.lock().unwrap().remove(&id.0);
        Ok(())
    }
}

/// Test application that spawns a real server on a random port
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let repository = Arc::new(InMemoryUserRepository::new());
        let user_service: Arc<dyn UserServicePort> = Arc::new(UserService::new(repository));
        let authenticator = Arc::new(Authenticator::new(TEST_JWT_SECRET));

        let router = create_router(user_service, authenticator, TEST_JWT_EXPIRATION_MINUTES);

        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
        }
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Helper to make PUT request with Bearer token
    pub fn put_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .put(format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Helper to make DELETE request with Bearer token
    pub fn delete_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .delete(format!("{}{}", self.address, path))
            .bearer_auth(token)
    }
}
