use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::ListUsersQuery;
use crate::domain::user::models::PaginatedResult;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i32,
    first_name: String,
    last_name: String,
    age: i32,
    country: String,
    province: String,
    city: String,
    email: String,
    password_hash: String,
    created_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl UserRow {
    fn try_into_user(self) -> Result<User, UserError> {
        Ok(User {
            id: UserId(self.id),
            first_name: self.first_name,
            last_name: self.last_name,
            age: self.age,
            country: self.country,
            province: self.province,
            city: self.city,
            email: EmailAddress::new(self.email)?,
            password_hash: self.password_hash,
            created_at: self.created_at,
            deleted_at: self.deleted_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct TotalsRow {
    total_count: i64,
    total_pages: i32,
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: User) -> Result<User, UserError> {
        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO users (first_name, last_name, age, country, province, city, email, password_hash, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id
            "#,
        )
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.age)
        .bind(&user.country)
        .bind(&user.province)
        .bind(&user.city)
        .bind(user.email.as_str())
        .bind(&user.password_hash)
        .bind(user.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        Ok(User {
            id: UserId(id),
            ..user
        })
    }

    async fn create_bulk(&self, users: Vec<User>) -> Result<Vec<User>, UserError> {
        let count = users.len();
        let mut first_names = Vec::with_capacity(count);
        let mut last_names = Vec::with_capacity(count);
        let mut ages = Vec::with_capacity(count);
        let mut countries = Vec::with_capacity(count);
        let mut provinces = Vec::with_capacity(count);
        let mut cities = Vec::with_capacity(count);
        let mut emails = Vec::with_capacity(count);
        let mut password_hashes = Vec::with_capacity(count);
        let mut created_ats = Vec::with_capacity(count);

        for user in users {
            first_names.push(user.first_name);
            last_names.push(user.last_name);
            ages.push(user.age);
            countries.push(user.country);
            provinces.push(user.province);
            cities.push(user.city);
            emails.push(user.email.into_string());
            password_hashes.push(user.password_hash);
            created_ats.push(user.created_at);
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        // The whole batch loads under one table lock and one transaction.
        sqlx::query("LOCK TABLE users IN EXCLUSIVE MODE")
            .execute(&mut *tx)
            .await
            .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (first_name, last_name, age, country, province, city, email, password_hash, created_at)
            SELECT * FROM UNNEST(
                $1::text[], $2::text[], $3::int4[], $4::text[], $5::text[],
                $6::text[], $7::text[], $8::text[], $9::timestamptz[]
            )
            RETURNING id, first_name, last_name, age, country, province, city, email, password_hash, created_at, deleted_at
            "#,
        )
        .bind(&first_names)
        .bind(&last_names)
        .bind(&ages)
        .bind(&countries)
        .bind(&provinces)
        .bind(&cities)
        .bind(&emails)
        .bind(&password_hashes)
        .bind(&created_ats)
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        rows.into_iter().map(UserRow::try_into_user).collect()
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, first_name, last_name, age, country, province, city, email, password_hash, created_at, deleted_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        row.map(UserRow::try_into_user).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, first_name, last_name, age, country, province, city, email, password_hash, created_at, deleted_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        row.map(UserRow::try_into_user).transpose()
    }

    async fn list(&self, query: ListUsersQuery) -> Result<PaginatedResult<User>, UserError> {
        // Totals come from the store; the service never recomputes them.
        let totals = sqlx::query_as::<_, TotalsRow>(
            r#"
            SELECT COUNT(*) AS total_count,
                   COALESCE(CEIL(COUNT(*)::numeric / NULLIF($1, 0)), 0)::int4 AS total_pages
            FROM users
            WHERE ($2::int4 IS NULL OR age = $2)
              AND ($3::text IS NULL OR country = $3)
            "#,
        )
        .bind(query.page_size)
        .bind(query.age)
        .bind(query.country.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        let offset = (query.page as i64 - 1) * query.page_size as i64;
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, first_name, last_name, age, country, province, city, email, password_hash, created_at, deleted_at
            FROM users
            WHERE ($1::int4 IS NULL OR age = $1)
              AND ($2::text IS NULL OR country = $2)
            ORDER BY id
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(query.age)
        .bind(query.country.as_deref())
        .bind(query.page_size as i64)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        let items = rows
            .into_iter()
            .map(UserRow::try_into_user)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(PaginatedResult {
            items,
            page: query.page,
            page_size: query.page_size,
            total_pages: totals.total_pages,
            total_count: totals.total_count as i32,
        })
    }

    async fn update(&self, user: User) -> Result<User, UserError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET first_name = $2, last_name = $3, age = $4, country = $5, province = $6,
                city = $7, email = $8, password_hash = $9, created_at = $10
            WHERE id = $1
            "#,
        )
        .bind(user.id.0)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.age)
        .bind(&user.country)
        .bind(&user.province)
        .bind(&user.city)
        .bind(user.email.as_str())
        .bind(&user.password_hash)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(UserError::NotFound(user.id));
        }

        Ok(user)
    }

    async fn delete(&self, id: UserId) -> Result<(), UserError> {
        // Hard delete; a missing id is a no-op, so rows_affected is ignored.
        sqlx::query(
            r#"
            DELETE FROM users
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .execute(&self.pool)
        .await
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        Ok(())
    }
}
