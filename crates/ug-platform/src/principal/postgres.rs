//! PostgreSQL Principal Repository
//!
//! Expects a `users` table shaped like:
//!
//! ```sql
//! CREATE TABLE users (
//!     id              BIGSERIAL PRIMARY KEY,
//!     name            TEXT NOT NULL,
//!     email           TEXT NOT NULL UNIQUE,
//!     role            TEXT NOT NULL DEFAULT 'BASIC',
//!     suspended_at    TIMESTAMPTZ,
//!     last_logged_at  TIMESTAMPTZ,
//!     password_digest TEXT NOT NULL
//! );
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{postgres::PgRow, PgPool, Row};
use tracing::debug;

use crate::principal::entity::{NewPrincipal, Principal, Role};
use crate::principal::repository::{PrincipalFilter, PrincipalRepository};
use crate::shared::error::{PlatformError, Result};

const COLUMNS: &str = "id, name, email, role, suspended_at, last_logged_at, password_digest";

pub struct PgPrincipalRepository {
    pool: PgPool,
}

impl PgPrincipalRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn parse_row(row: &PgRow) -> Result<Principal> {
        let role: String = row.try_get("role")?;
        let role = Role::parse(&role)
            .ok_or_else(|| PlatformError::internal(format!("Unknown role in users table: {}", role)))?;

        Ok(Principal {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            role,
            suspended_at: row.try_get("suspended_at")?,
            last_logged_at: row.try_get("last_logged_at")?,
            password_digest: row.try_get("password_digest")?,
        })
    }
}

#[async_trait]
impl PrincipalRepository for PgPrincipalRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Principal>> {
        let row = sqlx::query(&format!("SELECT {} FROM users WHERE id = $1", COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(Self::parse_row).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Principal>> {
        let row = sqlx::query(&format!("SELECT {} FROM users WHERE email = $1", COLUMNS))
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(Self::parse_row).transpose()
    }

    async fn create(&self, new: NewPrincipal) -> Result<Principal> {
        let query = format!(
            "INSERT INTO users (name, email, role, password_digest) VALUES ($1, $2, $3, $4) RETURNING {}",
            COLUMNS
        );
        let row = sqlx::query(&query)
            .bind(&new.name)
            .bind(&new.email)
            .bind(new.role.as_str())
            .bind(&new.password_digest)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(db) if db.is_unique_violation() => {
                    PlatformError::duplicate("User", "email", new.email.clone())
                }
                other => PlatformError::Database(other),
            })?;

        let principal = Self::parse_row(&row)?;
        debug!(user_id = principal.id, "Inserted user");
        Ok(principal)
    }

    async fn update_suspended_at(&self, id: i64, value: Option<DateTime<Utc>>) -> Result<Principal> {
        let query = format!("UPDATE users SET suspended_at = $1 WHERE id = $2 RETURNING {}", COLUMNS);
        let row = sqlx::query(&query)
            .bind(value)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| PlatformError::not_found("User", id.to_string()))?;
        Self::parse_row(&row)
    }

    async fn record_login(&self, id: i64, at: DateTime<Utc>) -> Result<()> {
        let result = sqlx::query("UPDATE users SET last_logged_at = $1 WHERE id = $2")
            .bind(at)
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(PlatformError::not_found("User", id.to_string()));
        }
        Ok(())
    }

    async fn count(&self, filter: PrincipalFilter) -> Result<i64> {
        let count: i64 = match filter {
            PrincipalFilter::All => {
                sqlx::query_scalar("SELECT COUNT(*) FROM users")
                    .fetch_one(&self.pool)
                    .await?
            }
            PrincipalFilter::Id(id) => {
                sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE id = $1")
                    .bind(id)
                    .fetch_one(&self.pool)
                    .await?
            }
        };
        Ok(count)
    }

    async fn list(&self, filter: PrincipalFilter, skip: i64, take: i64) -> Result<Vec<Principal>> {
        let rows = match filter {
            PrincipalFilter::All => {
                let query = format!("SELECT {} FROM users ORDER BY id ASC OFFSET $1 LIMIT $2", COLUMNS);
                sqlx::query(&query)
                    .bind(skip)
                    .bind(take)
                    .fetch_all(&self.pool)
                    .await?
            }
            PrincipalFilter::Id(id) => {
                let query = format!(
                    "SELECT {} FROM users WHERE id = $1 ORDER BY id ASC OFFSET $2 LIMIT $3",
                    COLUMNS
                );
                sqlx::query(&query)
                    .bind(id)
                    .bind(skip)
                    .bind(take)
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        let principals = rows.iter().map(Self::parse_row).collect::<Result<Vec<_>>>()?;

        debug!(
            ?filter,
            skip,
            take,
            count = principals.len(),
            "Fetched users"
        );

        Ok(principals)
    }
}
