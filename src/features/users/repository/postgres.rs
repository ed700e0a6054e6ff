use async_trait::async_trait;
use uuid::Uuid;

use crate::core::database::{contains_pattern, PostgresDb};
use crate::core::error::{map_db_error, AppError, Result};
use crate::features::users::models::{User, UserQuery, UserRole};

use super::AbstractUsers;

const USER_COLUMNS: &str =
    "id, email, name, mobile_number, role, is_suspended, created_at, updated_at";

const EMAIL_IN_USE: &str = "Email already in use by another user";

#[async_trait]
impl AbstractUsers for PostgresDb {
    async fn insert_user(&self, user: &User) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, email, name, mobile_number, role, is_suspended, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.name)
        .bind(&user.mobile_number)
        .bind(user.role)
        .bind(user.is_suspended)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_db_error(e, EMAIL_IN_USE))?;

        Ok(())
    }

    async fn fetch_user(&self, id: Uuid) -> Result<Option<User>> {
        let query = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch user: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn fetch_users(&self, ids: &[Uuid]) -> Result<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let query = format!("SELECT {} FROM users WHERE id = ANY($1)", USER_COLUMNS);
        sqlx::query_as::<_, User>(&query)
            .bind(ids)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch users: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn update_user_contact(
        &self,
        id: Uuid,
        name: Option<&str>,
        email: &str,
        mobile_number: &str,
    ) -> Result<Option<User>> {
        let query = format!(
            r#"
            UPDATE users
            SET name = COALESCE($2, name), email = $3, mobile_number = $4, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(name)
            .bind(email)
            .bind(mobile_number)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_db_error(e, EMAIL_IN_USE))
    }

    async fn list_users(&self, query: &UserQuery) -> Result<(Vec<User>, i64)> {
        let pattern = query.search.as_deref().map(contains_pattern);

        let total: i64 = sqlx::query_scalar(
            r"SELECT COUNT(*) FROM users WHERE ($1::text IS NULL OR name ILIKE $1 ESCAPE '\' OR email ILIKE $1 ESCAPE '\')",
        )
        .bind(&pattern)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)?;

        let sql = format!(
            r#"
            SELECT {}
            FROM users
            WHERE ($1::text IS NULL OR name ILIKE $1 ESCAPE '\' OR email ILIKE $1 ESCAPE '\')
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
            USER_COLUMNS
        );
        let users = sqlx::query_as::<_, User>(&sql)
            .bind(&pattern)
            .bind(query.limit)
            .bind(query.offset)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list users: {:?}", e);
                AppError::Database(e)
            })?;

        Ok((users, total))
    }

    async fn set_user_role(&self, id: Uuid, role: UserRole) -> Result<Option<User>> {
        let query = format!(
            "UPDATE users SET role = $2, updated_at = NOW() WHERE id = $1 RETURNING {}",
            USER_COLUMNS
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(role)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn set_user_suspended(&self, id: Uuid, is_suspended: bool) -> Result<Option<User>> {
        let query = format!(
            "UPDATE users SET is_suspended = $2, updated_at = NOW() WHERE id = $1 RETURNING {}",
            USER_COLUMNS
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(is_suspended)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn delete_user(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        Ok(result.rows_affected() > 0)
    }

    async fn count_users(&self) -> Result<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
