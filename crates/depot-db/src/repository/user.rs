//! # User Repository
//!
//! Accounts, roles and stored credentials.
//!
//! ## Login
//! ```text
//! authenticate(username, password)
//!      │
//!      ├── no such user ──────────────► None
//!      ├── Credential::from_stored(row.password).verify(password) == false ─► None
//!      │
//!      ├── Legacy credential ─► hash with bcrypt, UPDATE users.password
//!      ▼
//! Some(ActorContext { user_id, role })
//! ```
//!
//! Rows written by older builds may hold a plaintext password. They keep
//! working and are upgraded on the first successful login.

use sqlx::{FromRow, SqlitePool};
use tracing::{debug, info, warn};

use crate::error::DbResult;
use depot_core::validation::{validate_password, validate_username};
use depot_core::{ActorContext, CoreError, Credential, Role, User};

#[derive(Debug, FromRow)]
struct UserRow {
    id: i64,
    username: String,
    role: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            username: row.username,
            role: Role::from_stored(&row.role),
        }
    }
}

#[derive(FromRow)]
struct LoginRow {
    id: i64,
    password: String,
    role: String,
}

/// Repository for user accounts.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
    hash_cost: u32,
}

impl UserRepository {
    /// Creates a new UserRepository hashing new passwords at `hash_cost`.
    pub fn new(pool: SqlitePool, hash_cost: u32) -> Self {
        UserRepository { pool, hash_cost }
    }

    /// Self-service sign-up. The role is always `USER`.
    pub async fn register(&self, username: &str, password: &str) -> DbResult<User> {
        self.create_user(username, password, Role::User).await
    }

    /// Creates an account with an explicit role.
    pub async fn create_user(&self, username: &str, password: &str, role: Role) -> DbResult<User> {
        let username = validate_username(username)?;
        validate_password(password)?;

        let credential = Credential::hash(password, self.hash_cost)?;

        let mut tx = self.pool.begin().await?;

        let existing: Option<i64> = sqlx::query_scalar("SELECT id FROM users WHERE username = ?1")
            .bind(username)
            .fetch_optional(&mut *tx)
            .await?;

        if existing.is_some() {
            warn!(username, "Username already taken");
            return Err(CoreError::duplicate("User", username).into());
        }

        let row: UserRow = sqlx::query_as(
            r#"
            INSERT INTO users (username, password, role)
            VALUES (?1, ?2, ?3)
            RETURNING id, username, role
            "#,
        )
        .bind(username)
        .bind(credential.as_stored())
        .bind(role.as_stored())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(user_id = row.id, username, role = %role, "User created");
        Ok(row.into())
    }

    /// Checks a username/password pair.
    ///
    /// Returns `None` for an unknown user or a wrong password; the two are
    /// not distinguished.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> DbResult<Option<ActorContext>> {
        debug!(username, "Authenticating");

        let row: Option<LoginRow> =
            sqlx::query_as("SELECT id, password, role FROM users WHERE username = ?1")
                .bind(username.trim())
                .fetch_optional(&self.pool)
                .await?;

        let Some(row) = row else {
            warn!(username, "Login for unknown user");
            return Ok(None);
        };

        let credential = Credential::from_stored(&row.password);
        if !credential.verify(password) {
            warn!(user_id = row.id, "Login with wrong password");
            return Ok(None);
        }

        if credential.needs_rehash() {
            let upgraded = Credential::hash(password, self.hash_cost)?;
            sqlx::query("UPDATE users SET password = ?2 WHERE id = ?1")
                .bind(row.id)
                .bind(upgraded.as_stored())
                .execute(&self.pool)
                .await?;
            info!(user_id = row.id, "Plaintext password upgraded to bcrypt");
        }

        Ok(Some(ActorContext::new(row.id, Role::from_stored(&row.role))))
    }

    /// Replaces the password after checking the current one.
    pub async fn change_password(
        &self,
        user_id: i64,
        current: &str,
        new_password: &str,
    ) -> DbResult<()> {
        validate_password(new_password)?;

        let stored: Option<String> = sqlx::query_scalar("SELECT password FROM users WHERE id = ?1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        let stored = stored.ok_or_else(|| CoreError::UserNotFound(user_id.to_string()))?;

        if !Credential::from_stored(&stored).verify(current) {
            warn!(user_id, "Password change with wrong current password");
            return Err(CoreError::InvalidCredentials.into());
        }

        let credential = Credential::hash(new_password, self.hash_cost)?;
        sqlx::query("UPDATE users SET password = ?2 WHERE id = ?1")
            .bind(user_id)
            .bind(credential.as_stored())
            .execute(&self.pool)
            .await?;

        info!(user_id, "Password changed");
        Ok(())
    }

    pub async fn promote_to_admin(&self, username: &str) -> DbResult<User> {
        let row: Option<UserRow> = sqlx::query_as(
            r#"
            UPDATE users SET role = ?2
            WHERE username = ?1
            RETURNING id, username, role
            "#,
        )
        .bind(username.trim())
        .bind(Role::Admin.as_stored())
        .fetch_optional(&self.pool)
        .await?;

        let user = row
            .map(User::from)
            .ok_or_else(|| CoreError::UserNotFound(username.to_string()))?;

        info!(user_id = user.id, username, "User promoted to admin");
        Ok(user)
    }

    /// Deletes an account. Its sales and distributions stay, unattributed.
    pub async fn delete_user(&self, user_id: i64) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::UserNotFound(user_id.to_string()).into());
        }

        info!(user_id, "User deleted");
        Ok(())
    }

    pub async fn list(&self) -> DbResult<Vec<User>> {
        let rows: Vec<UserRow> = sqlx::query_as("SELECT id, username, role FROM users ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    pub async fn get_by_username(&self, username: &str) -> DbResult<Option<User>> {
        let row: Option<UserRow> =
            sqlx::query_as("SELECT id, username, role FROM users WHERE username = ?1")
                .bind(username.trim())
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(User::from))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
