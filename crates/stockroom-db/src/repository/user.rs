//! # User Repository
//!
//! Accounts and their optional profile.
//!
//! Accounts are normally created by the identity provider; [`UserRepository::insert`]
//! exists for seeding and tests.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use stockroom_core::{ProfileChanges, User, UserId, UserProfile};

const USER_COLUMNS: &str = r#"
    id, email, password_hash, plan_code, plan_expires, is_admin,
    created_at, updated_at, last_login
"#;

const PROFILE_COLUMNS: &str = r#"
    id, user_id, username, avatar_url, address, country, phone_number
"#;

/// Repository for the `users` table.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Inserts an account on the free plan.
    pub async fn insert(
        &self,
        email: &str,
        password_hash: &str,
        now: DateTime<Utc>,
    ) -> DbResult<User> {
        debug!(email = %email, "Inserting user");

        let result = sqlx::query(
            r#"
            INSERT INTO users (email, password_hash, plan_code, is_admin, created_at, updated_at)
            VALUES (?1, ?2, 'free', 0, ?3, ?3)
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .bind(now)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        self.find_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("User", id))
    }

    /// Gets a user by id.
    pub async fn find_by_id(&self, id: UserId) -> DbResult<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE id = ?1", USER_COLUMNS);

        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Checks whether any account uses `email`.
    pub async fn email_taken(&self, email: &str) -> DbResult<bool> {
        let taken: i64 = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = ?1)")
            .bind(email)
            .fetch_one(&self.pool)
            .await?;

        Ok(taken != 0)
    }

    /// Replaces the account email.
    ///
    /// ## Returns
    /// * `Ok(true)` - Updated
    /// * `Ok(false)` - No such user
    /// * `Err(DbError::UniqueViolation)` - Email taken concurrently
    pub async fn update_email(&self, id: UserId, email: &str, now: DateTime<Utc>) -> DbResult<bool> {
        debug!(user_id = id, "Updating email");

        let result = sqlx::query("UPDATE users SET email = ?2, updated_at = ?3 WHERE id = ?1")
            .bind(id)
            .bind(email)
            .bind(now)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Replaces the stored password hash.
    pub async fn update_password_hash(
        &self,
        id: UserId,
        password_hash: &str,
        now: DateTime<Utc>,
    ) -> DbResult<bool> {
        debug!(user_id = id, "Updating password hash");

        let result =
            sqlx::query("UPDATE users SET password_hash = ?2, updated_at = ?3 WHERE id = ?1")
                .bind(id)
                .bind(password_hash)
                .bind(now)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Records a successful sign-in.
    pub async fn record_login(&self, id: UserId, now: DateTime<Utc>) -> DbResult<()> {
        sqlx::query("UPDATE users SET last_login = ?2 WHERE id = ?1")
            .bind(id)
            .bind(now)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

/// Repository for the `advanced_users_profile` table.
#[derive(Debug, Clone)]
pub struct ProfileRepository {
    pool: SqlitePool,
}

impl ProfileRepository {
    /// Creates a new ProfileRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProfileRepository { pool }
    }

    /// Gets the profile of a user, if one was ever created.
    pub async fn find_by_user(&self, user_id: UserId) -> DbResult<Option<UserProfile>> {
        let sql = format!(
            "SELECT {} FROM advanced_users_profile WHERE user_id = ?1",
            PROFILE_COLUMNS
        );

        let profile = sqlx::query_as::<_, UserProfile>(&sql)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(profile)
    }

    /// Returns the user's profile, creating an empty one first if needed.
    pub async fn ensure(&self, user_id: UserId) -> DbResult<UserProfile> {
        sqlx::query("INSERT OR IGNORE INTO advanced_users_profile (user_id) VALUES (?1)")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        self.find_by_user(user_id)
            .await?
            .ok_or_else(|| DbError::not_found("Profile", user_id))
    }

    /// Checks whether a user other than `user_id` holds `username`.
    pub async fn username_taken_by_other(&self, username: &str, user_id: UserId) -> DbResult<bool> {
        let taken: i64 = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM advanced_users_profile
                WHERE username = ?1 AND user_id <> ?2
            )
            "#,
        )
        .bind(username)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(taken != 0)
    }

    /// Writes the present fields of a validated profile patch.
    pub async fn apply_changes(&self, user_id: UserId, changes: &ProfileChanges) -> DbResult<bool> {
        debug!(user_id, "Updating profile");

        let result = sqlx::query(
            r#"
            UPDATE advanced_users_profile SET
                username     = COALESCE(?2, username),
                avatar_url   = CASE WHEN ?3 THEN ?4 ELSE avatar_url END,
                address      = CASE WHEN ?5 THEN ?6 ELSE address END,
                country      = CASE WHEN ?7 THEN ?8 ELSE country END,
                phone_number = COALESCE(?9, phone_number)
            WHERE user_id = ?1
            "#,
        )
        .bind(user_id)
        .bind(&changes.username)
        .bind(changes.avatar_url.is_some())
        .bind(changes.avatar_url.clone().flatten())
        .bind(changes.address.is_some())
        .bind(changes.address.clone().flatten())
        .bind(changes.country.is_some())
        .bind(changes.country.clone().flatten())
        .bind(&changes.phone_number)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

// =============================================================================
// Tests
// =============================================================================
