//! # User Service
//!
//! Account and profile changes for the authenticated user.
//!
//! Accounts come from the identity provider; a token whose subject has no
//! row here fails with `UserNotFound`. The profile is optional and created
//! empty on the first profile update.

use chrono::Utc;
use stockroom_core::input::{EmailChange, PasswordChange, ProfilePatch};
use stockroom_core::{CoreError, User, UserAccount, UserId, UserProfile, UserSummary};
use stockroom_db::password::{hash_password, verify_password};
use stockroom_db::{Database, DbError};
use tracing::info;

use super::{ServiceError, ServiceResult};

/// Account operations for authenticated users.
#[derive(Debug, Clone)]
pub struct UserService {
    db: Database,
}

impl UserService {
    pub fn new(db: Database) -> Self {
        UserService { db }
    }

    async fn user(&self, user_id: UserId) -> ServiceResult<User> {
        self.db
            .users()
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| CoreError::UserNotFound(user_id).into())
    }

    /// Account basics plus username and avatar when a profile exists.
    pub async fn get_user(&self, user_id: UserId) -> ServiceResult<UserSummary> {
        let user = self.user(user_id).await?;
        let profile = self.db.profiles().find_by_user(user_id).await?;
        Ok(UserSummary::new(&user, profile.as_ref()))
    }

    /// Creates the profile if needed, then writes the present fields.
    pub async fn update_profile(
        &self,
        user_id: UserId,
        patch: &ProfilePatch,
    ) -> ServiceResult<UserProfile> {
        if patch.is_empty() {
            return Err(CoreError::EmptyPatch.into());
        }

        let changes = patch.validate()?;
        self.user(user_id).await?;

        let profiles = self.db.profiles();
        if let Some(username) = &changes.username {
            if profiles.username_taken_by_other(username, user_id).await? {
                return Err(duplicate_username(username));
            }
        }

        profiles.ensure(user_id).await?;
        profiles
            .apply_changes(user_id, &changes)
            .await
            .map_err(|e| match &changes.username {
                Some(username) if e.is_unique_violation_on("advanced_users_profile.username") => {
                    duplicate_username(username)
                }
                _ => e.into(),
            })?;

        profiles
            .find_by_user(user_id)
            .await?
            .ok_or_else(|| DbError::not_found("Profile", user_id).into())
    }

    /// Replaces the account email with a different, unused one.
    pub async fn change_email(
        &self,
        user_id: UserId,
        request: &EmailChange,
    ) -> ServiceResult<UserAccount> {
        let email = request.validate()?;
        let user = self.user(user_id).await?;

        if user.email == email {
            return Err(CoreError::BusinessRule(
                "New email is the same as the current one".to_string(),
            )
            .into());
        }

        let users = self.db.users();
        if users.email_taken(&email).await? {
            return Err(CoreError::DuplicateEmail.into());
        }

        users
            .update_email(user_id, &email, Utc::now())
            .await
            .map_err(|e| {
                if e.is_unique_violation_on("users.email") {
                    CoreError::DuplicateEmail.into()
                } else {
                    ServiceError::from(e)
                }
            })?;

        info!(user_id, "Email changed");
        Ok(self.user(user_id).await?.into())
    }

    /// Replaces the password after checking the current one.
    pub async fn change_password(
        &self,
        user_id: UserId,
        request: &PasswordChange,
    ) -> ServiceResult<UserAccount> {
        let change = request.validate()?;
        let user = self.user(user_id).await?;

        if change.current == change.new {
            return Err(CoreError::BusinessRule(
                "New password must differ from the current one".to_string(),
            )
            .into());
        }

        // Argon2 is deliberately slow; keep it off the async workers
        let stored = user.password_hash.clone();
        let new_hash = tokio::task::spawn_blocking(move || {
            if verify_password(&change.current, &stored) {
                hash_password(&change.new).map(Some)
            } else {
                Ok(None)
            }
        })
        .await
        .map_err(|e| ServiceError::Internal(format!("Password task failed: {}", e)))??;

        let Some(new_hash) = new_hash else {
            return Err(
                CoreError::BusinessRule("Current password is incorrect".to_string()).into(),
            );
        };

        self.db
            .users()
            .update_password_hash(user_id, &new_hash, Utc::now())
            .await?;

        info!(user_id, "Password changed");
        Ok(self.user(user_id).await?.into())
    }
}

fn duplicate_username(username: &str) -> ServiceError {
    CoreError::DuplicateUsername {
        username: username.to_string(),
    }
    .into()
}
