//! User repository for profile and role lookups.

use std::sync::Arc;

use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel, Set};
use uuid::Uuid;

use folio_core::auth::{AdminAllowlist, Principal, UserRole};
use folio_shared::types::UserId;

use crate::entities::{sea_orm_active_enums::UserRole as DbUserRole, users};

/// User repository for profile operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: Arc<DatabaseConnection>,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Finds a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find_by_id(id).one(self.db.as_ref()).await
    }

    /// Loads the caller's principal with the role as currently stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn principal(&self, id: Uuid) -> Result<Option<Principal>, DbErr> {
        Ok(self.find_by_id(id).await?.map(to_principal))
    }

    /// Returns the profile for a signed-in user, creating it on first sight.
    ///
    /// Allowlisted emails are promoted to admin; an existing admin is never
    /// demoted.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn ensure_profile(
        &self,
        id: Uuid,
        email: Option<&str>,
        allowlist: &AdminAllowlist,
    ) -> Result<users::Model, DbErr> {
        let now = Utc::now().into();

        let Some(existing) = self.find_by_id(id).await? else {
            let role = allowlist.resolve_role(UserRole::User, email);
            let user = users::ActiveModel {
                id: Set(id),
                email: Set(email.map(str::to_string)),
                full_name: Set(None),
                avatar_url: Set(None),
                role: Set(to_db_role(role)),
                created_at: Set(now),
                updated_at: Set(now),
            };
            tracing::info!(user_id = %id, role = ?role, "Created profile");
            return user.insert(self.db.as_ref()).await;
        };

        let current = from_db_role(existing.role);
        let role = allowlist.resolve_role(current, email.or(existing.email.as_deref()));
        let email_changed = email.is_some() && existing.email.as_deref() != email;
        if role == current && !email_changed {
            return Ok(existing);
        }

        let mut user = existing.into_active_model();
        if role != current {
            tracing::info!(user_id = %id, "Promoted allowlisted profile to admin");
            user.role = Set(to_db_role(role));
        }
        if email_changed {
            user.email = Set(email.map(str::to_string));
        }
        user.updated_at = Set(now);
        user.update(self.db.as_ref()).await
    }

    /// Updates profile fields; `None` if the user does not exist.
    ///
    /// An empty avatar URL clears it.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub async fn update_profile(
        &self,
        id: Uuid,
        full_name: Option<String>,
        avatar_url: Option<String>,
    ) -> Result<Option<users::Model>, DbErr> {
        let Some(existing) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        let mut user = existing.into_active_model();
        if let Some(name) = full_name {
            user.full_name = Set(Some(name));
        }
        if let Some(url) = avatar_url {
            user.avatar_url = Set(Some(url).filter(|u| !u.is_empty()));
        }
        user.updated_at = Set(Utc::now().into());
        user.update(self.db.as_ref()).await.map(Some)
    }
}

/// Converts a stored user into the caller principal.
#[must_use]
pub fn to_principal(model: users::Model) -> Principal {
    Principal {
        user_id: UserId::from_uuid(model.id),
        email: model.email,
        role: from_db_role(model.role),
    }
}

const fn to_db_role(role: UserRole) -> DbUserRole {
    match role {
        UserRole::User => DbUserRole::User,
        UserRole::Admin => DbUserRole::Admin,
    }
}

const fn from_db_role(role: DbUserRole) -> UserRole {
    match role {
        DbUserRole::User => UserRole::User,
        DbUserRole::Admin => UserRole::Admin,
    }
}
