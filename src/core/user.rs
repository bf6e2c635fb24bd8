//! User accounts and the single-owner invariant.
//!
//! Names are stored trimmed and lowercased and are unique. At most one account
//! may hold the admin role; the rule is enforced here, at creation time, so the
//! rest of the system can rely on the owner id injected into
//! [`crate::core::context::AppContext`].

use crate::{
    entities::{User, Worker, user, worker},
    errors::{Error, Result},
};
use sea_orm::{Set, prelude::*};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::info;

/// Role an account acts in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The shop owner
    Admin,
    /// Shop staff
    #[default]
    Worker,
}

impl Role {
    /// Value stored in the `role` column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Worker => "worker",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trims and lowercases a login or worker name.
pub fn normalize_name(name: &str) -> Result<String> {
    let normalized = name.trim().to_lowercase();
    if normalized.is_empty() {
        return Err(Error::validation("Name cannot be empty"));
    }
    Ok(normalized)
}

/// Creates a new account.
///
/// Fails with [`Error::Conflict`] when the name is taken by an account or a
/// worker profile, or when a second admin is requested.
pub async fn register_user<C>(
    db: &C,
    name: &str,
    role: Role,
    shop_id: Option<String>,
) -> Result<user::Model>
where
    C: ConnectionTrait,
{
    let name = normalize_name(name)?;

    // Worker profiles share the account namespace
    let profile_named = Worker::find()
        .filter(worker::Column::Name.eq(name.as_str()))
        .one(db)
        .await?;
    if get_user_by_name(db, &name).await?.is_some() || profile_named.is_some() {
        return Err(Error::Conflict {
            message: "Name already exists. Choose a different one.".to_string(),
        });
    }

    if role == Role::Admin && find_admin(db).await?.is_some() {
        return Err(Error::Conflict {
            message: "Only one admin account is allowed".to_string(),
        });
    }

    let shop_id = shop_id
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    let account = user::ActiveModel {
        name: Set(name),
        role: Set(role.as_str().to_string()),
        shop_id: Set(shop_id),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    account.insert(db).await.map_err(Into::into)
}

/// Returns the owner account, creating it under `name` on first start.
///
/// An existing admin is reused even if its name differs from `name`.
pub async fn ensure_owner<C>(db: &C, name: &str) -> Result<user::Model>
where
    C: ConnectionTrait,
{
    if let Some(admin) = find_admin(db).await? {
        return Ok(admin);
    }
    let owner = register_user(db, name, Role::Admin, None).await?;
    info!(owner_id = owner.id, name = %owner.name, "Seeded owner account");
    Ok(owner)
}

/// Finds the admin account, if one exists.
pub async fn find_admin<C>(db: &C) -> Result<Option<user::Model>>
where
    C: ConnectionTrait,
{
    User::find()
        .filter(user::Column::Role.eq(Role::Admin.as_str()))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds an account by its (already normalized) name.
pub async fn get_user_by_name<C>(db: &C, name: &str) -> Result<Option<user::Model>>
where
    C: ConnectionTrait,
{
    User::find()
        .filter(user::Column::Name.eq(name))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Loads an account or fails with [`Error::NotFound`].
pub async fn require_user<C>(db: &C, user_id: i64) -> Result<user::Model>
where
    C: ConnectionTrait,
{
    User::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("User", user_id))
}

/// Loads an account and checks it is the admin.
pub async fn require_admin<C>(db: &C, user_id: i64) -> Result<user::Model>
where
    C: ConnectionTrait,
{
    match User::find_by_id(user_id).one(db).await? {
        Some(account) if account.role == Role::Admin.as_str() => Ok(account),
        _ => Err(Error::Unauthorized),
    }
}

/// Allows an operation on a record entered by `record_user_id` when the
/// actor entered it themselves or is the admin.
pub async fn require_self_or_admin<C>(db: &C, actor_id: i64, record_user_id: i64) -> Result<()>
where
    C: ConnectionTrait,
{
    if actor_id == record_user_id {
        return Ok(());
    }
    require_admin(db, actor_id).await.map(|_| ())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_register_normalizes_name() -> Result<()> {
        let db = setup_test_db().await?;
        let account = register_user(&db, "  Ravi ", Role::Worker, Some("shop1".into())).await?;
        assert_eq!(account.name, "ravi");
        assert_eq!(account.role, "worker");
        assert_eq!(account.shop_id.as_deref(), Some("shop1"));
        Ok(())
    }

    #[tokio::test]
    async fn test_register_duplicate_name_conflicts() -> Result<()> {
        let db = setup_test_db().await?;
        register_user(&db, "ravi", Role::Worker, None).await?;
        let result = register_user(&db, "RAVI", Role::Worker, None).await;
        assert!(matches!(result.unwrap_err(), Error::Conflict { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn test_only_one_admin() -> Result<()> {
        let db = setup_test_db().await?;
        register_user(&db, "owner", Role::Admin, None).await?;
        let result = register_user(&db, "second", Role::Admin, None).await;
        assert!(matches!(result.unwrap_err(), Error::Conflict { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn test_ensure_owner_is_idempotent() -> Result<()> {
        let db = setup_test_db().await?;
        let first = ensure_owner(&db, "owner").await?;
        let second = ensure_owner(&db, "someone-else").await?;
        assert_eq!(first.id, second.id);
        assert_eq!(second.name, "owner");
        Ok(())
    }

    #[tokio::test]
    async fn test_require_admin_rejects_worker() -> Result<()> {
        let db = setup_test_db().await?;
        let worker = register_user(&db, "ravi", Role::Worker, None).await?;
        let owner = ensure_owner(&db, "owner").await?;

        assert!(matches!(
            require_admin(&db, worker.id).await.unwrap_err(),
            Error::Unauthorized
        ));
        assert_eq!(require_admin(&db, owner.id).await?.id, owner.id);
        Ok(())
    }

    #[test]
    fn test_normalize_name_rejects_blank() {
        assert!(matches!(
            normalize_name("   ").unwrap_err(),
            Error::Validation { .. }
        ));
    }
}
