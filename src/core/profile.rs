//! Worker profiles and the acting-worker lookup.
//!
//! An account can exist without a worker profile (for example one created
//! through registration). Instead of treating such accounts as "virtual"
//! workers everywhere, [`ensure_worker_profile`] materializes the profile the
//! first time an operation needs it.

use crate::{
    entities::{User, Worker, user, worker},
    errors::{Error, Result},
};
use sea_orm::{Set, prelude::*};
use tracing::debug;

/// The worker performing an operation, with the shop it acts for.
#[derive(Clone, Debug)]
pub struct ActingWorker {
    /// Account of the caller
    pub user: user::Model,
    /// Worker profile of the caller
    pub worker: worker::Model,
    /// Shop whose fund and stock the caller touches
    pub shop_id: String,
}

/// Returns the worker profile for `account`, creating a default one if missing.
pub async fn ensure_worker_profile<C>(db: &C, account: &user::Model) -> Result<worker::Model>
where
    C: ConnectionTrait,
{
    if let Some(existing) = Worker::find()
        .filter(worker::Column::UserId.eq(account.id))
        .one(db)
        .await?
    {
        return Ok(existing);
    }

    debug!(user_id = account.id, "Materializing worker profile");
    let profile = worker::ActiveModel {
        user_id: Set(account.id),
        name: Set(account.name.clone()),
        phone: Set(String::new()),
        position: Set("Worker".to_string()),
        salary: Set(0.0),
        join_date: Set(account.created_at.date_naive()),
        is_active: Set(true),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    profile.insert(db).await.map_err(Into::into)
}

/// Resolves the caller's worker profile and shop.
///
/// Fails with [`Error::NotFound`] for an unknown account and
/// [`Error::ShopNotFound`] when the account has no shop.
pub async fn acting_worker<C>(db: &C, user_id: i64) -> Result<ActingWorker>
where
    C: ConnectionTrait,
{
    let account = User::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("Worker", user_id))?;
    let worker = ensure_worker_profile(db, &account).await?;
    let shop_id = account
        .shop_id
        .clone()
        .ok_or(Error::ShopNotFound { user_id })?;

    Ok(ActingWorker {
        user: account,
        worker,
        shop_id,
    })
}

/// Worker profile of the account that recorded a transaction.
///
/// Unlike [`acting_worker`] this does not need the account to still have a
/// shop: records carry the shop they were booked against.
pub async fn recorder_profile<C>(db: &C, user_id: i64) -> Result<worker::Model>
where
    C: ConnectionTrait,
{
    let account = crate::core::user::require_user(db, user_id).await?;
    ensure_worker_profile(db, &account).await
}
