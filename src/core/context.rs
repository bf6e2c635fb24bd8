//! Shared application context and per-shop serialization.
//!
//! Every operation that reads a shop's balance and then writes to it holds a
//! [`ShopGuard`] for the whole sequence. Guards are handed out by an in-process
//! registry of async mutexes, one per shop id, so credits and debits against
//! the same shop run one at a time while different shops proceed in parallel.

use sea_orm::DatabaseConnection;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::trace;

/// Everything a core operation needs besides its own arguments.
#[derive(Clone, Debug)]
pub struct AppContext {
    /// Database connection for all database operations
    pub database: DatabaseConnection,
    /// Id of the owner (admin) account that funds belong to
    pub owner_id: i64,
    /// Shop assigned to workers created without one
    pub default_shop: String,
    locks: ShopLocks,
}

impl AppContext {
    /// Creates a context with an empty lock registry.
    #[must_use]
    pub fn new(database: DatabaseConnection, owner_id: i64, default_shop: String) -> Self {
        Self {
            database,
            owner_id,
            default_shop,
            locks: ShopLocks::default(),
        }
    }

    /// Waits until no other operation holds `shop_id`, then claims it.
    pub async fn lock_shop(&self, shop_id: &str) -> ShopGuard {
        self.locks.acquire(shop_id).await
    }
}

/// Registry of one async mutex per shop id.
#[derive(Clone, Debug, Default)]
pub struct ShopLocks {
    inner: Arc<Mutex<HashMap<String, Arc<AsyncMutex<()>>>>>,
}

impl ShopLocks {
    /// Claims the mutex for `shop_id`, creating it on first use.
    pub async fn acquire(&self, shop_id: &str) -> ShopGuard {
        let lock = {
            let mut map = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(map.entry(shop_id.to_owned()).or_default())
        };
        let guard = lock.lock_owned().await;
        trace!(shop_id, "shop lock acquired");
        ShopGuard {
            shop_id: shop_id.to_owned(),
            _guard: guard,
        }
    }
}

/// Proof that the holder has exclusive access to one shop's fund.
#[derive(Debug)]
pub struct ShopGuard {
    shop_id: String,
    _guard: OwnedMutexGuard<()>,
}

impl ShopGuard {
    /// The shop this guard covers.
    #[must_use]
    pub fn shop_id(&self) -> &str {
        &self.shop_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_shop_is_exclusive() {
        let locks = ShopLocks::default();
        let first = locks.acquire("shop1").await;

        let second = tokio::time::timeout(Duration::from_millis(20), locks.acquire("shop1")).await;
        assert!(second.is_err(), "second guard must wait for the first");

        drop(first);
        let third = tokio::time::timeout(Duration::from_millis(20), locks.acquire("shop1")).await;
        assert!(third.is_ok());
    }

    #[tokio::test]
    async fn test_different_shops_do_not_block() {
        let locks = ShopLocks::default();
        let shop1 = locks.acquire("shop1").await;
        let shop2 = tokio::time::timeout(Duration::from_millis(20), locks.acquire("shop2")).await;
        assert!(shop2.is_ok());
        assert_eq!(shop1.shop_id(), "shop1");
    }
}
