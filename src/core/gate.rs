//! Check-then-act guard between money-moving records and the ledger.
//!
//! Paid purchases and worker expenses must be covered by the shop fund before
//! they are recorded; borrowed purchases skip the fund entirely and carry
//! their claim in `borrow_amount` instead. Both functions take a
//! [`ShopGuard`], so the sufficiency check and the debit cannot interleave
//! with another operation on the same shop.

use crate::{
    core::{
        context::ShopGuard,
        ledger::{self, Reference},
    },
    entities::worker_fund,
    errors::{Error, Result},
};
use sea_orm::ConnectionTrait;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// How a purchase or sale was settled at the time it was recorded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentType {
    /// Cash changed hands immediately
    #[default]
    Paid,
    /// Recorded as an outstanding claim
    Borrow,
}

impl PaymentType {
    /// Value stored in the `payment_type` column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Paid => "paid",
            Self::Borrow => "borrow",
        }
    }

    /// Whether this payment draws on the shop fund.
    #[must_use]
    pub const fn moves_cash(self) -> bool {
        matches!(self, Self::Paid)
    }
}

impl fmt::Display for PaymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "paid" => Ok(Self::Paid),
            "borrow" => Ok(Self::Borrow),
            other => Err(Error::validation(format!("Unknown payment type: {other}"))),
        }
    }
}

/// Works out the borrow amount to store for a new or edited record.
///
/// Paid records owe nothing. A borrow defaults to the full total and may not
/// exceed it.
pub fn resolve_borrow_amount(
    payment_type: PaymentType,
    requested: Option<f64>,
    total_amount: f64,
) -> Result<f64> {
    match payment_type {
        PaymentType::Paid => Ok(0.0),
        PaymentType::Borrow => {
            let amount = requested.unwrap_or(total_amount);
            if !amount.is_finite() || amount < 0.0 || amount > total_amount {
                return Err(Error::validation(format!(
                    "Borrow amount must be between 0 and {total_amount:.2}"
                )));
            }
            Ok(amount)
        }
    }
}

/// Draws `total_amount` from the guarded shop when the payment moves cash.
///
/// Returns the ledger row that was written, or `None` for a borrow.
pub async fn reserve<C>(
    db: &C,
    guard: &ShopGuard,
    owner_id: i64,
    worker_id: i64,
    total_amount: f64,
    payment_type: PaymentType,
    reference: Reference,
) -> Result<Option<worker_fund::Model>>
where
    C: ConnectionTrait,
{
    if !payment_type.moves_cash() {
        return Ok(None);
    }
    ledger::debit_locked(db, guard, owner_id, worker_id, total_amount, reference)
        .await
        .map(Some)
}

/// Undoes an earlier [`reserve`] of `total_amount`.
///
/// Callers pass the *old* amount and payment type of the record being edited
/// or removed, exactly once, before any new amount is reserved.
pub async fn release<C>(
    db: &C,
    guard: &ShopGuard,
    owner_id: i64,
    worker_id: i64,
    total_amount: f64,
    payment_type: PaymentType,
    reference: Reference,
) -> Result<Option<worker_fund::Model>>
where
    C: ConnectionTrait,
{
    if !payment_type.moves_cash() {
        return Ok(None);
    }
    ledger::reverse_locked(db, guard, owner_id, worker_id, total_amount, reference)
        .await
        .map(Some)
}
