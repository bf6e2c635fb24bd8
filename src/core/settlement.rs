//! Borrow settlement - clearing the outstanding claim on a purchase or sale.
//!
//! Paying a supplier for borrowed goods is a cash outflow, so a purchase
//! settlement is gated on and debited from the fund of the shop the purchase
//! was booked against. A sale settlement only flips the record to paid; no
//! credit is written for the customer's payment.
//!
//! Either way the whole outstanding amount is cleared, whatever `amount` was
//! passed.

use crate::{
    core::{
        context::AppContext,
        gate::PaymentType,
        ledger::{self, Reference},
        profile::recorder_profile,
        purchase::get_purchase,
        sale::get_sale,
    },
    entities::{purchase, sale},
    errors::{Error, Result},
};
use sea_orm::{ActiveModelTrait, ConnectionTrait, Set, TransactionTrait};
use tracing::{info, instrument};

fn ensure_borrow(payment_type: &str, entity: &'static str, id: i64) -> Result<()> {
    if payment_type.parse::<PaymentType>()? == PaymentType::Borrow {
        Ok(())
    } else {
        Err(Error::NotBorrow { entity, id })
    }
}

/// Pays off a borrowed purchase out of the shop fund.
#[instrument(skip(ctx))]
pub async fn settle_purchase_borrow(
    ctx: &AppContext,
    purchase_id: i64,
    amount: f64,
) -> Result<purchase::Model> {
    let amount = ledger::validate_amount(amount)?;
    let existing = get_purchase(&ctx.database, purchase_id).await?;
    ensure_borrow(&existing.payment_type, "purchase", purchase_id)?;
    let recorder = recorder_profile(&ctx.database, existing.user_id).await?;

    let guard = ctx.lock_shop(&existing.shop_id).await;
    let txn = ctx.database.begin().await?;
    // A concurrent settlement may have won the race for the guard
    let existing = get_purchase(&txn, purchase_id).await?;
    ensure_borrow(&existing.payment_type, "purchase", purchase_id)?;

    ledger::debit_locked(
        &txn,
        &guard,
        ctx.owner_id,
        recorder.id,
        amount,
        Reference::purchase_settlement(purchase_id),
    )
    .await?;

    let outstanding = existing.borrow_amount;
    let mut active: purchase::ActiveModel = existing.into();
    active.payment_type = Set(PaymentType::Paid.as_str().to_string());
    active.borrow_amount = Set(0.0);
    let settled = active.update(&txn).await?;

    txn.commit().await?;
    info!(purchase_id, amount, outstanding, "Purchase borrow settled");
    Ok(settled)
}

/// Marks a borrowed sale as paid.
#[instrument(skip(db))]
pub async fn settle_sale_borrow<C>(db: &C, sale_id: i64, amount: f64) -> Result<sale::Model>
where
    C: ConnectionTrait,
{
    let amount = ledger::validate_amount(amount)?;
    let existing = get_sale(db, sale_id).await?;
    ensure_borrow(&existing.payment_type, "sale", sale_id)?;

    let outstanding = existing.borrow_amount;
    let mut active: sale::ActiveModel = existing.into();
    active.payment_type = Set(PaymentType::Paid.as_str().to_string());
    active.borrow_amount = Set(0.0);
    let settled = active.update(db).await?;

    info!(sale_id, amount, outstanding, "Sale borrow settled");
    Ok(settled)
}
