//! Worker administration - the owner's view of shop staff.
//!
//! Every operation here requires the admin account.

use crate::{
    core::{
        context::AppContext,
        profile::ensure_worker_profile,
        user::{Role, get_user_by_name, normalize_name, register_user, require_admin},
    },
    entities::{
        Attendance, Purchase, Sale, User, Worker, WorkerExpense, WorkerFund, attendance,
        purchase, sale, user, worker, worker_expense, worker_fund,
    },
    errors::{Error, Result},
};
use chrono::{NaiveDate, Utc};
use sea_orm::{PaginatorTrait, QueryOrder, Set, TransactionTrait, prelude::*};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

/// Details for a new worker.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWorker {
    /// Login and profile name
    pub name: String,
    /// Contact phone
    #[serde(default)]
    pub phone: String,
    /// Job title; `"Worker"` when absent
    pub position: Option<String>,
    /// Monthly salary; zero when absent
    pub salary: Option<f64>,
    /// Day the worker started; today when absent
    pub join_date: Option<NaiveDate>,
    /// Shop for a newly created account; the default shop when absent
    pub shop_id: Option<String>,
}

/// Changes to an existing worker. Absent fields are left alone.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerChanges {
    /// New profile name; may not belong to another account
    pub name: Option<String>,
    /// Contact phone
    pub phone: Option<String>,
    /// Job title
    pub position: Option<String>,
    /// Monthly salary, zero or more
    pub salary: Option<f64>,
    /// Day the worker started
    pub join_date: Option<NaiveDate>,
    /// Inactive workers keep their history
    pub is_active: Option<bool>,
    /// Moves the account to another shop; an empty string clears it
    pub shop_id: Option<String>,
}

/// A worker profile together with the shop of its account.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerView {
    /// The profile itself
    #[serde(flatten)]
    pub worker: worker::Model,
    /// Shop of the profile's account
    pub shop_id: Option<String>,
}

/// A worker with their attendance, latest day first.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerDetail {
    /// Profile and shop
    #[serde(flatten)]
    pub view: WorkerView,
    /// Every recorded day
    pub attendances: Vec<attendance::Model>,
}

fn validate_salary(salary: f64) -> Result<f64> {
    if !salary.is_finite() || salary < 0.0 {
        return Err(Error::validation("Salary must be zero or more"));
    }
    Ok(salary)
}

async fn name_taken<C>(db: &C, name: &str, except: Option<i64>) -> Result<bool>
where
    C: ConnectionTrait,
{
    let mut query = Worker::find().filter(worker::Column::Name.eq(name));
    if let Some(worker_id) = except {
        query = query.filter(worker::Column::Id.ne(worker_id));
    }
    Ok(query.one(db).await?.is_some())
}

/// Loads a worker profile or fails with [`Error::NotFound`].
pub async fn get_worker<C>(db: &C, worker_id: i64) -> Result<worker::Model>
where
    C: ConnectionTrait,
{
    Worker::find_by_id(worker_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("Worker", worker_id))
}

/// One worker with their shop and full attendance record.
pub async fn get_worker_detail<C>(db: &C, admin_id: i64, worker_id: i64) -> Result<WorkerDetail>
where
    C: ConnectionTrait,
{
    require_admin(db, admin_id).await?;
    let profile = get_worker(db, worker_id).await?;
    let shop_id = User::find_by_id(profile.user_id)
        .one(db)
        .await?
        .and_then(|account| account.shop_id);
    let attendances = Attendance::find()
        .filter(attendance::Column::WorkerId.eq(worker_id))
        .order_by_desc(attendance::Column::Date)
        .all(db)
        .await?;

    Ok(WorkerDetail {
        view: WorkerView {
            worker: profile,
            shop_id,
        },
        attendances,
    })
}

/// Adds a worker, creating the login account when none exists yet.
#[instrument(skip(ctx, input), fields(name = %input.name))]
pub async fn add_worker(ctx: &AppContext, admin_id: i64, input: NewWorker) -> Result<WorkerView> {
    require_admin(&ctx.database, admin_id).await?;
    let name = normalize_name(&input.name)?;
    let salary = validate_salary(input.salary.unwrap_or(0.0))?;

    let txn = ctx.database.begin().await?;
    if name_taken(&txn, &name, None).await? {
        return Err(Error::Conflict {
            message: "Worker name already exists".to_string(),
        });
    }

    let account = match get_user_by_name(&txn, &name).await? {
        Some(existing) if existing.role == Role::Admin.as_str() => {
            return Err(Error::Conflict {
                message: "Worker name already exists".to_string(),
            });
        }
        Some(existing) => existing,
        None => {
            let shop = input.shop_id.unwrap_or_else(|| ctx.default_shop.clone());
            register_user(&txn, &name, Role::Worker, Some(shop)).await?
        }
    };
    if Worker::find()
        .filter(worker::Column::UserId.eq(account.id))
        .one(&txn)
        .await?
        .is_some()
    {
        return Err(Error::Conflict {
            message: "Worker name already exists".to_string(),
        });
    }

    let now = Utc::now();
    let profile = worker::ActiveModel {
        user_id: Set(account.id),
        name: Set(name),
        phone: Set(input.phone.trim().to_string()),
        position: Set(input.position.unwrap_or_else(|| "Worker".to_string())),
        salary: Set(salary),
        join_date: Set(input.join_date.unwrap_or_else(|| now.date_naive())),
        is_active: Set(true),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;
    info!(worker_id = profile.id, user_id = account.id, "Worker added");
    Ok(WorkerView {
        worker: profile,
        shop_id: account.shop_id,
    })
}

/// All workers, materializing profiles for worker accounts that lack one.
pub async fn list_workers<C>(db: &C, admin_id: i64) -> Result<Vec<WorkerView>>
where
    C: ConnectionTrait,
{
    require_admin(db, admin_id).await?;
    let accounts = User::find()
        .filter(user::Column::Role.eq(Role::Worker.as_str()))
        .order_by_asc(user::Column::Name)
        .all(db)
        .await?;

    let mut views = Vec::with_capacity(accounts.len());
    for account in accounts {
        let profile = ensure_worker_profile(db, &account).await?;
        views.push(WorkerView {
            worker: profile,
            shop_id: account.shop_id,
        });
    }
    Ok(views)
}

/// Applies `changes` to a worker profile and its account's shop.
#[instrument(skip(db, changes))]
pub async fn update_worker<C>(
    db: &C,
    admin_id: i64,
    worker_id: i64,
    changes: WorkerChanges,
) -> Result<WorkerView>
where
    C: ConnectionTrait + TransactionTrait,
{
    require_admin(db, admin_id).await?;
    let txn = db.begin().await?;
    let existing = get_worker(&txn, worker_id).await?;
    let user_id = existing.user_id;
    let mut active: worker::ActiveModel = existing.into();

    if let Some(name) = changes.name {
        let name = normalize_name(&name)?;
        let other_account = get_user_by_name(&txn, &name)
            .await?
            .is_some_and(|account| account.id != user_id);
        if other_account || name_taken(&txn, &name, Some(worker_id)).await? {
            return Err(Error::Conflict {
                message: "Worker name already exists".to_string(),
            });
        }
        active.name = Set(name);
    }
    if let Some(phone) = changes.phone {
        active.phone = Set(phone.trim().to_string());
    }
    if let Some(position) = changes.position {
        active.position = Set(position);
    }
    if let Some(salary) = changes.salary {
        active.salary = Set(validate_salary(salary)?);
    }
    if let Some(join_date) = changes.join_date {
        active.join_date = Set(join_date);
    }
    if let Some(is_active) = changes.is_active {
        active.is_active = Set(is_active);
    }
    let profile = active.update(&txn).await?;

    let account = User::find_by_id(user_id)
        .one(&txn)
        .await?
        .ok_or_else(|| Error::not_found("User", user_id))?;
    let account = match changes.shop_id {
        Some(shop) => {
            let shop = shop.trim().to_string();
            let mut active_account: user::ActiveModel = account.into();
            active_account.shop_id = Set((!shop.is_empty()).then_some(shop));
            active_account.update(&txn).await?
        }
        None => account,
    };

    txn.commit().await?;
    info!(worker_id, "Worker updated");
    Ok(WorkerView {
        worker: profile,
        shop_id: account.shop_id,
    })
}

/// Removes a worker, their attendance and their login account.
///
/// Workers with ledger entries, expenses, purchases or sales cannot be
/// removed; deactivate them instead.
#[instrument(skip(db))]
pub async fn delete_worker<C>(db: &C, admin_id: i64, worker_id: i64) -> Result<()>
where
    C: ConnectionTrait + TransactionTrait,
{
    require_admin(db, admin_id).await?;
    let txn = db.begin().await?;
    let existing = get_worker(&txn, worker_id).await?;

    let ledger_rows = WorkerFund::find()
        .filter(worker_fund::Column::WorkerId.eq(worker_id))
        .count(&txn)
        .await?;
    let expenses = WorkerExpense::find()
        .filter(worker_expense::Column::WorkerId.eq(worker_id))
        .count(&txn)
        .await?;
    let purchases = Purchase::find()
        .filter(purchase::Column::UserId.eq(existing.user_id))
        .count(&txn)
        .await?;
    let sales = Sale::find()
        .filter(sale::Column::UserId.eq(existing.user_id))
        .count(&txn)
        .await?;
    if ledger_rows + expenses + purchases + sales > 0 {
        return Err(Error::Conflict {
            message: "Worker has recorded history; deactivate instead".to_string(),
        });
    }

    Attendance::delete_many()
        .filter(attendance::Column::WorkerId.eq(worker_id))
        .exec(&txn)
        .await?;
    Worker::delete_by_id(worker_id).exec(&txn).await?;
    User::delete_by_id(existing.user_id).exec(&txn).await?;

    txn.commit().await?;
    info!(worker_id, user_id = existing.user_id, "Worker deleted");
    Ok(())
}
