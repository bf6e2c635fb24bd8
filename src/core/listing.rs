//! Shared filtering and pagination for purchase and sale listings.
//!
//! The owner sees every record (optionally narrowed to one shop); a worker
//! only ever sees the records they entered.

use crate::{
    core::user::{Role, require_user},
    entities::{User, user},
    errors::{Error, Result},
};
use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};
use sea_orm::{QuerySelect, Select, prelude::*};
use serde::{Deserialize, Serialize};

const DEFAULT_PAGE_SIZE: u64 = 50;
const MAX_PAGE_SIZE: u64 = 500;

/// Query-string filter accepted by the listing operations.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListFilter {
    /// First day to include
    pub start_date: Option<NaiveDate>,
    /// Last day to include; defaults to `start_date`
    pub end_date: Option<NaiveDate>,
    /// Owner only: restrict to one shop (`"all"` means no restriction)
    pub shop_id: Option<String>,
    /// 1-based page number
    pub page: Option<u64>,
    /// Rows per page
    pub limit: Option<u64>,
}

impl ListFilter {
    /// Zero-based page index.
    #[must_use]
    pub fn page_index(&self) -> u64 {
        self.page.unwrap_or(1).max(1) - 1
    }

    /// Rows per page, clamped to a sane range.
    #[must_use]
    pub fn page_size(&self) -> u64 {
        self.limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }

    /// Half-open UTC range `[from, to)` covering the requested days.
    pub fn date_bounds(&self) -> Result<Option<(DateTime<Utc>, DateTime<Utc>)>> {
        let (first, last) = match (self.start_date, self.end_date) {
            (None, None) => return Ok(None),
            (Some(start), None) => (start, start),
            (None, Some(end)) => (end, end),
            (Some(start), Some(end)) => (start, end),
        };
        if last < first {
            return Err(Error::validation("endDate is before startDate"));
        }
        let after_last = last
            .checked_add_days(Days::new(1))
            .ok_or_else(|| Error::validation("endDate is out of range"))?;

        Ok(Some((
            first.and_time(NaiveTime::MIN).and_utc(),
            after_last.and_time(NaiveTime::MIN).and_utc(),
        )))
    }
}

/// One page of results.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Rows on this page
    pub data: Vec<T>,
    /// Rows across all pages
    pub total_count: u64,
}

/// Which users' records a viewer may list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Scope {
    /// No restriction
    All,
    /// Only records entered by these users
    Users(Vec<i64>),
}

impl Scope {
    /// Restricts `query` to the scope, matching on `user_column`.
    pub fn apply<E, Col>(&self, query: Select<E>, user_column: Col) -> Select<E>
    where
        E: EntityTrait,
        Col: ColumnTrait,
    {
        match self {
            Self::All => query,
            Self::Users(ids) => query.filter(user_column.is_in(ids.iter().copied())),
        }
    }
}

/// Works out what `viewer_id` may see.
pub async fn scope_for<C>(db: &C, viewer_id: i64, shop_id: Option<&str>) -> Result<Scope>
where
    C: ConnectionTrait,
{
    let viewer = require_user(db, viewer_id).await?;
    if viewer.role != Role::Admin.as_str() {
        return Ok(Scope::Users(vec![viewer_id]));
    }

    match shop_id.filter(|shop| *shop != "all") {
        None => Ok(Scope::All),
        Some(shop) => {
            let ids: Vec<i64> = User::find()
                .select_only()
                .column(user::Column::Id)
                .filter(user::Column::ShopId.eq(shop))
                .filter(user::Column::Role.eq(Role::Worker.as_str()))
                .into_tuple()
                .all(db)
                .await?;
            Ok(Scope::Users(ids))
        }
    }
}
