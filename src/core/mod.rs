//! Core business logic - framework-agnostic shop operations.
//!
//! Functions here take a database connection (or an [`context::AppContext`]
//! when they need the shop guard) and return [`crate::errors::Result`]. The
//! HTTP layer is a thin translation on top.

pub mod attendance;
pub mod context;
pub mod expense;
pub mod gate;
pub mod item;
pub mod ledger;
pub mod listing;
pub mod profile;
pub mod purchase;
pub mod report;
pub mod sale;
pub mod settlement;
pub mod user;
pub mod worker;
