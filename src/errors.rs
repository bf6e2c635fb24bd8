//! Unified error type for the shop ledger.
//!
//! Business failures carry the human-readable message that ends up in the
//! `{ "error": ... }` body of an API response.

use thiserror::Error;

/// Every failure the service can surface.
#[derive(Debug, Error)]
pub enum Error {
    /// Application configuration could not be loaded
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// Underlying database failure
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Filesystem or socket failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed request input (missing title, bad quantity, ...)
    #[error("{message}")]
    Validation {
        /// Message shown to the caller
        message: String,
    },

    /// Amount was not a finite positive number
    #[error("Please provide a valid amount (got {amount})")]
    InvalidAmount {
        /// The rejected amount
        amount: f64,
    },

    /// A referenced row does not exist
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Kind of row ("Worker", "Purchase", ...)
        entity: &'static str,
        /// Identifier that was looked up
        id: String,
    },

    /// The acting user is not assigned to a shop
    #[error("Worker not linked to any shop")]
    ShopNotFound {
        /// User without a shop
        user_id: i64,
    },

    /// The configured owner account is missing
    #[error("Owner not found")]
    OwnerNotFound,

    /// Non-admin calling an admin-only operation
    #[error("Unauthorized")]
    Unauthorized,

    /// The shop fund cannot cover the requested outflow
    #[error("Insufficient funds. Available: {available:.2}, Required: {required:.2}")]
    InsufficientFunds {
        /// Current shop balance
        available: f64,
        /// Amount that was requested
        required: f64,
    },

    /// An item does not have enough stock for the requested decrement
    #[error("Insufficient stock for item {item_id}. Available: {available}, Requested: {requested}")]
    InsufficientStock {
        /// Item being decremented
        item_id: i64,
        /// Stock at the time of the attempt
        available: f64,
        /// Quantity requested
        requested: f64,
    },

    /// Uniqueness rule violated (duplicate names, second admin)
    #[error("{message}")]
    Conflict {
        /// Message shown to the caller
        message: String,
    },

    /// Settlement attempted on a transaction that was paid up front
    #[error("This {entity} is not a borrow")]
    NotBorrow {
        /// "purchase" or "sale"
        entity: &'static str,
        /// Row id
        id: i64,
    },
}

impl Error {
    /// Shorthand for a [`Error::Validation`] with the given message.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Shorthand for a [`Error::NotFound`].
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
