//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod attendance;
pub mod item;
pub mod purchase;
pub mod sale;
pub mod user;
pub mod worker;
pub mod worker_expense;
pub mod worker_fund;

// Re-export specific types to avoid conflicts
pub use attendance::{Column as AttendanceColumn, Entity as Attendance, Model as AttendanceModel};
pub use item::{Column as ItemColumn, Entity as Item, Model as ItemModel};
pub use purchase::{Column as PurchaseColumn, Entity as Purchase, Model as PurchaseModel};
pub use sale::{Column as SaleColumn, Entity as Sale, Model as SaleModel};
pub use user::{Column as UserColumn, Entity as User, Model as UserModel};
pub use worker::{Column as WorkerColumn, Entity as Worker, Model as WorkerModel};
pub use worker_expense::{
    Column as WorkerExpenseColumn, Entity as WorkerExpense, Model as WorkerExpenseModel,
};
pub use worker_fund::{Column as WorkerFundColumn, Entity as WorkerFund, Model as WorkerFundModel};
