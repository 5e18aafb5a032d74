//! Database module
//!
//! SQLite connection, migrations, and the `PlanStore` implementation.

pub mod connection;
pub mod migrations;
pub mod store;

pub use connection::{Database, DbError, DbResult};
pub use store::PlanStore;
