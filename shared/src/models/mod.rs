//! Data models
//!
//! Shared between procurement-server and its callers.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY). Money and quantities are `f64`
//! in rows; arithmetic is done in `Decimal` by the server.

pub mod audit_run;
pub mod integrity;
pub mod order;
pub mod receiving;
pub mod reservation;

// Re-exports
pub use audit_run::*;
pub use integrity::*;
pub use order::*;
pub use receiving::*;
pub use reservation::*;
