//! Database configuration, connection factory and schema orchestration.
//! Used by the lab runner and the migration CLI.

pub mod config;
pub mod error;
pub mod infra;

pub use config::db;
pub use config::db::{DbConfig, DbKind};
pub use error::DbInfraError;
pub use infra::db::core::{
    close_connection, connect, get_connection, orchestrate_migration, sanitize_db_url,
};
