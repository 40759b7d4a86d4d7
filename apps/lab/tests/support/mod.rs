//! Shared helpers for the lab integration tests.
#![allow(dead_code)]

use std::error::Error;

use db_infra::{close_connection, connect, orchestrate_migration, DbConfig};
use lab_test_support::unique_helpers::unique_sqlite_path;
use migration::MigrationCommand;
use rollback_lab::inspect::{contact_codes, table_counts, TableCounts};
use tempfile::TempDir;

/// Automatically initialize logging for every integration test binary that
/// includes this module.
#[ctor::ctor]
fn _auto_init_for_integration_tests() {
    lab_test_support::test_logging::init();
}

/// A throwaway SQLite database file, deleted with the temp dir.
pub struct LabDb {
    _dir: TempDir,
    pub config: DbConfig,
}

impl LabDb {
    /// Empty database without the lab tables.
    pub fn bare() -> Result<Self, Box<dyn Error>> {
        let dir = tempfile::tempdir()?;
        let config = DbConfig::sqlite_file(unique_sqlite_path(dir.path(), "lab"));
        Ok(Self { _dir: dir, config })
    }

    /// Database with the lab tables created.
    pub async fn migrated() -> Result<Self, Box<dyn Error>> {
        let db = Self::bare()?;
        orchestrate_migration(&db.config, MigrationCommand::Up).await?;
        Ok(db)
    }

    pub async fn counts(&self) -> Result<TableCounts, Box<dyn Error>> {
        let conn = connect(&self.config).await?;
        let counts = table_counts(&conn).await;
        close_connection(conn).await;
        Ok(counts?)
    }

    pub async fn contact_codes(&self) -> Result<Vec<String>, Box<dyn Error>> {
        let conn = connect(&self.config).await?;
        let codes = contact_codes(&conn).await;
        close_connection(conn).await;
        Ok(codes?)
    }
}
