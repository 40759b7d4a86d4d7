//! The database seam a run talks through.
//!
//! [`LabSession`] is the whole client surface a run needs: begin, prepare,
//! execute, commit, rollback and close. [`SeaSession`] implements it over a
//! single sea-orm connection.

use async_trait::async_trait;
use sea_orm::{
    ConnectionTrait, DatabaseBackend, DatabaseConnection, DatabaseTransaction, DbErr,
    TransactionTrait,
};
use tracing::{debug, info, warn};

use crate::records::InsertRecord;
use crate::template::{PreparedInsert, StatementTemplate};

#[async_trait]
pub trait LabSession: Send {
    fn backend(&self) -> DatabaseBackend;

    /// Turn auto-commit off by opening an explicit transaction.
    async fn begin(&mut self) -> Result<(), DbErr>;

    async fn prepare(&mut self, template: &StatementTemplate) -> Result<PreparedInsert, DbErr>;

    /// Bind `record` to `statement` and execute it, returning rows affected.
    ///
    /// Outside an explicit transaction the statement commits on success.
    async fn execute(
        &mut self,
        statement: &PreparedInsert,
        record: &InsertRecord,
    ) -> Result<u64, DbErr>;

    async fn commit(&mut self) -> Result<(), DbErr>;

    async fn rollback(&mut self) -> Result<(), DbErr>;

    async fn close_statement(&mut self, statement: PreparedInsert) -> Result<(), DbErr>;

    /// Close the session. Consumes it, so it happens at most once.
    async fn close(self) -> Result<(), DbErr>;
}

/// [`LabSession`] over a sea-orm connection.
///
/// sqlx prepares and caches statements per connection on first execution, so
/// a prepared handle here tracks ownership and SQL text; the driver's cached
/// statement goes away with the connection.
pub struct SeaSession {
    conn: DatabaseConnection,
    txn: Option<DatabaseTransaction>,
    open_statements: Vec<u32>,
    next_statement_id: u32,
    commit_failed: bool,
}

impl SeaSession {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self {
            conn,
            txn: None,
            open_statements: Vec::new(),
            next_statement_id: 1,
            commit_failed: false,
        }
    }

    pub fn in_transaction(&self) -> bool {
        self.txn.is_some()
    }
}

#[async_trait]
impl LabSession for SeaSession {
    fn backend(&self) -> DatabaseBackend {
        self.conn.get_database_backend()
    }

    async fn begin(&mut self) -> Result<(), DbErr> {
        if self.txn.is_some() {
            return Err(DbErr::Custom("transaction already open".to_string()));
        }
        self.txn = Some(self.conn.begin().await?);
        self.commit_failed = false;
        Ok(())
    }

    async fn prepare(&mut self, template: &StatementTemplate) -> Result<PreparedInsert, DbErr> {
        let id = self.next_statement_id;
        self.next_statement_id += 1;

        let prepared = PreparedInsert::new(id, *template, self.backend());
        self.open_statements.push(id);
        debug!(statement_id = id, sql = %prepared.sql(), "statement=prepared");
        Ok(prepared)
    }

    async fn execute(
        &mut self,
        statement: &PreparedInsert,
        record: &InsertRecord,
    ) -> Result<u64, DbErr> {
        if !self.open_statements.contains(&statement.id()) {
            return Err(DbErr::Custom(format!(
                "statement {} is not open on this session",
                statement.id()
            )));
        }

        let stmt = statement.bind(record)?;
        let result = match &self.txn {
            Some(txn) => txn.execute(stmt).await?,
            None => self.conn.execute(stmt).await?,
        };
        Ok(result.rows_affected())
    }

    async fn commit(&mut self) -> Result<(), DbErr> {
        let txn = self
            .txn
            .take()
            .ok_or_else(|| DbErr::Custom("no open transaction to commit".to_string()))?;

        let result = txn.commit().await;
        if result.is_err() {
            self.commit_failed = true;
        }
        result
    }

    async fn rollback(&mut self) -> Result<(), DbErr> {
        match self.txn.take() {
            Some(txn) => txn.rollback().await,
            // A failed commit consumes the transaction; the driver discards
            // its changes, so there is nothing left to send.
            None if self.commit_failed => {
                info!("rollback=not_sent reason=transaction_discarded_after_failed_commit");
                self.commit_failed = false;
                Ok(())
            }
            None => Err(DbErr::Custom(
                "no open transaction to roll back".to_string(),
            )),
        }
    }

    async fn close_statement(&mut self, statement: PreparedInsert) -> Result<(), DbErr> {
        let Some(pos) = self
            .open_statements
            .iter()
            .position(|id| *id == statement.id())
        else {
            return Err(DbErr::Custom(format!(
                "statement {} is not open on this session",
                statement.id()
            )));
        };

        self.open_statements.swap_remove(pos);
        debug!(statement_id = statement.id(), table = %statement.table(), "statement=closed");
        Ok(())
    }

    async fn close(mut self) -> Result<(), DbErr> {
        if let Some(txn) = self.txn.take() {
            warn!("session closing with an open transaction; rolling back");
            if let Err(e) = txn.rollback().await {
                warn!(error = %e, "rollback before close failed");
            }
        }
        if !self.open_statements.is_empty() {
            warn!(
                open_statements = self.open_statements.len(),
                "session closing with open statements"
            );
        }
        self.conn.close().await
    }
}
