//! The insert run, in either transaction mode.
//!
//! Both modes issue the same statements in the same order. They differ only in
//! whether the statements share one explicit transaction:
//!
//! - [`TransactionMode::AutoCommit`]: every successful insert is durable the
//!   moment it executes; a later failure cannot undo it.
//! - [`TransactionMode::Explicit`]: auto-commit is off, the inserts accumulate
//!   in one transaction, which is committed once if all succeed and rolled back
//!   once if any fails.
//!
//! Cleanup runs on every path: prepared statements are closed, then the
//! session. Close-time errors are recorded in the report and never replace the
//! statement failure that ended the run.

use std::fmt;

use db_infra::{get_connection, DbConfig};
use sea_orm::DbErr;
use tracing::{error, info, warn};

use crate::error::LabError;
use crate::infra::db_errors::{classify_db_err, FailureKind};
use crate::records::{Scenario, Table};
use crate::session::{LabSession, SeaSession};
use crate::template::{PreparedInsert, StatementTemplate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionMode {
    /// Each statement commits on its own.
    AutoCommit,
    /// All statements commit or roll back together.
    Explicit,
}

impl fmt::Display for TransactionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TransactionMode::AutoCommit => "auto_commit",
            TransactionMode::Explicit => "explicit",
        })
    }
}

/// How a run ended with respect to durability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminal {
    /// Auto-commit mode: whatever executed is durable.
    AutoCommitted,
    Committed,
    RolledBack,
    /// The rollback attempt itself failed; nothing was retried.
    RollbackFailed,
    /// The commit failed. The driver gave up the transaction with the failed
    /// commit and discards its changes, so no rollback reached the database.
    DiscardedAfterCommitFailure,
    /// Explicit mode where the transaction could not be opened.
    NotStarted,
}

/// Where in the run a failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Begin,
    Prepare(Table),
    /// 1-based position of the insert in the scenario.
    Insert { step: usize, table: Table },
    Commit,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Begin => f.write_str("begin"),
            Stage::Prepare(table) => write!(f, "prepare[{table}]"),
            Stage::Insert { step, table } => write!(f, "insert#{step}[{table}]"),
            Stage::Commit => f.write_str("commit"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementFailure {
    pub stage: Stage,
    pub kind: FailureKind,
    pub message: String,
}

impl StatementFailure {
    fn from_db(stage: Stage, e: &DbErr) -> Self {
        Self {
            stage,
            kind: classify_db_err(e),
            message: e.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepOutcome {
    pub step: usize,
    pub table: Table,
    pub rows_affected: u64,
}

/// Close operations issued during cleanup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupReport {
    pub statements_opened: usize,
    pub statement_closes: usize,
    pub connection_closes: usize,
    pub errors: Vec<String>,
}

impl CleanupReport {
    /// Every opened statement was closed once and the session was closed once.
    pub fn is_balanced(&self) -> bool {
        self.statements_opened == self.statement_closes && self.connection_closes == 1
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub mode: TransactionMode,
    pub executed: Vec<StepOutcome>,
    pub terminal: Terminal,
    pub failure: Option<StatementFailure>,
    pub rollback_error: Option<String>,
    pub cleanup: CleanupReport,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.failure.is_none()
            && matches!(self.terminal, Terminal::AutoCommitted | Terminal::Committed)
    }

    /// Inserts whose rows outlive the run.
    pub fn durable_inserts(&self) -> usize {
        match self.terminal {
            Terminal::AutoCommitted | Terminal::Committed => self.executed.len(),
            Terminal::RolledBack
            | Terminal::NotStarted
            | Terminal::DiscardedAfterCommitFailure => 0,
            // The driver drops an unfinished transaction with the connection.
            Terminal::RollbackFailed => 0,
        }
    }

    fn log_summary(&self) {
        match &self.failure {
            None => info!(
                mode = %self.mode,
                terminal = ?self.terminal,
                executed = self.executed.len(),
                durable = self.durable_inserts(),
                "run=done"
            ),
            Some(failure) => warn!(
                mode = %self.mode,
                terminal = ?self.terminal,
                executed = self.executed.len(),
                durable = self.durable_inserts(),
                stage = %failure.stage,
                kind = %failure.kind,
                "run=failed"
            ),
        }
    }
}

/// Run `scenario` through `session` in the given mode.
///
/// Always returns a report; the session is closed before returning.
pub async fn run_inserts<S: LabSession>(
    mut session: S,
    scenario: &Scenario,
    mode: TransactionMode,
) -> RunReport {
    let mut prepared = Vec::new();
    let mut executed = Vec::new();
    let mut in_txn = false;

    info!(mode = %mode, steps = scenario.steps().len(), "run=start");

    let failure = execute_scenario(
        &mut session,
        scenario,
        mode,
        &mut prepared,
        &mut executed,
        &mut in_txn,
    )
    .await
    .err();

    if let Some(f) = &failure {
        error!(stage = %f.stage, kind = %f.kind, "ERROR: {}", f.message);
    }

    let failure_stage = failure.as_ref().map(|f| f.stage);
    let (terminal, rollback_error) = match (mode, &failure) {
        (TransactionMode::AutoCommit, _) => (Terminal::AutoCommitted, None),
        (TransactionMode::Explicit, None) => (Terminal::Committed, None),
        (TransactionMode::Explicit, Some(_)) if !in_txn => (Terminal::NotStarted, None),
        (TransactionMode::Explicit, Some(_)) => {
            info!("transaction=rollback");
            match session.rollback().await {
                Ok(()) if failure_stage == Some(Stage::Commit) => {
                    (Terminal::DiscardedAfterCommitFailure, None)
                }
                Ok(()) => (Terminal::RolledBack, None),
                Err(e) => {
                    error!(error = %e, "transaction=rollback_failed");
                    (Terminal::RollbackFailed, Some(e.to_string()))
                }
            }
        }
    };

    let cleanup = release(session, prepared).await;

    let report = RunReport {
        mode,
        executed,
        terminal,
        failure,
        rollback_error,
        cleanup,
    };
    report.log_summary();
    report
}

async fn execute_scenario<S: LabSession>(
    session: &mut S,
    scenario: &Scenario,
    mode: TransactionMode,
    prepared: &mut Vec<PreparedInsert>,
    executed: &mut Vec<StepOutcome>,
    in_txn: &mut bool,
) -> Result<(), StatementFailure> {
    if mode == TransactionMode::Explicit {
        session
            .begin()
            .await
            .map_err(|e| StatementFailure::from_db(Stage::Begin, &e))?;
        *in_txn = true;
        info!("autocommit=off transaction=begin");
    }

    for table in scenario.tables() {
        let template = StatementTemplate::for_table(table);
        let statement = session
            .prepare(&template)
            .await
            .map_err(|e| StatementFailure::from_db(Stage::Prepare(table), &e))?;
        prepared.push(statement);
    }

    for (idx, step) in scenario.steps().iter().enumerate() {
        let stage = Stage::Insert {
            step: idx + 1,
            table: step.table,
        };
        info!(step = idx + 1, table = %step.table, record = %step.record, "insert=start");

        let statement = prepared
            .iter()
            .find(|p| p.table() == step.table)
            .ok_or_else(|| StatementFailure {
                stage,
                kind: FailureKind::Other,
                message: format!("no prepared statement for {}", step.table),
            })?;

        let rows_affected = session
            .execute(statement, &step.record)
            .await
            .map_err(|e| StatementFailure::from_db(stage, &e))?;

        executed.push(StepOutcome {
            step: idx + 1,
            table: step.table,
            rows_affected,
        });
        if mode == TransactionMode::AutoCommit {
            info!(step = idx + 1, "insert=committed");
        }
    }

    if mode == TransactionMode::Explicit {
        session
            .commit()
            .await
            .map_err(|e| StatementFailure::from_db(Stage::Commit, &e))?;
        *in_txn = false;
        info!("transaction=commit");
    }

    Ok(())
}

/// Close statements, then the session, logging anything that fails.
async fn release<S: LabSession>(mut session: S, prepared: Vec<PreparedInsert>) -> CleanupReport {
    info!("cleanup=start");
    let mut report = CleanupReport {
        statements_opened: prepared.len(),
        ..CleanupReport::default()
    };

    for statement in prepared {
        let table = statement.table();
        report.statement_closes += 1;
        if let Err(e) = session.close_statement(statement).await {
            warn!(table = %table, error = %e, "statement=close_failed");
            report.errors.push(format!("close statement for {table}: {e}"));
        }
    }

    report.connection_closes += 1;
    match session.close().await {
        Ok(()) => info!("connection=closed"),
        Err(e) => {
            warn!(error = %e, "connection=close_failed");
            report.errors.push(format!("close connection: {e}"));
        }
    }

    report
}

/// Process exit status for a finished run.
///
/// A failed run exits 0 like a successful one unless `fail_on_error` is set,
/// in which case a statement failure or a missing connection exits 1.
pub fn exit_code(outcome: &Result<RunReport, LabError>, fail_on_error: bool) -> i32 {
    let failed = match outcome {
        Ok(report) => !report.is_success(),
        Err(_) => true,
    };

    if failed && fail_on_error {
        1
    } else {
        0
    }
}

/// Open a connection from `config` and run `scenario` on it.
///
/// Fails only when no connection can be opened; statement failures are part
/// of the returned report.
pub async fn run(
    config: &DbConfig,
    scenario: &Scenario,
    mode: TransactionMode,
) -> Result<RunReport, LabError> {
    let conn = get_connection(config)
        .await
        .ok_or(LabError::ConnectionUnavailable {
            db_kind: config.kind,
        })?;

    Ok(run_inserts(SeaSession::new(conn), scenario, mode).await)
}

/// Auto-commit entry point: earlier inserts survive a later failure.
pub async fn run_without_rollback(
    config: &DbConfig,
    scenario: &Scenario,
) -> Result<RunReport, LabError> {
    run(config, scenario, TransactionMode::AutoCommit).await
}

/// Explicit-transaction entry point: all inserts or none.
pub async fn run_with_rollback(
    config: &DbConfig,
    scenario: &Scenario,
) -> Result<RunReport, LabError> {
    run(config, scenario, TransactionMode::Explicit).await
}
