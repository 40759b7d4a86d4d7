//! Auto-commit versus explicit-transaction insert lab.
//!
//! One run issues four inserts across two tables. In auto-commit mode every
//! insert that succeeds stays; in explicit mode a failure rolls all of them
//! back. See [`runner`] for the run itself.

pub mod error;
pub mod infra;
pub mod inspect;
pub mod records;
pub mod runner;
pub mod session;
pub mod telemetry;
pub mod template;

#[cfg(test)]
pub mod test_support;

pub use error::LabError;
pub use records::{Field, InsertRecord, Scenario, Step, Table};
pub use runner::{
    exit_code, run, run_inserts, run_with_rollback, run_without_rollback, RunReport, Terminal,
    TransactionMode,
};
pub use session::{LabSession, SeaSession};
