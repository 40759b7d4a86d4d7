//! A [`LabSession`] that records every call instead of talking to a database.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use sea_orm::{DatabaseBackend, DbErr};

use crate::records::{InsertRecord, Table};
use crate::session::LabSession;
use crate::template::{PreparedInsert, StatementTemplate};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Begin,
    /// Only successful prepares are recorded.
    Prepare(Table),
    Execute(Table),
    Commit,
    Rollback,
    CloseStatement(Table),
    Close,
}

/// Which call should fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailAt {
    Begin,
    Prepare(Table),
    /// 1-based count of execute calls.
    Execute(usize),
    Commit,
    Rollback,
    CloseStatement(Table),
    Close,
}

/// Shared view of the calls a [`RecordingSession`] received.
#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<Call>>>);

impl CallLog {
    fn push(&self, call: Call) {
        self.0.lock().expect("call log poisoned").push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.0.lock().expect("call log poisoned").clone()
    }

    fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|c| pred(c)).count()
    }

    pub fn prepares(&self) -> usize {
        self.count(|c| matches!(c, Call::Prepare(_)))
    }

    pub fn executes(&self) -> usize {
        self.count(|c| matches!(c, Call::Execute(_)))
    }

    pub fn statement_closes(&self) -> usize {
        self.count(|c| matches!(c, Call::CloseStatement(_)))
    }

    pub fn closes(&self) -> usize {
        self.count(|c| *c == Call::Close)
    }

    /// Successfully prepared statements never handed back for closing.
    pub fn open_statements(&self) -> usize {
        self.prepares().saturating_sub(self.statement_closes())
    }
}

pub struct RecordingSession {
    log: CallLog,
    fail: Vec<FailAt>,
    executes: usize,
    next_id: u32,
}

impl RecordingSession {
    pub fn new() -> (Self, CallLog) {
        Self::failing_many(&[])
    }

    pub fn failing(at: FailAt) -> (Self, CallLog) {
        Self::failing_many(&[at])
    }

    pub fn failing_many(at: &[FailAt]) -> (Self, CallLog) {
        let log = CallLog::default();
        let session = Self {
            log: log.clone(),
            fail: at.to_vec(),
            executes: 0,
            next_id: 1,
        };
        (session, log)
    }

    fn check(&self, at: FailAt, message: &str) -> Result<(), DbErr> {
        if self.fail.contains(&at) {
            Err(DbErr::Custom(message.to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl LabSession for RecordingSession {
    fn backend(&self) -> DatabaseBackend {
        DatabaseBackend::Sqlite
    }

    async fn begin(&mut self) -> Result<(), DbErr> {
        self.log.push(Call::Begin);
        self.check(FailAt::Begin, "cannot begin transaction")
    }

    async fn prepare(&mut self, template: &StatementTemplate) -> Result<PreparedInsert, DbErr> {
        self.check(FailAt::Prepare(template.table()), "cannot prepare statement")?;
        self.log.push(Call::Prepare(template.table()));

        let id = self.next_id;
        self.next_id += 1;
        Ok(PreparedInsert::new(id, *template, self.backend()))
    }

    async fn execute(
        &mut self,
        statement: &PreparedInsert,
        record: &InsertRecord,
    ) -> Result<u64, DbErr> {
        self.executes += 1;
        self.log.push(Call::Execute(statement.table()));
        self.check(
            FailAt::Execute(self.executes),
            "cannot store TEXT value in INTEGER column people.age",
        )?;
        statement.bind(record)?;
        Ok(1)
    }

    async fn commit(&mut self) -> Result<(), DbErr> {
        self.log.push(Call::Commit);
        self.check(FailAt::Commit, "commit failed")
    }

    async fn rollback(&mut self) -> Result<(), DbErr> {
        self.log.push(Call::Rollback);
        self.check(FailAt::Rollback, "rollback failed")
    }

    async fn close_statement(&mut self, statement: PreparedInsert) -> Result<(), DbErr> {
        self.log.push(Call::CloseStatement(statement.table()));
        self.check(FailAt::CloseStatement(statement.table()), "close statement failed")
    }

    async fn close(self) -> Result<(), DbErr> {
        self.log.push(Call::Close);
        self.check(FailAt::Close, "close failed")
    }
}
