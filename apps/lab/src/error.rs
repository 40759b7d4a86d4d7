use db_infra::DbKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LabError {
    #[error("Database unavailable: could not open a {db_kind} connection")]
    ConnectionUnavailable { db_kind: DbKind },
}
