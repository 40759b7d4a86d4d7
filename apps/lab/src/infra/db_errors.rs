//! Classification of driver errors raised while a run executes statements.
//!
//! Drivers surface constraint and type errors as opaque text, so the kind is
//! recovered from SQLSTATE codes and the backends' well-known messages.

use std::fmt;

use sea_orm::DbErr;

/// What went wrong with a statement, as far as the lab cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// A bound value does not fit the column type.
    TypeMismatch,
    /// A primary key or unique constraint rejected the row.
    UniqueViolation,
    Other,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FailureKind::TypeMismatch => "type_mismatch",
            FailureKind::UniqueViolation => "unique_violation",
            FailureKind::Other => "other",
        })
    }
}

fn mentions_sqlstate(msg: &str, code: &str) -> bool {
    msg.contains(&format!("SQLSTATE({code})")) || msg.contains(&format!("({code})"))
}

fn is_unique_violation(msg: &str) -> bool {
    mentions_sqlstate(msg, "23505")
        || msg.contains("duplicate key value violates unique constraint")
        || msg.contains("UNIQUE constraint failed")
        || msg.contains("Duplicate entry")
}

fn is_type_mismatch(msg: &str) -> bool {
    mentions_sqlstate(msg, "42804")
        || mentions_sqlstate(msg, "22P02")
        || (msg.contains("is of type") && msg.contains("but expression is of type"))
        || msg.contains("invalid input syntax for type integer")
        || msg.contains("cannot store TEXT value in INTEGER column")
        || msg.contains("Incorrect integer value")
        || msg.contains("datatype mismatch")
}

/// Translate a `DbErr` into the failure kind reported by a run.
pub fn classify_db_err(e: &DbErr) -> FailureKind {
    let error_msg = e.to_string();

    if is_unique_violation(&error_msg) {
        return FailureKind::UniqueViolation;
    }
    if is_type_mismatch(&error_msg) {
        return FailureKind::TypeMismatch;
    }
    FailureKind::Other
}
