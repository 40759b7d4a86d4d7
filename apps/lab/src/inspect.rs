//! Read-only queries used to show what a run left behind.

use sea_orm::{ConnectionTrait, DbErr, Statement};

use crate::records::Table;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableCounts {
    pub contacts: u64,
    pub people: u64,
}

pub async fn count_rows<C: ConnectionTrait>(conn: &C, table: Table) -> Result<u64, DbErr> {
    let backend = conn.get_database_backend();
    let stmt = Statement::from_string(
        backend,
        format!("SELECT COUNT(*) AS row_count FROM {}", table.name()),
    );

    let row = conn
        .query_one(stmt)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound(format!("no count row for {table}")))?;
    let count: i64 = row.try_get("", "row_count")?;
    Ok(u64::try_from(count).unwrap_or_default())
}

pub async fn table_counts<C: ConnectionTrait>(conn: &C) -> Result<TableCounts, DbErr> {
    Ok(TableCounts {
        contacts: count_rows(conn, Table::Contacts).await?,
        people: count_rows(conn, Table::People).await?,
    })
}

/// Contact codes currently stored, in ascending order.
pub async fn contact_codes<C: ConnectionTrait>(conn: &C) -> Result<Vec<String>, DbErr> {
    let backend = conn.get_database_backend();
    let stmt = Statement::from_string(
        backend,
        format!("SELECT code FROM {} ORDER BY code", Table::Contacts.name()),
    );

    conn.query_all(stmt)
        .await?
        .iter()
        .map(|row| row.try_get::<String>("", "code"))
        .collect()
}
