//! Parameterized INSERT templates and their prepared form.

use sea_orm::{DatabaseBackend, DbErr, Statement};

use crate::records::{InsertRecord, Table};

/// `INSERT INTO <table> VALUES (?, ...)` with one placeholder per column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatementTemplate {
    table: Table,
}

impl StatementTemplate {
    pub fn for_table(table: Table) -> Self {
        Self { table }
    }

    pub fn table(&self) -> Table {
        self.table
    }

    pub fn arity(&self) -> usize {
        self.table.arity()
    }

    /// Render the SQL text with the backend's placeholder syntax.
    pub fn sql(&self, backend: DatabaseBackend) -> String {
        let placeholders: Vec<String> = (1..=self.arity())
            .map(|n| match backend {
                DatabaseBackend::Postgres => format!("${n}"),
                _ => "?".to_string(),
            })
            .collect();

        format!(
            "INSERT INTO {} VALUES ({})",
            self.table.name(),
            placeholders.join(", ")
        )
    }
}

/// A template prepared on a live session.
///
/// Preparation is client-side: issuing or closing a handle never contacts the
/// database; the driver prepares and caches the SQL on first execution.
/// Handles are issued by the session that owns them and must be handed back to
/// it to be closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedInsert {
    id: u32,
    template: StatementTemplate,
    backend: DatabaseBackend,
    sql: String,
}

impl PreparedInsert {
    pub fn new(id: u32, template: StatementTemplate, backend: DatabaseBackend) -> Self {
        Self {
            id,
            template,
            backend,
            sql: template.sql(backend),
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn table(&self) -> Table {
        self.template.table()
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Bind a record's literals to the placeholders.
    pub fn bind(&self, record: &InsertRecord) -> Result<Statement, DbErr> {
        if record.len() != self.template.arity() {
            return Err(DbErr::Custom(format!(
                "{} expects {} values, got {}",
                self.table(),
                self.template.arity(),
                record.len()
            )));
        }

        Ok(Statement::from_sql_and_values(
            self.backend,
            self.sql.clone(),
            record.values(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{contact_records, well_typed_person};

    #[test]
    fn test_sql_uses_question_marks_for_mysql_and_sqlite() {
        let contacts = StatementTemplate::for_table(Table::Contacts);
        let people = StatementTemplate::for_table(Table::People);

        assert_eq!(
            contacts.sql(DatabaseBackend::MySql),
            "INSERT INTO contacts VALUES (?, ?)"
        );
        assert_eq!(
            people.sql(DatabaseBackend::Sqlite),
            "INSERT INTO people VALUES (?, ?, ?)"
        );
    }

    #[test]
    fn test_sql_uses_numbered_placeholders_for_postgres() {
        let people = StatementTemplate::for_table(Table::People);
        assert_eq!(
            people.sql(DatabaseBackend::Postgres),
            "INSERT INTO people VALUES ($1, $2, $3)"
        );
    }

    #[test]
    fn test_bind_attaches_values_in_order() {
        let prepared = PreparedInsert::new(
            1,
            StatementTemplate::for_table(Table::People),
            DatabaseBackend::Sqlite,
        );
        let stmt = prepared.bind(&well_typed_person()).unwrap();

        assert_eq!(stmt.sql, "INSERT INTO people VALUES (?, ?, ?)");
        let values = stmt.values.expect("bound values").0;
        assert_eq!(values, well_typed_person().values());
    }

    #[test]
    fn test_bind_rejects_wrong_arity() {
        let prepared = PreparedInsert::new(
            1,
            StatementTemplate::for_table(Table::People),
            DatabaseBackend::Sqlite,
        );
        let err = prepared.bind(&contact_records()[0]).unwrap_err();
        assert!(err.to_string().contains("people expects 3 values, got 2"));
    }
}
