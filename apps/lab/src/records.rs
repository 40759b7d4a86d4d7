//! Lab tables, literal records and the insert scenarios built from them.

use std::fmt;

use sea_orm::Value;

/// The two pre-existing lab tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    /// `contacts (code, email)`
    Contacts,
    /// `people (first_name, last_name, age)`; `age` is an integer column.
    People,
}

impl Table {
    pub fn name(self) -> &'static str {
        match self {
            Table::Contacts => "contacts",
            Table::People => "people",
        }
    }

    /// Number of columns an insert must bind.
    pub fn arity(self) -> usize {
        match self {
            Table::Contacts => 2,
            Table::People => 3,
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A literal value bound to one placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    Text(String),
    Int(i32),
}

impl From<&Field> for Value {
    fn from(field: &Field) -> Self {
        match field {
            Field::Text(text) => Value::from(text.clone()),
            Field::Int(n) => Value::from(*n),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Text(text) => write!(f, "{text:?}"),
            Field::Int(n) => write!(f, "{n}"),
        }
    }
}

/// Ordered tuple of literals bound to a template before execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertRecord {
    fields: Vec<Field>,
}

impl InsertRecord {
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn values(&self) -> Vec<Value> {
        self.fields.iter().map(Value::from).collect()
    }
}

impl fmt::Display for InsertRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{field}")?;
        }
        f.write_str(")")
    }
}

fn text(value: &str) -> Field {
    Field::Text(value.to_string())
}

/// The three `contacts` rows every scenario starts with.
pub fn contact_records() -> Vec<InsertRecord> {
    [
        ("000001", "micorreo@mail.com"),
        ("000002", "amayuya@mail.com"),
        ("000003", "diosdado@mail.com"),
    ]
    .into_iter()
    .map(|(code, email)| InsertRecord::new(vec![text(code), text(email)]))
    .collect()
}

/// `people` row whose third field is text bound against the integer `age`
/// column. The database must reject it.
pub fn mismatched_person() -> InsertRecord {
    InsertRecord::new(vec![text("Juan"), text("Perez"), text("Hola soy un error")])
}

pub fn well_typed_person() -> InsertRecord {
    InsertRecord::new(vec![text("Juan"), text("Perez"), Field::Int(99)])
}

/// One insert of a scenario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub table: Table,
    pub record: InsertRecord,
}

/// Ordered inserts a run issues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario {
    steps: Vec<Step>,
}

impl Scenario {
    pub fn new(steps: Vec<Step>) -> Self {
        Self { steps }
    }

    /// Three contacts followed by the deliberately mistyped person.
    pub fn type_mismatch() -> Self {
        Self::with_person(mismatched_person())
    }

    /// Three contacts followed by a person every backend accepts.
    pub fn well_typed() -> Self {
        Self::with_person(well_typed_person())
    }

    fn with_person(person: InsertRecord) -> Self {
        let mut steps: Vec<Step> = contact_records()
            .into_iter()
            .map(|record| Step {
                table: Table::Contacts,
                record,
            })
            .collect();
        steps.push(Step {
            table: Table::People,
            record: person,
        });
        Self { steps }
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Tables touched, in first-use order, each listed once.
    pub fn tables(&self) -> Vec<Table> {
        let mut tables = Vec::new();
        for step in &self.steps {
            if !tables.contains(&step.table) {
                tables.push(step.table);
            }
        }
        tables
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_mismatch_scenario_shape() {
        let scenario = Scenario::type_mismatch();
        let tables: Vec<Table> = scenario.steps().iter().map(|s| s.table).collect();
        assert_eq!(
            tables,
            vec![Table::Contacts, Table::Contacts, Table::Contacts, Table::People]
        );
        assert_eq!(scenario.tables(), vec![Table::Contacts, Table::People]);
        assert_eq!(scenario.steps()[3].record, mismatched_person());
    }

    #[test]
    fn test_records_match_table_arity() {
        for scenario in [Scenario::type_mismatch(), Scenario::well_typed()] {
            for step in scenario.steps() {
                assert_eq!(step.record.len(), step.table.arity());
            }
        }
    }

    #[test]
    fn test_well_typed_person_binds_integer_age() {
        assert_eq!(well_typed_person().fields()[2], Field::Int(99));
        assert_eq!(
            mismatched_person().fields()[2],
            Field::Text("Hola soy un error".to_string())
        );
    }

    #[test]
    fn test_record_display() {
        assert_eq!(
            contact_records()[0].to_string(),
            r#"("000001", "micorreo@mail.com")"#
        );
        assert_eq!(well_typed_person().to_string(), r#"("Juan", "Perez", 99)"#);
    }

    #[test]
    fn test_values_preserve_field_types() {
        let values = well_typed_person().values();
        assert_eq!(values[0], Value::from("Juan".to_string()));
        assert_eq!(values[2], Value::from(99i32));
    }
}
