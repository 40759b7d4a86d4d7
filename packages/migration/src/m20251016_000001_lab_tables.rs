use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::{ConnectionTrait, DatabaseBackend};

#[derive(DeriveMigrationName)]
pub struct Migration;

// ----- Iden enums for tables & columns -----
#[derive(Iden)]
pub enum Contacts {
    Table,
    Code,
    Email,
}

#[derive(Iden)]
pub enum People {
    Table,
    FirstName,
    LastName,
    Age,
}

// SQLite only enforces declared column types on STRICT tables, and sea-query
// has no STRICT table option, so SQLite gets hand-written DDL.
const SQLITE_CREATE_CONTACTS: &str = "CREATE TABLE IF NOT EXISTS contacts (
    code TEXT NOT NULL PRIMARY KEY,
    email TEXT NOT NULL
) STRICT";

const SQLITE_CREATE_PEOPLE: &str = "CREATE TABLE IF NOT EXISTS people (
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    age INTEGER NOT NULL
) STRICT";

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        if manager.get_database_backend() == DatabaseBackend::Sqlite {
            let db = manager.get_connection();
            db.execute_unprepared(SQLITE_CREATE_CONTACTS).await?;
            db.execute_unprepared(SQLITE_CREATE_PEOPLE).await?;
            return Ok(());
        }

        manager
            .create_table(
                Table::create()
                    .table(Contacts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Contacts::Code)
                            .string_len(6)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Contacts::Email).string_len(255).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(People::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(People::FirstName).string_len(64).not_null())
                    .col(ColumnDef::new(People::LastName).string_len(64).not_null())
                    .col(ColumnDef::new(People::Age).integer().not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(People::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Contacts::Table).if_exists().to_owned())
            .await
    }
}
