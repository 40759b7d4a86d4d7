use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use db_infra::{orchestrate_migration, DbConfig, DbKind};
use migration::MigrationCommand;

#[derive(Clone, Copy, ValueEnum)]
enum Command {
    Up,
    Down,
    Fresh,
    Reset,
    Refresh,
    Status,
}

impl From<Command> for MigrationCommand {
    fn from(command: Command) -> Self {
        match command {
            Command::Up => MigrationCommand::Up,
            Command::Down => MigrationCommand::Down,
            Command::Fresh => MigrationCommand::Fresh,
            Command::Reset => MigrationCommand::Reset,
            Command::Refresh => MigrationCommand::Refresh,
            Command::Status => MigrationCommand::Status,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Db {
    Mysql,
    Postgres,
    SqliteFile,
}

#[derive(Parser)]
#[command(name = "migration-cli")]
#[command(about = "Create or drop the lab tables")]
struct Args {
    /// Migration command to run
    #[arg(value_enum)]
    command: Command,

    /// Database type (overrides LAB_DB_KIND)
    #[arg(
        short,
        long,
        value_enum,
        help = "Database type: mysql, postgres, sqlite-file"
    )]
    db: Option<Db>,

    /// SQLite database file (overrides LAB_SQLITE_FILE)
    #[arg(long)]
    sqlite_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stdout)
        .without_time()
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_line_number(false)
        .with_file(false)
        .with_env_filter("migration=info,db_infra=info,sqlx=warn")
        .init();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            if e.to_string().contains("invalid value") && e.to_string().contains("--db") {
                eprintln!("❌ Unsupported database type provided.");
                eprintln!();
                eprintln!("Note: SQLite in-memory databases are not supported for CLI operations.");
                eprintln!("Reason: the schema would vanish as soon as the command exits.");
                eprintln!();
                eprintln!("Supported database types:");
                eprintln!("  • mysql       - MySQL database");
                eprintln!("  • postgres    - PostgreSQL database");
                eprintln!("  • sqlite-file - SQLite file database");
                std::process::exit(1);
            }
            e.exit();
        }
    };

    let mut config = match DbConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {e}");
            std::process::exit(1);
        }
    };
    if let Some(db) = args.db {
        config = config.with_kind(match db {
            Db::Mysql => DbKind::MySql,
            Db::Postgres => DbKind::Postgres,
            Db::SqliteFile => DbKind::SqliteFile,
        });
    }
    if let Some(path) = &args.sqlite_file {
        config = config.with_sqlite_file(path);
    }

    if let Err(e) = orchestrate_migration(&config, args.command.into()).await {
        eprintln!("Migration failed: {e}");
        std::process::exit(1);
    }
}
