use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use db_infra::{close_connection, connect, DbConfig, DbKind};
use rollback_lab::inspect::table_counts;
use rollback_lab::telemetry::init_tracing;
use rollback_lab::{exit_code, run, Scenario, TransactionMode};
use tracing::{error, info};

#[derive(Clone, Copy, ValueEnum)]
enum Db {
    Mysql,
    Postgres,
    SqliteFile,
    SqliteMemory,
}

impl From<Db> for DbKind {
    fn from(db: Db) -> Self {
        match db {
            Db::Mysql => DbKind::MySql,
            Db::Postgres => DbKind::Postgres,
            Db::SqliteFile => DbKind::SqliteFile,
            Db::SqliteMemory => DbKind::SqliteMemory,
        }
    }
}

#[derive(Parser)]
#[command(name = "lab")]
#[command(about = "Run the same four inserts with and without an explicit transaction")]
struct Cli {
    /// Database type (overrides LAB_DB_KIND)
    #[arg(short, long, value_enum, global = true)]
    db: Option<Db>,

    /// SQLite database file (overrides LAB_SQLITE_FILE)
    #[arg(long, global = true)]
    sqlite_file: Option<PathBuf>,

    /// Emit JSON log lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Leave auto-commit on: inserts before a failure stay committed
    NoRollback(RunArgs),
    /// One explicit transaction: a failure rolls every insert back
    Rollback(RunArgs),
    /// Print how many rows each lab table holds
    Counts,
}

#[derive(Args)]
struct RunArgs {
    /// Bind an integer age so the fourth insert succeeds
    #[arg(long)]
    well_typed: bool,

    /// Exit with status 1 when the run fails (default: always exit 0)
    #[arg(long)]
    fail_on_error: bool,
}

fn load_config(cli: &Cli) -> Result<DbConfig, db_infra::DbInfraError> {
    let mut config = DbConfig::from_env()?;
    if let Some(db) = cli.db {
        config = config.with_kind(db.into());
    }
    if let Some(path) = &cli.sqlite_file {
        config = config.with_sqlite_file(path);
    }
    Ok(config)
}

async fn run_mode(config: &DbConfig, mode: TransactionMode, args: &RunArgs) -> i32 {
    let scenario = if args.well_typed {
        Scenario::well_typed()
    } else {
        Scenario::type_mismatch()
    };

    let outcome = run(config, &scenario, mode).await;
    match &outcome {
        Ok(report) => println!(
            "{mode}: {} of {} inserts executed, {} durable ({:?})",
            report.executed.len(),
            scenario.steps().len(),
            report.durable_inserts(),
            report.terminal
        ),
        Err(e) => error!(error = %e, "run=aborted"),
    }

    exit_code(&outcome, args.fail_on_error)
}

async fn show_counts(config: &DbConfig) -> i32 {
    let conn = match connect(config).await {
        Ok(conn) => conn,
        Err(e) => {
            error!(error = %e, "counts=unavailable");
            return 1;
        }
    };

    let code = match table_counts(&conn).await {
        Ok(counts) => {
            println!("contacts: {}", counts.contacts);
            println!("people:   {}", counts.people);
            0
        }
        Err(e) => {
            error!(error = %e, "counts=failed");
            1
        }
    };

    close_connection(conn).await;
    code
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.json);

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {e}");
            std::process::exit(1);
        }
    };
    info!(db_kind = %config.kind, "lab=start");

    let code = match &cli.command {
        Command::NoRollback(args) => run_mode(&config, TransactionMode::AutoCommit, args).await,
        Command::Rollback(args) => run_mode(&config, TransactionMode::Explicit, args).await,
        Command::Counts => show_counts(&config).await,
    };

    std::process::exit(code);
}
