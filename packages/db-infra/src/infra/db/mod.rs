pub mod core;

pub use self::core::{close_connection, connect, get_connection, orchestrate_migration};
