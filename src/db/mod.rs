pub mod migrations;
pub mod queries;

use anyhow::Context;
use rusqlite::Connection;

/// Storage format for every instant column. Lexicographic order matches
/// chronological order, which the range queries rely on.
pub const DATETIME_FMT: &str = "%Y-%m-%d %H:%M:%S";

pub fn init_db(path: &str) -> anyhow::Result<Connection> {
    let conn = Connection::open(path).context("failed to open database")?;

    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON; PRAGMA busy_timeout=5000;")
        .context("failed to set database pragmas")?;

    migrations::run_migrations(&conn)?;

    Ok(conn)
}
