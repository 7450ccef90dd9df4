//! Database schema migration management for the reflection store.
//!
//! Keeps a versioned record of applied migrations so the schema can
//! evolve without manual intervention. Pending migrations run inside a
//! transaction during database initialization.

use anyhow::Result;
use rusqlite::{params, Connection, Transaction};
use tracing::debug;

/// SQL schema for the migrations tracking table.
const MIGRATIONS_TABLE: &str = "
CREATE TABLE IF NOT EXISTS migrations (
    id INTEGER PRIMARY KEY,
    version INTEGER NOT NULL UNIQUE,
    name TEXT NOT NULL,
    applied_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
)";

/// A single schema migration with its transformation function.
#[derive(Debug, Clone)]
struct Migration {
    /// Unique version number for ordering and tracking
    version: u32,
    /// Human-readable name describing the migration's purpose
    name: &'static str,
    /// Function that applies the schema changes within a transaction
    up: fn(&Transaction) -> Result<()>,
}

/// Applies any pending migrations to the given connection.
pub fn migrate(conn: &mut Connection) -> Result<()> {
    conn.execute(MIGRATIONS_TABLE, [])?;
    let current = get_db_version(conn)?;

    for migration in registry() {
        if migration.version <= current {
            continue;
        }
        debug!(version = migration.version, name = migration.name, "Applying migration");
        let tx = conn.transaction()?;
        (migration.up)(&tx)?;
        tx.execute(
            "INSERT INTO migrations (version, name) VALUES (?1, ?2)",
            params![migration.version, migration.name],
        )?;
        tx.commit()?;
    }

    Ok(())
}

/// Returns the highest applied migration version, 0 for a fresh database.
pub fn get_db_version(conn: &Connection) -> Result<u32> {
    let version = conn.query_row("SELECT COALESCE(MAX(version), 0) FROM migrations", [], |row| row.get(0))?;
    Ok(version)
}

/// All migrations in chronological order.
fn registry() -> Vec<Migration> {
    vec![Migration {
        version: 1,
        name: "create reflection tables",
        up: create_reflection_tables,
    }]
}

fn create_reflection_tables(tx: &Transaction) -> Result<()> {
    tx.execute(
        "CREATE TABLE IF NOT EXISTS reflections (
            id INTEGER PRIMARY KEY,
            type TEXT NOT NULL,
            date TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
            priorities TEXT,
            intention TEXT,
            reflection TEXT,
            challenges TEXT,
            tomorrow TEXT
        )",
        [],
    )?;
    tx.execute(
        "CREATE TABLE IF NOT EXISTS images (
            id INTEGER PRIMARY KEY,
            reflection_id INTEGER NOT NULL REFERENCES reflections(id) ON DELETE CASCADE,
            filename TEXT NOT NULL,
            path TEXT NOT NULL,
            uploaded_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )?;
    Ok(())
}
