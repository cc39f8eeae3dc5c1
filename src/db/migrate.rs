use crate::errors::{AppError, AppResult};
use crate::ui::messages::success;
use rusqlite::{Connection, OptionalExtension, Result};

/// A schema change applied at most once, tracked in the `log` table.
struct Migration {
    version: &'static str,
    description: &'static str,
    sql: &'static str,
}

/// Ordered list of upgrades on top of the base schema.
const MIGRATIONS: &[Migration] = &[
    Migration {
        version: "20250726_0001_index_doses_by_date",
        description: "Added date/time index on doses",
        sql: "CREATE INDEX IF NOT EXISTS idx_doses_date_time ON doses(date, time);",
    },
    Migration {
        version: "20250801_0002_index_day_notes",
        description: "Added partial index on non-empty day notes",
        sql: "CREATE INDEX IF NOT EXISTS idx_doses_day_note
                  ON doses(date) WHERE day_note IS NOT NULL AND day_note <> '';",
    },
];

/// Ensure that the `log` table exists with the modern schema.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

/// Check if the `doses` table exists.
fn doses_table_exists(conn: &Connection) -> Result<bool> {
    let mut stmt =
        conn.prepare("SELECT name FROM sqlite_master WHERE type='table' AND name='doses'")?;
    let exists: Option<String> = stmt.query_row([], |row| row.get(0)).optional()?;
    Ok(exists.is_some())
}

/// Create the `doses` table. The UNIQUE clause is what makes
/// reconciliation idempotent.
fn create_doses_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS doses (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            date          TEXT NOT NULL,              -- YYYY-MM-DD
            time          TEXT NOT NULL,              -- HH:MM
            drug_name     TEXT NOT NULL,
            dosage        TEXT NOT NULL,
            day_note      TEXT,
            administered  INTEGER NOT NULL DEFAULT 0 CHECK (administered IN (0, 1)),
            dose_note     TEXT,
            UNIQUE (date, time, drug_name, dosage)
        );
        "#,
    )?;
    Ok(())
}

fn is_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn apply(conn: &Connection, m: &Migration) -> AppResult<()> {
    let tx = conn.unchecked_transaction()?;

    tx.execute_batch(m.sql)
        .map_err(|e| AppError::Migration(format!("{}: {}", m.version, e)))?;

    tx.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
        [m.version, m.description],
    )?;

    tx.commit()?;

    success(format!("Migration applied: {} → {}", m.version, m.description));
    Ok(())
}

/// Versions of every migration not yet recorded as applied.
pub fn pending_migrations(conn: &Connection) -> AppResult<Vec<&'static str>> {
    ensure_log_table(conn)?;
    let mut out = Vec::new();
    for m in MIGRATIONS {
        if !is_applied(conn, m.version)? {
            out.push(m.version);
        }
    }
    Ok(out)
}

/// Public entry point: run all pending migrations.
///
/// Invoked by db::initialize::init_db().
pub fn run_pending_migrations(conn: &Connection) -> AppResult<()> {
    // 1) Ensure log table
    ensure_log_table(conn)?;

    // 2) Base schema
    if !doses_table_exists(conn)? {
        create_doses_table(conn)?;
        success("Created doses table.");
    }

    // 3) Versioned upgrades, in order
    for m in MIGRATIONS {
        if !is_applied(conn, m.version)? {
            apply(conn, m)?;
        }
    }

    Ok(())
}
