use rusqlite::Connection;

use crate::error::Result;

/// Initialise the owners and tasks tables plus the due-date index.
///
/// Safe to call on every startup — uses `IF NOT EXISTS` throughout.
pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS owners (
            id         INTEGER PRIMARY KEY AUTOINCREMENT,
            name       TEXT NOT NULL,
            email      TEXT NOT NULL UNIQUE,
            created_at TEXT NOT NULL
        );
        CREATE TABLE IF NOT EXISTS tasks (
            id         INTEGER PRIMARY KEY AUTOINCREMENT,
            owner_id   INTEGER NOT NULL REFERENCES owners(id),
            project    TEXT NOT NULL,
            title      TEXT NOT NULL,
            body       TEXT NOT NULL,
            due_date   TEXT NOT NULL,  -- ISO-8601 calendar date
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        -- Dispatch passes scan by due date; keep that path indexed.
        CREATE INDEX IF NOT EXISTS idx_tasks_due_date ON tasks (due_date);",
    )?;
    Ok(())
}
