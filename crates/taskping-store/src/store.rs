use std::sync::Mutex;

use rusqlite::Connection;
use taskping_core::types::{Owner, TaskRecord};
use tracing::debug;

use crate::error::{Result, StoreError};

/// Column order shared by every task query in this crate.
const TASK_SELECT: &str = "SELECT t.id, t.project, t.title, t.body, t.due_date, o.name, o.email
     FROM tasks t JOIN owners o ON o.id = t.owner_id";

/// Map a SELECT row (column order from TASK_SELECT) to a TaskRecord.
fn row_to_task(row: &rusqlite::Row<'_>) -> rusqlite::Result<TaskRecord> {
    Ok(TaskRecord {
        id: row.get(0)?,
        project: row.get(1)?,
        title: row.get(2)?,
        body: row.get(3)?,
        due_date: row.get(4)?,
        owner: Owner {
            name: row.get(5)?,
            email: row.get(6)?,
        },
    })
}

/// Thread-safe store for owners and their due-dated tasks.
///
/// Wraps a single SQLite connection in a `Mutex`. The dispatcher and the
/// request-serving surface each open their own `TaskStore` over the same
/// database file, so neither can starve the other on the connection lock.
pub struct TaskStore {
    db: Mutex<Connection>,
}

impl TaskStore {
    /// Wrap an already-open (and `init_db`-initialised) connection.
    pub fn new(conn: Connection) -> Self {
        Self {
            db: Mutex::new(conn),
        }
    }

    /// Register an owner. Returns the assigned row id.
    pub fn add_owner(&self, name: &str, email: &str) -> Result<i64> {
        let now = chrono::Utc::now().to_rfc3339();
        let db = self.db.lock().unwrap();
        db.execute(
            "INSERT INTO owners (name, email, created_at) VALUES (?1, ?2, ?3)",
            rusqlite::params![name, email, now],
        )?;
        let id = db.last_insert_rowid();
        debug!(owner_id = id, "owner added");
        Ok(id)
    }

    /// Create a task for `owner_id`. Returns the fully populated record.
    pub fn add_task(
        &self,
        owner_id: i64,
        project: &str,
        title: &str,
        body: &str,
        due_date: &str,
    ) -> Result<TaskRecord> {
        let now = chrono::Utc::now().to_rfc3339();
        let db = self.db.lock().unwrap();
        db.execute(
            "INSERT INTO tasks (owner_id, project, title, body, due_date, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
            rusqlite::params![owner_id, project, title, body, due_date, now],
        )
        .map_err(|e| {
            if let rusqlite::Error::SqliteFailure(err, _) = &e {
                if err.code == rusqlite::ErrorCode::ConstraintViolation {
                    return StoreError::OwnerNotFound { id: owner_id };
                }
            }
            StoreError::Database(e)
        })?;
        let id = db.last_insert_rowid();
        debug!(task_id = id, owner_id, "task added");

        let task = db.query_row(
            &format!("{TASK_SELECT} WHERE t.id = ?1"),
            [id],
            row_to_task,
        )?;
        Ok(task)
    }

    /// Update a task's editable fields. Returns `TaskNotFound` if no row
    /// matches.
    pub fn update_task(
        &self,
        id: i64,
        project: &str,
        title: &str,
        body: &str,
        due_date: &str,
    ) -> Result<()> {
        let now = chrono::Utc::now().to_rfc3339();
        let db = self.db.lock().unwrap();
        let n = db.execute(
            "UPDATE tasks
             SET project = ?1, title = ?2, body = ?3, due_date = ?4, updated_at = ?5
             WHERE id = ?6",
            rusqlite::params![project, title, body, due_date, now, id],
        )?;
        if n == 0 {
            return Err(StoreError::TaskNotFound { id });
        }
        Ok(())
    }

    /// Permanently delete a task. Returns `TaskNotFound` if no row matches.
    pub fn delete_task(&self, id: i64) -> Result<()> {
        let db = self.db.lock().unwrap();
        let n = db.execute("DELETE FROM tasks WHERE id = ?1", [id])?;
        if n == 0 {
            return Err(StoreError::TaskNotFound { id });
        }
        debug!(task_id = id, "task deleted");
        Ok(())
    }

    /// List one owner's tasks, soonest due date first.
    pub fn list_for_owner(&self, owner_id: i64) -> Result<Vec<TaskRecord>> {
        let db = self.db.lock().unwrap();
        let mut stmt =
            db.prepare(&format!("{TASK_SELECT} WHERE t.owner_id = ?1 ORDER BY t.due_date"))?;
        let rows = stmt.query_map([owner_id], row_to_task)?;
        Ok(rows.filter_map(|r| r.ok()).collect())
    }

    /// Read the full task collection in a single SELECT.
    ///
    /// One statement means one SQLite snapshot: a dispatch pass never sees
    /// a half-written record even while the request-serving surface commits
    /// edits concurrently.
    pub fn list_all(&self) -> Result<Vec<TaskRecord>> {
        let db = self.db.lock().unwrap();
        let mut stmt = db.prepare(TASK_SELECT)?;
        let rows = stmt.query_map([], row_to_task)?;
        Ok(rows.filter_map(|r| r.ok()).collect())
    }
}
