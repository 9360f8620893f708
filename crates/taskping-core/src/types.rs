use serde::{Deserialize, Serialize};

/// Delivery identity for reminders — the person a task belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    /// Display name used in the reminder salutation.
    pub name: String,
    /// Address reminders are delivered to.
    pub email: String,
}

/// One reminder-eligible item, as read back from the task store.
///
/// The store joins the owning user in so a dispatch pass never needs a
/// second lookup per task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskRecord {
    /// SQLite rowid — assigned by the store on insert.
    pub id: i64,
    /// Free-form grouping label shown in the reminder subject.
    pub project: String,
    pub title: String,
    /// May contain HTML markup from the editing surface; reduced to plain
    /// text before it reaches a notification.
    pub body: String,
    /// Calendar due date, ISO-8601 `YYYY-MM-DD`. Parsed at evaluation time;
    /// records that fail to parse are excluded from the due set and
    /// reported, never silently treated as due.
    pub due_date: String,
    pub owner: Owner,
}
