//! Due-item evaluation — pure filtering of the task collection.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use taskping_core::types::TaskRecord;

use crate::types::{DataError, DueTask};

/// Expected storage format for `due_date`.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Filter `tasks` down to the records whose due date, interpreted as start
/// of day UTC, is on or before `now`.
///
/// Pure function of its inputs; result ordering is unspecified and callers
/// must not depend on it. Records with an unparseable due date go into the
/// error list instead of the due set.
pub fn due_tasks(now: DateTime<Utc>, tasks: &[TaskRecord]) -> (Vec<DueTask>, Vec<DataError>) {
    let mut due = Vec::new();
    let mut errors = Vec::new();
    for task in tasks {
        match NaiveDate::parse_from_str(&task.due_date, DATE_FORMAT) {
            Ok(date) => {
                let start_of_day = date.and_time(NaiveTime::MIN).and_utc();
                if start_of_day <= now {
                    due.push(DueTask {
                        task: task.clone(),
                        due: date,
                    });
                }
            }
            Err(_) => errors.push(DataError {
                task_id: task.id,
                raw: task.due_date.clone(),
            }),
        }
    }
    (due, errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use taskping_core::types::Owner;

    fn record(id: i64, due_date: &str) -> TaskRecord {
        TaskRecord {
            id,
            project: "Ops".to_string(),
            title: format!("task {id}"),
            body: String::new(),
            due_date: due_date.to_string(),
            owner: Owner {
                name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
            },
        }
    }

    #[test]
    fn includes_past_and_today_excludes_future() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let tasks = vec![
            record(1, "2024-05-30"),
            record(2, "2024-06-01"),
            record(3, "2024-06-02"),
        ];
        let (due, errors) = due_tasks(now, &tasks);
        let ids: Vec<i64> = due.iter().map(|d| d.task.id).collect();
        assert!(ids.contains(&1));
        assert!(ids.contains(&2));
        assert!(!ids.contains(&3));
        assert!(errors.is_empty());
    }

    #[test]
    fn due_today_counts_at_midnight() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let (due, _) = due_tasks(now, &[record(1, "2024-06-01")]);
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].due, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
    }

    #[test]
    fn far_future_task_is_excluded() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let tasks = vec![record(1, "2024-01-01"), record(2, "2099-01-01")];
        let (due, errors) = due_tasks(now, &tasks);
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].task.id, 1);
        assert!(errors.is_empty());
    }

    #[test]
    fn unparseable_date_reported_once_and_excluded() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let tasks = vec![record(1, "June 01, 2024"), record(2, "2024-01-01")];
        let (due, errors) = due_tasks(now, &tasks);
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].task.id, 2);
        assert_eq!(
            errors,
            vec![DataError {
                task_id: 1,
                raw: "June 01, 2024".to_string()
            }]
        );
    }

    #[test]
    fn empty_collection_is_empty_result() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let (due, errors) = due_tasks(now, &[]);
        assert!(due.is_empty());
        assert!(errors.is_empty());
    }
}
