//! In-memory dispatch bookkeeping — owned exclusively by the engine task.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Timelike, Utc};

/// Process-lifetime notification bookkeeping.
///
/// Not persisted: a restart forgets both ledgers, so a process that comes
/// back up after midnight may repeat one daily sweep and one reminder per
/// task. That is the accepted trade-off of the non-durable design.
///
/// Only the engine task reads or mutates this, so it needs no
/// synchronisation.
#[derive(Debug, Default)]
pub struct DispatchState {
    /// Calendar date of the last once-daily sweep.
    last_daily_sweep: Option<NaiveDate>,
    /// Per-task date of the last successful notification.
    last_notified: HashMap<i64, NaiveDate>,
}

impl DispatchState {
    pub fn new() -> Self {
        Self::default()
    }

    /// True exactly on the first tick of a new calendar day: the hour must
    /// be zero and the sweep must not have run on today's date yet.
    pub fn should_run_daily_sweep(&self, now: DateTime<Utc>) -> bool {
        now.hour() == 0 && self.last_daily_sweep != Some(now.date_naive())
    }

    /// Mark the daily sweep as done for `now`'s date. Until the date
    /// advances, [`should_run_daily_sweep`](Self::should_run_daily_sweep)
    /// returns false.
    pub fn record_daily_sweep(&mut self, now: DateTime<Utc>) {
        self.last_daily_sweep = Some(now.date_naive());
    }

    /// True when `task_id` already got its reminder on `now`'s date.
    pub fn already_notified_today(&self, task_id: i64, now: DateTime<Utc>) -> bool {
        self.last_notified.get(&task_id) == Some(&now.date_naive())
    }

    /// Record a successful delivery for `task_id`. Failed attempts are not
    /// recorded, so the next pass retries them.
    pub fn record_notified(&mut self, task_id: i64, now: DateTime<Utc>) {
        self.last_notified.insert(task_id, now.date_naive());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn sweep_runs_once_per_date_at_hour_zero() {
        let mut state = DispatchState::new();
        let first_tick = at(2024, 6, 1, 0, 5);
        let second_tick = at(2024, 6, 1, 0, 45);

        assert!(state.should_run_daily_sweep(first_tick));
        state.record_daily_sweep(first_tick);
        assert!(!state.should_run_daily_sweep(second_tick));
    }

    #[test]
    fn sweep_never_runs_outside_hour_zero() {
        let state = DispatchState::new();
        for hour in 1..24 {
            assert!(!state.should_run_daily_sweep(at(2024, 6, 1, hour, 0)));
        }
    }

    #[test]
    fn sweep_rearms_when_the_date_advances() {
        let mut state = DispatchState::new();
        state.record_daily_sweep(at(2024, 6, 1, 0, 5));
        assert!(!state.should_run_daily_sweep(at(2024, 6, 1, 0, 30)));
        assert!(state.should_run_daily_sweep(at(2024, 6, 2, 0, 5)));
    }

    #[test]
    fn fresh_state_permits_the_sweep_again() {
        // Equivalent of a process restart after the sweep already ran.
        let mut state = DispatchState::new();
        let tick = at(2024, 6, 1, 0, 5);
        state.record_daily_sweep(tick);

        let restarted = DispatchState::new();
        assert!(restarted.should_run_daily_sweep(tick));
    }

    #[test]
    fn notified_ledger_is_per_task_per_date() {
        let mut state = DispatchState::new();
        let morning = at(2024, 6, 1, 9, 0);
        let evening = at(2024, 6, 1, 21, 0);
        let tomorrow = at(2024, 6, 2, 9, 0);

        assert!(!state.already_notified_today(1, morning));
        state.record_notified(1, morning);

        assert!(state.already_notified_today(1, evening));
        assert!(!state.already_notified_today(2, evening));
        assert!(!state.already_notified_today(1, tomorrow));
    }
}
