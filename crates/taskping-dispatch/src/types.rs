use chrono::NaiveDate;
use taskping_core::types::TaskRecord;
use taskping_mailer::MailerError;

/// A task whose due date has arrived, paired with the parsed date so the
/// notifier can format it without re-parsing.
#[derive(Debug, Clone)]
pub struct DueTask {
    pub task: TaskRecord,
    pub due: NaiveDate,
}

/// A record whose due date could not be parsed. Excluded from the due set
/// for the pass and surfaced as a warning — never treated as due.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataError {
    pub task_id: i64,
    pub raw: String,
}

impl std::fmt::Display for DataError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "task {} has unparseable due date {:?}",
            self.task_id, self.raw
        )
    }
}

/// One failed delivery attempt. The pass continues past it, and the task
/// stays out of the notified ledger so the next tick retries.
#[derive(Debug)]
pub struct DeliveryFailure {
    pub task_id: i64,
    pub to: String,
    pub error: MailerError,
}

/// Outcome of one evaluate-and-notify pass.
#[derive(Debug, Default)]
pub struct PassReport {
    /// Records inspected by the evaluator.
    pub evaluated: usize,
    /// Reminders handed to the transport successfully.
    pub sent: usize,
    /// Due tasks skipped because they were already notified today.
    pub skipped: usize,
    pub data_errors: Vec<DataError>,
    pub failures: Vec<DeliveryFailure>,
}

impl PassReport {
    /// Fold a sweep's report into the tick's.
    pub fn absorb(&mut self, other: PassReport) {
        self.evaluated += other.evaluated;
        self.sent += other.sent;
        self.skipped += other.skipped;
        self.data_errors.extend(other.data_errors);
        self.failures.extend(other.failures);
    }
}
