//! `taskping-dispatch` — interval-driven due-date reminder dispatcher.
//!
//! # Overview
//!
//! The [`engine::DispatchEngine`] wakes on a fixed interval, reads the full
//! task collection, filters the records whose due date has arrived
//! ([`evaluate::due_tasks`]), and delivers at most one reminder per task per
//! calendar day through the configured
//! [`MailTransport`](taskping_mailer::MailTransport).
//!
//! # Pass anatomy
//!
//! | Step        | Behaviour                                                |
//! |-------------|----------------------------------------------------------|
//! | Evaluate    | `due_date` at start of day UTC `<= now` → due            |
//! | Deliver     | skip tasks already notified today; one attempt each      |
//! | Daily sweep | first tick of a new day re-reads and re-runs the pass    |
//!
//! Per-task failures are collected into the [`types::PassReport`], never
//! raised — one unreachable mailbox cannot starve the rest of a pass.

pub mod engine;
pub mod error;
pub mod evaluate;
pub mod state;
pub mod types;

pub use engine::{start, DispatchEngine, DispatcherHandle};
pub use error::{DispatchError, Result};
pub use evaluate::due_tasks;
pub use state::DispatchState;
pub use types::{DataError, DeliveryFailure, DueTask, PassReport};
