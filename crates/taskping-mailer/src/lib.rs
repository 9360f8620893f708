//! `taskping-mailer` — reminder composition and SMTP delivery.
//!
//! [`message`] turns a task record into a plain-text reminder (markup in
//! the task body is stripped first); [`transport`] defines the delivery
//! seam and the STARTTLS SMTP implementation behind it.

pub mod error;
pub mod message;
pub mod transport;

pub use error::MailerError;
pub use message::{compose_reminder, html_to_text, ReminderEmail};
pub use transport::{MailTransport, SmtpMailer};
