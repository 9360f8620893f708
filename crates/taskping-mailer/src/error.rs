use thiserror::Error;

/// Errors that can occur while composing or delivering a reminder.
#[derive(Debug, Error)]
pub enum MailerError {
    /// The owner's address (or the configured sender) is not a valid mailbox.
    #[error("invalid address {address}: {reason}")]
    InvalidAddress { address: String, reason: String },

    /// The message could not be assembled.
    #[error("message build failed: {0}")]
    Build(#[from] lettre::error::Error),

    /// The SMTP session failed: connection, STARTTLS, authentication, or the
    /// relay rejected the send.
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// A delivery attempt exceeded its time budget.
    #[error("delivery timed out after {ms}ms")]
    Timeout { ms: u64 },
}
