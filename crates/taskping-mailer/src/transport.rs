//! The outbound delivery seam and its SMTP implementation.

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use taskping_core::config::MailConfig;
use tracing::debug;

use crate::error::MailerError;
use crate::message::ReminderEmail;

/// Common interface for reminder delivery.
///
/// The dispatch engine only sees this trait, so tests substitute an
/// in-memory transport and the SMTP stack stays swappable. Implementations
/// must be `Send + Sync`; `send` takes `&self` so a connected transport can
/// deliver concurrently without a mutable borrow.
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Deliver a single reminder. One attempt — the caller decides whether
    /// a failure is retried on a later pass.
    async fn send(&self, email: &ReminderEmail) -> Result<(), MailerError>;
}

/// STARTTLS SMTP relay client with a fixed credential pair.
#[derive(Debug)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    /// Build the relay client from config.
    ///
    /// Fails on a malformed sender address so the daemon refuses to start
    /// with a config it cannot send from. No connection is made here; the
    /// session is established per delivery.
    pub fn new(cfg: &MailConfig) -> Result<Self, MailerError> {
        let from: Mailbox = cfg.from.parse().map_err(|e: lettre::address::AddressError| {
            MailerError::InvalidAddress {
                address: cfg.from.clone(),
                reason: e.to_string(),
            }
        })?;
        let creds = Credentials::new(cfg.from.clone(), cfg.password.clone());
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&cfg.host)?
            .port(cfg.port)
            .credentials(creds)
            .build();
        Ok(Self { transport, from })
    }
}

#[async_trait]
impl MailTransport for SmtpMailer {
    async fn send(&self, email: &ReminderEmail) -> Result<(), MailerError> {
        let to: Mailbox = email.to.parse().map_err(|e: lettre::address::AddressError| {
            MailerError::InvalidAddress {
                address: email.to.clone(),
                reason: e.to_string(),
            }
        })?;
        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(email.subject.clone())
            .header(ContentType::TEXT_PLAIN)
            .body(email.body.clone())?;

        self.transport.send(message).await?;
        debug!(to = %email.to, "reminder delivered");
        Ok(())
    }
}
