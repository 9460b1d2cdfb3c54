//! Mail notifier
//!
//! Checks the sender account, composes the message and hands it to the
//! transport. A missing sender address or secret is reported on the console
//! and nothing is sent.

use std::io::Write;

use super::message::NotificationMessage;
use super::transport::MailTransport;
use crate::display::ConsoleReporter;
use crate::error::BackupResult;
use crate::models::MailCredentials;

/// What happened to a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Sent,
    /// Sender address or secret was empty; nothing was sent
    MissingCredentials,
}

pub struct MailNotifier<T: MailTransport> {
    transport: T,
}

impl<T: MailTransport> MailNotifier<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send `message` to a single recipient
    ///
    /// Transport failures are returned to the caller; there is no retry.
    pub fn send<W: Write>(
        &mut self,
        reporter: &mut ConsoleReporter<W>,
        credentials: &MailCredentials,
        recipient: &str,
        message: &NotificationMessage,
    ) -> BackupResult<Delivery> {
        if credentials.address.trim().is_empty() || credentials.secret.is_empty() {
            reporter.warning("A sender address and secret are required to send an email.");
            return Ok(Delivery::MissingCredentials);
        }

        let email = message.to_email(&credentials.address, recipient)?;
        self.transport.send(credentials, &email)?;

        reporter.blank();
        reporter.success("Message sent!");
        reporter.success(&format!("    To: {}", recipient));
        reporter.success(&format!("    Subject: {}", message.subject));

        Ok(Delivery::Sent)
    }
}
