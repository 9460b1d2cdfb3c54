//! Mail relay delivery
//!
//! `SmtpRelay` drives the SMTP session step by step: connect and EHLO,
//! STARTTLS, EHLO again, authenticate, send. The session is then dropped
//! without QUIT. Some relays fail the QUIT exchange after a successful send,
//! so the connection is always closed with `abort()`.

use lettre::transport::smtp::authentication::{Credentials, Mechanism};
use lettre::transport::smtp::client::{SmtpConnection, TlsParameters};
use lettre::transport::smtp::extension::ClientId;
use lettre::Message;

use crate::config::RelaySettings;
use crate::error::{BackupError, BackupResult};
use crate::models::MailCredentials;

/// Delivers a composed message
pub trait MailTransport {
    fn send(&mut self, credentials: &MailCredentials, message: &Message) -> BackupResult<()>;
}

/// Authenticated STARTTLS submission to a fixed relay
#[derive(Debug, Clone)]
pub struct SmtpRelay {
    settings: RelaySettings,
}

impl SmtpRelay {
    pub fn new(settings: RelaySettings) -> Self {
        Self { settings }
    }

    fn transmit(
        &self,
        connection: &mut SmtpConnection,
        hello: &ClientId,
        credentials: &MailCredentials,
        message: &Message,
    ) -> BackupResult<()> {
        if !connection.can_starttls() {
            return Err(BackupError::Transport(format!(
                "{} does not offer STARTTLS",
                self.settings.host
            )));
        }

        let tls = TlsParameters::new(self.settings.host.clone())
            .map_err(|e| transport_error("TLS setup failed", e))?;
        connection
            .starttls(&tls, hello)
            .map_err(|e| transport_error("STARTTLS failed", e))?;

        let login = Credentials::new(credentials.address.clone(), credentials.secret.to_string());
        connection
            .auth(&[Mechanism::Plain, Mechanism::Login], &login)
            .map_err(|e| transport_error("Authentication failed", e))?;

        connection
            .send(message.envelope(), &message.formatted())
            .map_err(|e| transport_error("Sending failed", e))?;

        Ok(())
    }
}

impl MailTransport for SmtpRelay {
    fn send(&mut self, credentials: &MailCredentials, message: &Message) -> BackupResult<()> {
        let hello = ClientId::Domain(self.settings.hello_name.clone());
        let server = (self.settings.host.as_str(), self.settings.port);

        // No timeout: a relay that never answers blocks the job
        let mut connection = SmtpConnection::connect(server, None, &hello, None, None)
            .map_err(|e| transport_error("Connection failed", e))?;

        let result = self.transmit(&mut connection, &hello, credentials, message);
        connection.abort();
        result
    }
}

fn transport_error(step: &str, err: lettre::transport::smtp::Error) -> BackupError {
    BackupError::Transport(format!("{}: {}", step, err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;

    #[test]
    fn test_connection_refused_is_transport_error() {
        // Bind then drop to get a port with nothing listening
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };

        let mut relay = SmtpRelay::new(RelaySettings {
            host: "127.0.0.1".into(),
            port,
            hello_name: "localhost".into(),
        });
        let message = crate::mail::NotificationMessage::new("Subject", "body")
            .to_email("robot@example.com", "ops@example.com")
            .unwrap();

        let err = relay
            .send(&MailCredentials::new("robot@example.com", "secret"), &message)
            .unwrap_err();

        assert!(err.is_transport());
    }
}
