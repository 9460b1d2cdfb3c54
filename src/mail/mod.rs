//! Email notification of finished backups
//!
//! - `message`: subject/body composition and MIME layout
//! - `transport`: the `MailTransport` seam and the SMTP relay implementation
//! - `notifier`: precondition checks and console reporting around a send

mod message;
mod notifier;
mod transport;

pub use message::NotificationMessage;
pub use notifier::{Delivery, MailNotifier};
pub use transport::{MailTransport, SmtpRelay};
