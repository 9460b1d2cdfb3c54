//! Notification message composition
//!
//! A notification has a plain-text body and, optionally, an HTML alternative
//! and a file attachment. The MIME layout is:
//!
//! - text only: `multipart/mixed` with one text part
//! - text + HTML: `multipart/alternative`
//! - with an attachment: `multipart/mixed` wrapping the above plus a base64
//!   `application/octet-stream` part named by the file's base name

use std::fs;
use std::path::{Path, PathBuf};

use lettre::message::header::{ContentTransferEncoding, ContentType};
use lettre::message::{Attachment, Body, Mailbox, MultiPart, SinglePart};
use lettre::Message;

use crate::error::{BackupError, BackupResult};
use crate::models::RunTimestamp;

/// A notification ready to be addressed and sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationMessage {
    pub subject: String,
    pub text_body: String,
    pub html_body: Option<String>,
    pub attachment: Option<PathBuf>,
}

impl NotificationMessage {
    pub fn new(subject: impl Into<String>, text_body: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            text_body: text_body.into(),
            html_body: None,
            attachment: None,
        }
    }

    pub fn with_html(mut self, html_body: impl Into<String>) -> Self {
        self.html_body = Some(html_body.into());
        self
    }

    pub fn with_attachment(mut self, path: impl Into<PathBuf>) -> Self {
        self.attachment = Some(path.into());
        self
    }

    /// Build the success notification for a finished backup
    ///
    /// Both bodies mention the attachment only when `attached` is set; the
    /// caller decides whether the file is actually attached.
    pub fn for_backup(
        database: &str,
        stamp: &RunTimestamp,
        archive_path: &Path,
        attached: bool,
    ) -> Self {
        let when = stamp.human();
        let location = archive_path.display().to_string();

        let text_attachment = if attached {
            "\n\nThe backup is also attached to this email."
        } else {
            ""
        };
        let text = format!(
            "Hello,\n\n\
             The backup of the database '{database}' on {when} ran successfully.\n\n\
             The archive is stored on the server at:\n {location}{text_attachment}\n\n\
             -- \nbackupr"
        );

        let html_attachment = if attached {
            "<p>The backup is also attached to this email.</p>\n"
        } else {
            ""
        };
        let html = format!(
            "<p>Hello,</p>\n\
             <p>The backup of the database '<em>{database}</em>' on <strong>{when}</strong> ran successfully.</p>\n\
             <p>The archive is stored on the server at:<br />\n<em>{location}</em></p>\n\
             {html_attachment}\
             <p>-- <br />backupr</p>\n",
            database = escape_html(database),
            location = escape_html(&location),
        );

        Self::new(format!("Backup of \"{}\" successfully run!", database), text).with_html(html)
    }

    /// Address the message and lay out its MIME parts
    ///
    /// The attachment, if any, is read fully into memory here.
    pub fn to_email(&self, from: &str, to: &str) -> BackupResult<Message> {
        let from = parse_mailbox(from)?;
        let to = parse_mailbox(to)?;

        let body = match &self.html_body {
            Some(html) => MultiPart::alternative_plain_html(self.text_body.clone(), html.clone()),
            None => MultiPart::mixed().singlepart(SinglePart::plain(self.text_body.clone())),
        };

        let body = match &self.attachment {
            Some(path) => {
                let part = attachment_part(path)?;
                if self.html_body.is_some() {
                    MultiPart::mixed().multipart(body).singlepart(part)
                } else {
                    body.singlepart(part)
                }
            }
            None => body,
        };

        Message::builder()
            .from(from)
            .to(to)
            .subject(self.subject.clone())
            .multipart(body)
            .map_err(|e| BackupError::Mail(format!("Failed to build message: {}", e)))
    }
}

fn parse_mailbox(address: &str) -> BackupResult<Mailbox> {
    address
        .parse()
        .map_err(|e| BackupError::Mail(format!("Invalid address '{}': {}", address, e)))
}

fn attachment_part(path: &Path) -> BackupResult<SinglePart> {
    let contents = fs::read(path).map_err(|e| {
        BackupError::Mail(format!("Failed to read attachment {}: {}", path.display(), e))
    })?;

    let filename = path
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .ok_or_else(|| BackupError::Mail(format!("Attachment has no file name: {}", path.display())))?;

    let body = Body::new_with_encoding(contents, ContentTransferEncoding::Base64)
        .map_err(|_| BackupError::Mail("Failed to encode attachment".into()))?;
    let content_type = ContentType::parse("application/octet-stream")
        .map_err(|e| BackupError::Mail(e.to_string()))?;

    Ok(Attachment::new(filename).body(body, content_type))
}

fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
