//! The outgoing mail seam.
//!
//! The real SMTP transport is an external collaborator; the application only
//! depends on the [Mailer] trait. [TracingMailer] is the built-in stand-in
//! that logs deliveries instead of sending them.

use crate::Error;

/// An email with a single attached document.
#[derive(Debug, Clone, PartialEq)]
pub struct EmailMessage {
    /// The recipient's address.
    pub to: String,
    /// The subject line.
    pub subject: String,
    /// The plain-text body.
    pub body: String,
    /// The file name of the attachment.
    pub attachment_name: String,
    /// The MIME type of the attachment.
    pub attachment_type: &'static str,
    /// The attachment itself.
    pub attachment: Vec<u8>,
}

/// Delivers report emails.
pub trait Mailer: Send + Sync {
    /// Deliver `message`.
    ///
    /// # Errors
    ///
    /// Returns [Error::MailDelivery] if the transport rejected the message.
    fn send(&self, message: EmailMessage) -> Result<(), Error>;
}

/// A stand-in transport that logs deliveries instead of sending them.
#[derive(Debug, Default, Clone)]
pub struct TracingMailer;

impl Mailer for TracingMailer {
    fn send(&self, message: EmailMessage) -> Result<(), Error> {
        tracing::info!(
            to = %message.to,
            subject = %message.subject,
            attachment = %message.attachment_name,
            attachment_bytes = message.attachment.len(),
            "delivered email to the log transport"
        );

        Ok(())
    }
}
