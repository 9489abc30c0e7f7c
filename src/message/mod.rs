//! Provides a generic email representation
//!
//! A [`Message`] is the provider-independent view of an email: subject,
//! HTML body, header mailboxes and attachments. It is assembled with a
//! [`MessageBuilder`] and immutable afterwards.

mod attachment;
mod mailbox;

pub use self::{attachment::Attachment, mailbox::Mailbox};
use crate::{address::Envelope, Error};

/// Represents an email message
#[derive(Clone, Debug)]
pub struct Message {
    subject: String,
    html_body: String,
    from: Option<Mailbox>,
    to: Vec<Mailbox>,
    cc: Vec<Mailbox>,
    bcc: Vec<Mailbox>,
    reply_to: Vec<Mailbox>,
    attachments: Vec<Attachment>,
    envelope: Envelope,
}

impl Message {
    /// Create a new message builder without headers
    pub fn builder() -> MessageBuilder {
        MessageBuilder::new()
    }

    /// Gets the subject
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Gets the HTML body
    pub fn html_body(&self) -> &str {
        &self.html_body
    }

    /// Gets the `From` mailbox
    pub fn from(&self) -> Option<&Mailbox> {
        self.from.as_ref()
    }

    /// Gets the `To` mailboxes
    pub fn to(&self) -> &[Mailbox] {
        &self.to
    }

    /// Gets the `Cc` mailboxes
    pub fn cc(&self) -> &[Mailbox] {
        &self.cc
    }

    /// Gets the `Bcc` mailboxes
    pub fn bcc(&self) -> &[Mailbox] {
        &self.bcc
    }

    /// Gets the `Reply-To` mailboxes
    pub fn reply_to(&self) -> &[Mailbox] {
        &self.reply_to
    }

    /// Gets the attachments, in the order they were added
    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    /// Gets the envelope used for delivery
    pub fn envelope(&self) -> &Envelope {
        &self.envelope
    }
}

/// Builder for [`Message`]
#[derive(Clone, Debug, Default)]
pub struct MessageBuilder {
    subject: Option<String>,
    from: Option<Mailbox>,
    to: Vec<Mailbox>,
    cc: Vec<Mailbox>,
    bcc: Vec<Mailbox>,
    reply_to: Vec<Mailbox>,
    attachments: Vec<Attachment>,
    envelope: Option<Envelope>,
}

impl MessageBuilder {
    /// Creates a new default message builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the subject
    pub fn subject<S: Into<String>>(mut self, subject: S) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Set the sender mailbox
    pub fn from(mut self, mbox: Mailbox) -> Self {
        self.from = Some(mbox);
        self
    }

    /// Add a `To` recipient
    pub fn to(mut self, mbox: Mailbox) -> Self {
        self.to.push(mbox);
        self
    }

    /// Add a `Cc` recipient
    pub fn cc(mut self, mbox: Mailbox) -> Self {
        self.cc.push(mbox);
        self
    }

    /// Add a `Bcc` recipient
    pub fn bcc(mut self, mbox: Mailbox) -> Self {
        self.bcc.push(mbox);
        self
    }

    /// Add a `Reply-To` mailbox
    pub fn reply_to(mut self, mbox: Mailbox) -> Self {
        self.reply_to.push(mbox);
        self
    }

    /// Add an attachment
    pub fn attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    /// Use a custom envelope instead of the one derived from the headers
    ///
    /// The envelope is authoritative for delivery: only envelope
    /// recipients receive the email, and each of them is assigned its
    /// role by matching it against the `To`/`Cc`/`Bcc`/`Reply-To` header
    /// lists.
    pub fn envelope(mut self, envelope: Envelope) -> Self {
        self.envelope = Some(envelope);
        self
    }

    /// Set the HTML body and build the message
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingTo`] when no envelope was provided and no
    /// recipient header is set.
    pub fn html_body<S: Into<String>>(self, body: S) -> Result<Message, Error> {
        let envelope = match self.envelope {
            Some(envelope) => envelope,
            None => {
                let mut recipients = self.to.clone();
                recipients.extend_from_slice(&self.cc);
                recipients.extend_from_slice(&self.bcc);
                Envelope::new(self.from.clone(), recipients)?
            }
        };

        Ok(Message {
            subject: self.subject.unwrap_or_default(),
            html_body: body.into(),
            from: self.from,
            to: self.to,
            cc: self.cc,
            bcc: self.bcc,
            reply_to: self.reply_to,
            attachments: self.attachments,
            envelope,
        })
    }
}
