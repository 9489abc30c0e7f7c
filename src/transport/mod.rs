//! Transports for sending emails
//!
//! The only transport currently provided is
//! [`Microsoft365Transport`][microsoft365::Microsoft365Transport], which
//! delivers messages through the Microsoft Graph API.

use crate::{address::Envelope, message::Message};

pub mod microsoft365;

/// Blocking Transport method for emails
pub trait Transport {
    /// Response produced by the Transport
    type Ok;
    /// Error produced by the Transport
    type Error;

    /// Sends the email using its own envelope
    fn send(&self, message: &Message) -> Result<Self::Ok, Self::Error> {
        self.send_with_envelope(message, message.envelope())
    }

    /// Sends the email using the given envelope
    ///
    /// Only envelope recipients are delivered to; the message's header
    /// lists determine which role (to/cc/bcc/reply-to) each envelope
    /// recipient is assigned.
    fn send_with_envelope(
        &self,
        message: &Message,
        envelope: &Envelope,
    ) -> Result<Self::Ok, Self::Error>;
}
