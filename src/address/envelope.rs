use crate::{message::Mailbox, Error};

/// Simple email envelope representation
///
/// Carries the authoritative sender and recipient list used for actual
/// delivery, independently from the mailboxes appearing in the message
/// headers. Envelope entries may omit display names.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct Envelope {
    /// The envelope recipients
    ///
    /// This can not be empty.
    forward_path: Vec<Mailbox>,
    /// The envelope sender
    reverse_path: Option<Mailbox>,
}

impl Envelope {
    /// Creates a new envelope, which may fail if `to` is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use microsoft365_transport::{Envelope, Mailbox};
    ///
    /// # use std::error::Error;
    /// # fn main() -> Result<(), Box<dyn Error>> {
    /// let sender: Mailbox = "from@email.com".parse()?;
    /// let recipients = vec!["to@email.com".parse()?];
    ///
    /// let envelope = Envelope::new(Some(sender), recipients)?;
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// If `to` has no elements in it.
    pub fn new(from: Option<Mailbox>, to: Vec<Mailbox>) -> Result<Envelope, Error> {
        if to.is_empty() {
            return Err(Error::MissingTo);
        }
        Ok(Envelope {
            forward_path: to,
            reverse_path: from,
        })
    }

    /// Gets the destination mailboxes of the envelope.
    pub fn to(&self) -> &[Mailbox] {
        self.forward_path.as_slice()
    }

    /// Gets the sender of the envelope.
    pub fn from(&self) -> Option<&Mailbox> {
        self.reverse_path.as_ref()
    }
}
