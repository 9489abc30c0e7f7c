//! Error and result type for the Microsoft 365 transport

use std::{error::Error as StdError, fmt};

use crate::BoxError;

/// The Errors that may occur when sending an email through the Graph API
pub struct Error {
    inner: Box<Inner>,
}

struct Inner {
    kind: Kind,
    source: Option<BoxError>,
}

impl Error {
    pub(crate) fn new<E>(kind: Kind, source: Option<E>) -> Error
    where
        E: Into<BoxError>,
    {
        Error {
            inner: Box::new(Inner {
                kind,
                source: source.map(Into::into),
            }),
        }
    }

    /// Returns true if the configuration is incomplete
    pub fn is_configuration(&self) -> bool {
        matches!(self.inner.kind, Kind::Configuration)
    }

    /// Returns true if the connection URL scheme is not supported
    pub fn is_scheme(&self) -> bool {
        matches!(self.inner.kind, Kind::Scheme)
    }

    /// Returns true if the remote server could not be reached
    pub fn is_network(&self) -> bool {
        matches!(self.inner.kind, Kind::Network)
    }

    /// Returns true if the provider rejected the email with a structured error
    pub fn is_rejected(&self) -> bool {
        matches!(self.inner.kind, Kind::Rejected(_))
    }

    /// Returns true if the send sequence failed for any other reason
    pub fn is_send(&self) -> bool {
        matches!(self.inner.kind, Kind::Send(_))
    }

    /// Returns the numeric code carried by the error, if any
    ///
    /// For rejections this is the HTTP status of the provider's error
    /// response. Generic send failures carry `0` when no code applies.
    pub fn status(&self) -> Option<u16> {
        match self.inner.kind {
            Kind::Rejected(code) => code,
            Kind::Send(code) => Some(code),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub(crate) enum Kind {
    /// Required credential or option missing, detected before any network call
    Configuration,
    /// Unsupported connection URL scheme
    Scheme,
    /// Underlying network error talking to the provider
    Network,
    /// The provider returned a structured error payload for the request
    Rejected(Option<u16>),
    /// Any other failure during the send sequence
    Send(u16),
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut builder = f.debug_struct("microsoft365_transport::transport::microsoft365::Error");

        builder.field("kind", &self.inner.kind);

        if let Some(ref source) = self.inner.source {
            builder.field("source", source);
        }

        builder.finish()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.kind {
            Kind::Configuration => f.write_str("incomplete transport configuration")?,
            Kind::Scheme => f.write_str("unsupported connection URL scheme")?,
            Kind::Network => f.write_str("Could not reach the remote server")?,
            Kind::Rejected(Some(code)) => write!(f, "email rejected by the provider ({code})")?,
            Kind::Rejected(None) => f.write_str("email rejected by the provider")?,
            Kind::Send(0) => f.write_str("could not send the email")?,
            Kind::Send(code) => write!(f, "could not send the email ({code})")?,
        };

        if let Some(ref e) = self.inner.source {
            write!(f, ": {e}")?;
        }

        Ok(())
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.inner.source.as_ref().map(|e| {
            let r: &(dyn StdError + 'static) = &**e;
            r
        })
    }
}

pub(crate) fn configuration<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::Configuration, Some(e))
}

pub(crate) fn scheme<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::Scheme, Some(e))
}

pub(crate) fn network<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::Network, Some(e))
}

pub(crate) fn rejected<E: Into<BoxError>>(code: Option<u16>, e: E) -> Error {
    Error::new(Kind::Rejected(code), Some(e))
}

pub(crate) fn send<E: Into<BoxError>>(code: u16, e: E) -> Error {
    Error::new(Kind::Send(code), Some(e))
}

#[cfg(test)]
mod test {
    use super::{network, rejected, send};

    #[test]
    fn network_error_names_the_remote_server() {
        let error = network("connection refused");
        assert!(error.is_network());
        assert_eq!(
            error.to_string(),
            "Could not reach the remote server: connection refused"
        );
    }

    #[test]
    fn send_failure_names_a_nonzero_code() {
        assert_eq!(
            send(502, "Bad Gateway").to_string(),
            "could not send the email (502): Bad Gateway"
        );
        // 0 means no code applied and stays out of the message
        assert_eq!(
            send(0, "no upload URL").to_string(),
            "could not send the email: no upload URL"
        );
    }

    #[test]
    fn status_codes() {
        assert_eq!(rejected(Some(400), "bad request").status(), Some(400));
        assert_eq!(rejected(None, "no code").status(), None);
        assert_eq!(send(0, "whatever").status(), Some(0));
    }
}
