use std::{
    error::Error as StdError,
    fmt::{self, Display, Formatter},
};

/// Error type for email content
#[derive(Debug)]
#[non_exhaustive]
pub enum Error {
    /// Missing recipients in envelope
    MissingTo,
}

impl Display for Error {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        fmt.write_str(match self {
            Error::MissingTo => "missing destination address, invalid envelope",
        })
    }
}

impl StdError for Error {}
