use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use crate::address::{Address, AddressError};

/// Represents an email address with an optional name for the sender/recipient.
///
/// # Examples
///
/// You can create a `Mailbox` from a name and an [`Address`]:
///
/// ```
/// # use microsoft365_transport::{Address, Mailbox};
/// # use std::error::Error;
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let address = Address::new("example", "email.com")?;
/// let mailbox = Mailbox::new(None, address);
/// # Ok(())
/// # }
/// ```
///
/// You can also create one from a string literal:
///
/// ```
/// # use microsoft365_transport::Mailbox;
/// # use std::error::Error;
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let mailbox: Mailbox = "John Smith <example@email.com>".parse()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialOrd, Ord, PartialEq, Eq, Hash)]
pub struct Mailbox {
    /// The name associated with the address.
    pub name: Option<String>,

    /// The email address itself.
    pub email: Address,
}

impl Mailbox {
    /// Creates a new `Mailbox` using an email address and the name of the
    /// recipient if there is one.
    pub fn new(name: Option<String>, email: Address) -> Self {
        Mailbox { name, email }
    }
}

impl Display for Mailbox {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match &self.name {
            Some(name) if !name.is_empty() => write!(f, "{} <{}>", name, self.email),
            _ => self.email.fmt(f),
        }
    }
}

impl FromStr for Mailbox {
    type Err = AddressError;

    fn from_str(src: &str) -> Result<Self, Self::Err> {
        let src = src.trim();
        match (src.find('<'), src.strip_suffix('>')) {
            (Some(open), Some(stripped)) => {
                let name = src[..open].trim().trim_matches('"');
                let email = stripped[open + 1..].trim().parse()?;
                let name = if name.is_empty() {
                    None
                } else {
                    Some(name.to_owned())
                };
                Ok(Mailbox::new(name, email))
            }
            (None, None) => Ok(Mailbox::new(None, src.parse()?)),
            _ => Err(AddressError::Unbalanced),
        }
    }
}

impl From<Address> for Mailbox {
    fn from(email: Address) -> Self {
        Mailbox::new(None, email)
    }
}
