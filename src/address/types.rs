//! Representation of an email address

use std::{
    error::Error,
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use email_address::EmailAddress;

/// Represents an email address with a user and a domain name.
///
/// This type contains email in canonical form (_user@domain.tld_).
///
/// # Examples
///
/// You can create an `Address` from a user and a domain:
///
/// ```
/// use microsoft365_transport::Address;
///
/// # use std::error::Error;
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let address = Address::new("user", "email.com")?;
/// assert_eq!(address.user(), "user");
/// assert_eq!(address.domain(), "email.com");
/// # Ok(())
/// # }
/// ```
///
/// You can also create an `Address` from a string literal by parsing it:
///
/// ```
/// use microsoft365_transport::Address;
///
/// # use std::error::Error;
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let address = "user@email.com".parse::<Address>()?;
/// assert_eq!(address.user(), "user");
/// assert_eq!(address.domain(), "email.com");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialOrd, Ord, PartialEq, Eq, Hash)]
pub struct Address {
    /// Complete address
    serialized: String,
    /// Index into `serialized` before the '@'
    at_start: usize,
}

impl Address {
    /// Creates a new email address from a user and domain.
    pub fn new<U: AsRef<str>, D: AsRef<str>>(user: U, domain: D) -> Result<Self, AddressError> {
        let user = user.as_ref();
        let domain = domain.as_ref();

        Self::check_user(user)?;
        Self::check_domain(domain)?;

        let serialized = format!("{user}@{domain}");
        Ok(Address {
            at_start: user.len(),
            serialized,
        })
    }

    /// Gets the user portion of the `Address`.
    pub fn user(&self) -> &str {
        &self.serialized[..self.at_start]
    }

    /// Gets the domain portion of the `Address`.
    pub fn domain(&self) -> &str {
        &self.serialized[self.at_start + 1..]
    }

    fn check_user(user: &str) -> Result<(), AddressError> {
        if EmailAddress::is_valid_local_part(user) {
            Ok(())
        } else {
            Err(AddressError::InvalidUser)
        }
    }

    fn check_domain(domain: &str) -> Result<(), AddressError> {
        if EmailAddress::is_valid_domain(domain) {
            Ok(())
        } else {
            Err(AddressError::InvalidDomain)
        }
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(val: &str) -> Result<Self, AddressError> {
        let at_start = val.rfind('@').ok_or(AddressError::MissingParts)?;
        let user = &val[..at_start];
        let domain = &val[at_start + 1..];

        Self::check_user(user)?;
        Self::check_domain(domain)?;

        Ok(Address {
            serialized: val.into(),
            at_start,
        })
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.serialized)
    }
}

impl AsRef<str> for Address {
    fn as_ref(&self) -> &str {
        &self.serialized
    }
}

/// Errors in email addresses parsing
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AddressError {
    /// Missing domain or user
    MissingParts,
    /// Unbalanced angle bracket
    Unbalanced,
    /// Invalid email user
    InvalidUser,
    /// Invalid email domain
    InvalidDomain,
}

impl Error for AddressError {}

impl Display for AddressError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            AddressError::MissingParts => f.write_str("Missing domain or user"),
            AddressError::Unbalanced => f.write_str("Unbalanced angle bracket"),
            AddressError::InvalidUser => f.write_str("Invalid email user"),
            AddressError::InvalidDomain => f.write_str("Invalid email domain"),
        }
    }
}

#[cfg(test)]
mod test {
    use std::str::FromStr;

    use pretty_assertions::assert_eq;

    use super::{Address, AddressError};

    #[test]
    fn parse_address() {
        let address = Address::from_str("user@domain.tld").unwrap();
        assert_eq!(address.user(), "user");
        assert_eq!(address.domain(), "domain.tld");
        assert_eq!(address.to_string(), "user@domain.tld");
    }

    #[test]
    fn parse_address_missing_at() {
        assert_eq!(
            Address::from_str("userdomain.tld").unwrap_err(),
            AddressError::MissingParts
        );
    }

    #[test]
    fn parse_address_empty_user() {
        assert_eq!(
            Address::from_str("@domain.tld").unwrap_err(),
            AddressError::InvalidUser
        );
    }
}
