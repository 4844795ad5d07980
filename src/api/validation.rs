//! Utilities to help with API request validation.

use std::str::FromStr;

use derive_more::derive::{AsRef, Deref, Display};
use idna::uts46::{self, Uts46};
use lettre::Address;
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use thiserror::Error;

/// A user's name.
pub type UserName = BoundedString<1, 64>;

/// A user's new password in plain text.
pub type NewUserPassword = BoundedString<8, 256>;

/// A user's password in plain text.
pub type UserPassword = BoundedString<0, 256>;

/// A campsite's name.
pub type CampsiteName = BoundedString<1, 128>;

/// A campsite's description.
pub type CampsiteDescription = BoundedString<0, 4096>;

/// A [`String`] newtype that guarantees its length is within a certain range.
#[derive(
    Deref,
    AsRef,
    Display,
    Deserialize,
    SerializeDisplay,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Debug,
)]
#[as_ref(forward)]
#[serde(try_from = "String")]
pub struct BoundedString<const MIN: usize, const MAX: usize>(String);

impl<const MIN: usize, const MAX: usize> BoundedString<MIN, MAX> {
    /// Consumes the [`BoundedString`], returning the wrapped [`String`].
    pub fn into_inner(self) -> String {
        self.0
    }
}

/// An error constructing a [`BoundedString`].
#[derive(Error, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum BoundedStringError<const MIN: usize, const MAX: usize> {
    /// The length was less than the [`BoundedString`]'s `MIN`.
    #[error("invalid length {0}, expected at least {MIN}")]
    TooShort(usize),

    /// The length was greater than the [`BoundedString`]'s `MAX`.
    #[error("invalid length {0}, expected at most {MAX}")]
    TooLong(usize),
}

impl<const MIN: usize, const MAX: usize> TryFrom<String> for BoundedString<MIN, MAX> {
    type Error = BoundedStringError<MIN, MAX>;

    fn try_from(string: String) -> Result<Self, Self::Error> {
        let length = string.chars().count();

        if length < MIN {
            Err(BoundedStringError::TooShort(length))
        } else if length > MAX {
            Err(BoundedStringError::TooLong(length))
        } else {
            Ok(Self(string))
        }
    }
}

/// A user-inputted email address. Ensures the address uses a domain name rather than an IP
/// address, and normalizes the domain name (for non-ASCII characters).
#[derive(
    Deref,
    AsRef,
    Display,
    DeserializeFromStr,
    Serialize,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Debug,
)]
#[as_ref(forward)]
pub struct UserEmail(Address);

impl UserEmail {
    /// The maximum length of a [`UserEmail`].
    ///
    /// As per RFC 3696 erratum 1690, the theoretical maximum is 254.
    pub const MAX_LENGTH: usize = 254;

    /// Gets a reference to the email address string.
    pub fn as_str(&self) -> &str {
        self.as_ref()
    }
}

/// An error constructing a [`UserEmail`].
#[derive(Error, Copy, Clone, Debug)]
#[non_exhaustive]
pub enum UserEmailError {
    /// The email address was invalid.
    #[error("invalid email address")]
    Invalid,

    /// The domain part was an IP address rather than a domain name.
    #[error("IP addresses not allowed in email address")]
    IpAddr,
}

impl FromStr for UserEmail {
    type Err = UserEmailError;

    fn from_str(str: &str) -> Result<Self, Self::Err> {
        if str.len() > Self::MAX_LENGTH {
            return Err(UserEmailError::Invalid);
        }

        let Some((user, domain)) = str.rsplit_once('@') else {
            return Err(UserEmailError::Invalid);
        };

        if domain.starts_with('[') {
            return Err(UserEmailError::IpAddr);
        }

        let (domain, domain_result) = Uts46::new().to_user_interface(
            domain.as_bytes(),
            uts46::AsciiDenyList::URL,
            uts46::Hyphens::Allow,
            |_, _, _| true,
        );

        if domain_result.is_err() {
            return Err(UserEmailError::Invalid);
        }

        let Ok(address) = Address::new(user, domain.to_lowercase()) else {
            return Err(UserEmailError::Invalid);
        };

        Ok(Self(address))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounded_string_length_checked_in_characters() {
        assert_eq!(
            CampsiteName::try_from(String::new()),
            Err(BoundedStringError::TooShort(0)),
        );
        assert_eq!(
            UserName::try_from("é".repeat(64)).map(BoundedString::into_inner),
            Ok("é".repeat(64)),
        );
        assert_eq!(
            UserName::try_from("a".repeat(65)),
            Err(BoundedStringError::TooLong(65)),
        );
    }

    #[test]
    fn bounded_string_deserialization_validates() {
        serde_json::from_str::<NewUserPassword>("\"short\"")
            .expect_err("password under 8 characters should be rejected");

        let name: CampsiteName = serde_json::from_str("\"Redux Woods\"")
            .expect("campsite name should be valid");
        assert_eq!(name.as_str(), "Redux Woods");
    }

    #[test]
    fn invalid_user_emails_rejected() {
        let invalid_emails = [
            "no-at-sign",
            "two@at@example.com",
            "has space@example.com",
            "user@example-.com",
            "user@[192.168.0.1]",
        ];

        for email in invalid_emails {
            email
                .parse::<UserEmail>()
                .expect_err("user email should be invalid");
        }
    }

    #[test]
    fn user_email_domain_normalized() -> anyhow::Result<()> {
        for email in ["camper@Example.COM", "camper@example.com"] {
            assert_eq!(email.parse::<UserEmail>()?.as_str(), "camper@example.com");
        }

        // The local part may be case-sensitive (RFC 5321 section 2.3.11), so it's left alone.
        assert_eq!("Camper@example.com".parse::<UserEmail>()?.as_str(), "Camper@example.com");

        Ok(())
    }
}
