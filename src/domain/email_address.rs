use serde_with::{DeserializeFromStr, SerializeDisplay};

/// A syntactically valid email address.
///
/// Only addresses the service owns (the sender account and the admin inbox)
/// are parsed into this type. Submitted addresses are forwarded untouched.
#[derive(Clone, Debug, PartialEq, Eq, SerializeDisplay, DeserializeFromStr)]
pub struct EmailAddress(String);

#[derive(Debug, thiserror::Error)]
#[error("`{0}` is not a valid email address")]
pub struct ParseEmailAddressError(String);

impl std::str::FromStr for EmailAddress {
    type Err = ParseEmailAddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if validator::validate_email(s) {
            Ok(Self(s.to_string()))
        } else {
            Err(ParseEmailAddressError(s.to_string()))
        }
    }
}

impl std::fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
