//! Validated peer addresses.

use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Maximum length of a peer address, in bytes.
pub const MAX_ADDRESS_LEN: usize = 64;

/// An addressable peer in the network.
///
/// A `Peer` wraps a syntactically valid address string: non-empty, at most
/// [`MAX_ADDRESS_LEN`] bytes, drawn from ASCII alphanumerics plus
/// `+ - . _ : @`. The allowed set covers phone-number and host:port style
/// addresses while excluding the wire separator, backslashes, and
/// whitespace, so an address never needs escaping.
///
/// Peers are value types: structural equality, total order by address,
/// never mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Peer(String);

impl Peer {
    /// Parse an address string into a `Peer`.
    pub fn parse(address: &str) -> Result<Self> {
        if address.is_empty() {
            return Err(Error::EmptyAddress);
        }
        if address.len() > MAX_ADDRESS_LEN {
            return Err(Error::AddressTooLong {
                max: MAX_ADDRESS_LEN,
            });
        }
        if let Some(bad) = address
            .chars()
            .find(|c| !c.is_ascii_alphanumeric() && !matches!(c, '+' | '-' | '.' | '_' | ':' | '@'))
        {
            return Err(Error::ForbiddenCharacter(bad));
        }
        Ok(Self(address.to_string()))
    }

    /// The address as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Peer {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl std::fmt::Display for Peer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Peer {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
