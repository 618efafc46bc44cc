//! Error types for huddle-state.

use thiserror::Error;

/// Result type for huddle-state operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Reasons a string is not a syntactically valid peer address.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The address is the empty string.
    #[error("peer address is empty")]
    EmptyAddress,

    /// The address exceeds [`MAX_ADDRESS_LEN`](crate::MAX_ADDRESS_LEN) bytes.
    #[error("peer address is longer than {max} bytes")]
    AddressTooLong { max: usize },

    /// The address contains a character outside the allowed set.
    #[error("peer address contains forbidden character {0:?}")]
    ForbiddenCharacter(char),
}
