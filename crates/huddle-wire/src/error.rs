//! Error types for huddle-wire.

use thiserror::Error;

/// Result type for huddle-wire operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while decoding a payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The payload is empty or starts with a separator, so there is no code.
    #[error("payload carries no request code")]
    MissingCode,

    /// The first field is not a known request code.
    #[error("unknown request code {0:?}")]
    UnknownCode(String),

    /// The last field ends in an unescaped backslash. Such a payload cannot
    /// have been produced by a conforming encoder and is structurally
    /// ambiguous, so it is rejected wholesale.
    #[error("last field ends in an unescaped backslash")]
    TrailingBackslash,
}
