//! Huddle Wire - payload codec and request codes.
//!
//! Every Huddle message is a short text payload: a two-character request code
//! followed by zero or more fields, all joined with the reserved separator
//! [`FIELD_SEPARATOR`]. A literal separator inside a field is escaped with a
//! backslash.
//!
//! # Example
//!
//! ```
//! use huddle_wire::{codec, RequestKind};
//!
//! let payload = codec::encode(RequestKind::AddResource, &["price¤list", "42"]);
//! assert_eq!(payload, "AR¤price\\¤list¤42");
//!
//! let decoded = codec::decode(&payload).unwrap();
//! assert_eq!(decoded.kind, RequestKind::AddResource);
//! assert_eq!(decoded.fields, vec!["price¤list", "42"]);
//! ```

pub mod codec;
pub mod error;
pub mod request;

pub use codec::{decode, encode, is_wire_safe, Decoded, ESCAPE, FIELD_SEPARATOR};
pub use error::{Error, Result};
pub use request::RequestKind;
