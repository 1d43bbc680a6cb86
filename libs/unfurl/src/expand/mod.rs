//! Parse, validate and navigate the association paths requested by a client.
//!
//! The raw `expand` parameter goes through [`validate`], which enforces the grammar
//! and returns a normalized [`ExpandPaths`] set.
//! [`ExpansionError`]s, instead, are only discovered while walking the object graph.
pub use errors::{ExpansionError, ExpansionErrors, ValidationError, ValidationErrorKind};
pub use paths::{Branch, ExpandPath, ExpandPaths, Level};
pub use validate::{raw_expand_from_query, validate};

pub(crate) use validate::is_identifier;

mod errors;
mod paths;
mod validate;
