//! # unfurl
//!
//! Serialize an object graph for an API response, expanding nested associations
//! only when the client asks for them.
//!
//! A [`Decorator`] describes how a resource is rendered: the scalar properties that are
//! always emitted and the associations ([`Reflection`]s) that are emitted only when
//! requested. Clients request associations with a list of dotted paths, usually via an
//! `expand` query parameter:
//!
//! ```text
//! GET /articles/1?expand[]=user&expand[]=user.role
//! ```
//!
//! # Example
//!
//! ```rust
//! use serde_json::json;
//! use unfurl::{Decorator, ExpandConfig, ReflectionOptions, decorate};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let role = Decorator::builder("Role").property("name").build()?;
//! let user = Decorator::builder("User")
//!     .property("full_name")
//!     .belongs_to("role", ReflectionOptions::new().decorator(role))
//!     .build()?;
//! let article = Decorator::builder("Article")
//!     .property("title")
//!     .belongs_to("user", ReflectionOptions::new().decorator(user))
//!     .build()?;
//!
//! let model = json!({
//!     "title": "My Beautiful Article",
//!     "user": { "id": 1, "full_name": "John Doe", "role": { "name": "Editor" } }
//! });
//! let expand = json!(["user", "user.role"]);
//!
//! let output = decorate(&model, &article, Some(&expand), &ExpandConfig::default())?;
//! assert_eq!(
//!     serde_json::Value::Object(output),
//!     json!({
//!         "title": "My Beautiful Article",
//!         "user": { "full_name": "John Doe", "role": { "name": "Editor" } }
//!     })
//! );
//! # Ok(())
//! # }
//! ```
//!
//! # Errors
//!
//! Decoration fails in three distinct ways, so that callers can pick the right response:
//!
//! - the `expand` parameter is malformed ([`ValidationError`], `422 Unprocessable Entity`);
//! - one or more requested paths don't match the declared associations
//!   ([`ExpansionErrors`], `400 Bad Request`);
//! - a getter on a domain object failed ([`PropertyError`], `500 Internal Server Error`).
//!
//! Mistakes in the declaration of a decorator are reported when it's built,
//! as a [`ConfigurationError`].
pub mod body;
pub mod config;
mod decorate;
mod decorator;
pub mod expand;
mod includer;
mod reflection;
mod resource;

pub use config::ExpandConfig;
pub use decorate::{DecorateError, decorate, decorate_paths};
pub use decorator::{Decorator, DecoratorBuilder, DecoratorInstance, Property};
pub use expand::{
    ExpandPath, ExpandPaths, ExpansionError, ExpansionErrors, ValidationError,
    ValidationErrorKind, raw_expand_from_query, validate,
};
pub use reflection::{
    AssociationKind, ConfigurationError, DecoratorResolver, ExecContext, InvalidExecContext,
    Reflection, ReflectionOptions,
};
pub use resource::{Associated, Item, PropertyError, Resource};
