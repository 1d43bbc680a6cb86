//! # unfurl_operation
//!
//! Ready-made operations for resource endpoints, built on top of [`unfurl`].
//!
//! - [`Show`] loads a resource, authorizes the caller and renders it, expanding the
//!   associations the client asked for.
//! - [`Destroy`] loads a resource, authorizes the caller and destroys it.
//!
//! Both return an [`Outcome`]: an HTTP status with an optional JSON body, which can be
//! turned into an [`http::Response`] via [`Outcome::into_response`].
//! The operations don't own any storage or authorization logic: they are plugged in
//! via the [`Finder`], [`Policy`] and [`Destroyable`] traits.
pub use config::OperationConfig;
pub use destroy::{Destroy, DestroyError, Destroyable};
pub use finder::Finder;
pub use outcome::{InvalidStatusError, Outcome};
pub use policy::{Action, Policy};
pub use show::Show;

mod config;
mod destroy;
mod finder;
mod outcome;
mod policy;
mod show;
