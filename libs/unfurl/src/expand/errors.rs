//! Errors that can happen when processing the `expand` parameter.
use std::fmt;

use http::StatusCode;
use serde_json::{Value, json};
use indexmap::IndexSet;

use crate::body::error_body;

/// The `expand` parameter is malformed.
///
/// It's returned by [`validate`](super::validate), before any object is touched.
/// The client should get back a `422 Unprocessable Entity`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ValidationError {
    #[error("The `expand` parameter must be an array of strings, but it is {found}")]
    NotAnArray { found: &'static str },
    #[error("Element {index} of the `expand` parameter is not a valid association path: {value}")]
    MalformedPath {
        index: usize,
        /// The offending element, as JSON.
        value: String,
    },
    #[error("The `expand` parameter accepts at most {limit} paths, but {actual} were provided")]
    TooManyPaths { limit: usize, actual: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
/// The kind of a [`ValidationError`], without its details.
pub enum ValidationErrorKind {
    NotAnArray,
    MalformedPath,
    TooManyPaths,
}

impl ValidationErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationErrorKind::NotAnArray => "not_an_array",
            ValidationErrorKind::MalformedPath => "malformed_path",
            ValidationErrorKind::TooManyPaths => "too_many_paths",
        }
    }
}

impl fmt::Display for ValidationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ValidationError {
    pub fn kind(&self) -> ValidationErrorKind {
        match self {
            ValidationError::NotAnArray { .. } => ValidationErrorKind::NotAnArray,
            ValidationError::MalformedPath { .. } => ValidationErrorKind::MalformedPath,
            ValidationError::TooManyPaths { .. } => ValidationErrorKind::TooManyPaths,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        StatusCode::UNPROCESSABLE_ENTITY
    }

    pub fn error_type(&self) -> &'static str {
        "unprocessable_entity"
    }

    /// The JSON body of the error response.
    ///
    /// `meta.errors` maps the parameter name to its error messages.
    pub fn to_body(&self) -> Value {
        error_body(
            self.error_type(),
            "The request parameters are invalid",
            json!({
                "kind": self.kind().as_str(),
                "errors": { "expand": [self.to_string()] },
            }),
        )
    }
}

/// A requested path can't be honored by the decorator it was resolved against.
#[derive(Debug, Clone, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum ExpansionError {
    /// The last segment of `path` isn't an association declared on the decorator.
    #[error("`{path}` is not an association that can be expanded")]
    UnknownAssociation { path: String },
    /// `path` was requested, but its parent path wasn't.
    #[error("`{path}` can't be expanded without also expanding `{parent}`")]
    OrphanedChild { path: String, parent: String },
}

impl ExpansionError {
    /// The full path, as requested by the client.
    pub fn path(&self) -> &str {
        match self {
            ExpansionError::UnknownAssociation { path }
            | ExpansionError::OrphanedChild { path, .. } => path,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ExpansionError::UnknownAssociation { .. } => "unknown_association",
            ExpansionError::OrphanedChild { .. } => "orphaned_child",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// All the [`ExpansionError`]s found while decorating a resource.
///
/// Every error is reported once, in discovery order.
/// The client should get back a `400 Bad Request`.
pub struct ExpansionErrors {
    items: IndexSet<ExpansionError>,
}

impl ExpansionErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Record an error, unless it was already recorded.
    pub fn push(&mut self, error: ExpansionError) {
        self.items.insert(error);
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &ExpansionError> {
        self.items.iter()
    }

    pub fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    pub fn error_type(&self) -> &'static str {
        "expansion_error"
    }

    /// The JSON body of the error response.
    ///
    /// Each error is listed in `meta.errors`.
    pub fn to_body(&self) -> Value {
        let errors: Vec<Value> = self
            .items
            .iter()
            .map(|e| {
                json!({
                    "kind": e.kind(),
                    "path": e.path(),
                    "message": e.to_string(),
                })
            })
            .collect();
        let message = match self.items.first() {
            Some(single) if self.items.len() == 1 => single.to_string(),
            _ => "Some of the requested expansions are invalid".to_owned(),
        };
        error_body(self.error_type(), message, json!({ "errors": errors }))
    }
}

impl fmt::Display for ExpansionErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Some of the requested expansions are invalid:")?;
        for error in &self.items {
            write!(f, "\n- {error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ExpansionErrors {}

impl Extend<ExpansionError> for ExpansionErrors {
    fn extend<T: IntoIterator<Item = ExpansionError>>(&mut self, iter: T) {
        for error in iter {
            self.push(error);
        }
    }
}

impl IntoIterator for ExpansionErrors {
    type Item = ExpansionError;
    type IntoIter = indexmap::set::IntoIter<ExpansionError>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a ExpansionErrors {
    type Item = &'a ExpansionError;
    type IntoIter = indexmap::set::Iter<'a, ExpansionError>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
