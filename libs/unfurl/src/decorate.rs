use http::StatusCode;
use serde_json::{Map, Value, json};

use crate::body::error_body;
use crate::config::ExpandConfig;
use crate::decorator::Decorator;
use crate::expand::{
    ExpandPaths, ExpansionError, ExpansionErrors, Level, ValidationError, validate,
};
use crate::includer::{Inclusion, includer_for};
use crate::reflection::DecoratorResolver;
use crate::resource::{PropertyError, Resource};

/// Render `resource` with `decorator`, expanding the associations requested in `raw_expand`.
///
/// `raw_expand` is validated first (see [`validate`]): a malformed parameter
/// short-circuits before any getter is invoked.
/// The output holds every scalar property of the decorator, in declaration order,
/// followed by the requested associations, in declaration order.
///
/// All the requested paths that don't match a declared association are collected and
/// returned together as [`DecorateError::Expansion`]: no partial output is produced.
pub fn decorate(
    resource: &dyn Resource,
    decorator: &Decorator,
    raw_expand: Option<&Value>,
    config: &ExpandConfig,
) -> Result<Map<String, Value>, DecorateError> {
    let span = tracing::debug_span!(
        "Decorate resource",
        decorator.name = %decorator.name(),
        expand.path_count = tracing::field::Empty,
    );
    let _guard = span.enter();

    let paths = match validate(raw_expand, config) {
        Ok(paths) => paths,
        Err(e) => {
            tracing::debug!(
                error.kind = %e.kind(),
                error.message = %e,
                "The `expand` parameter is invalid"
            );
            return Err(e.into());
        }
    };
    span.record("expand.path_count", paths.len());
    render(resource, decorator, &paths)
}

/// Render `resource` with `decorator`, expanding an already validated set of paths.
pub fn decorate_paths(
    resource: &dyn Resource,
    decorator: &Decorator,
    paths: &ExpandPaths,
) -> Result<Map<String, Value>, DecorateError> {
    let _guard = tracing::debug_span!(
        "Decorate resource",
        decorator.name = %decorator.name(),
        expand.path_count = paths.len(),
    )
    .entered();
    render(resource, decorator, paths)
}

fn render(
    resource: &dyn Resource,
    decorator: &Decorator,
    paths: &ExpandPaths,
) -> Result<Map<String, Value>, DecorateError> {
    let mut walk = Walk::new();
    let output = walk.decorate(decorator, resource, &paths.level())?;
    walk.finish(output)
}

/// The state of a single decoration call.
///
/// It's threaded through the recursion to collect [`ExpansionError`]s from every level.
pub(crate) struct Walk {
    errors: ExpansionErrors,
}

impl Walk {
    pub(crate) fn new() -> Self {
        Self {
            errors: ExpansionErrors::new(),
        }
    }

    /// Render `represented` with `decorator`, expanding the branches of `level`.
    pub(crate) fn decorate(
        &mut self,
        decorator: &Decorator,
        represented: &dyn Resource,
        level: &Level,
    ) -> Result<Map<String, Value>, PropertyError> {
        let instance = decorator.decorate(represented);
        let mut output = Map::new();
        for property in decorator.properties() {
            let value = instance
                .receiver(property.exec_context())
                .attribute(property.name())?;
            output.insert(property.name().to_owned(), value);
        }

        for reflection in decorator.associations() {
            let Some(branch) = level.get(reflection.property()) else {
                continue;
            };
            let includer = includer_for(reflection.kind());
            match includer.include(reflection, &instance, branch.level(), self)? {
                Inclusion::Render(value) => {
                    output.insert(reflection.property().to_owned(), value);
                }
                Inclusion::Omit => {}
            }
        }
        self.settle(Some(decorator), level);
        Ok(output)
    }

    /// Render a single associated item.
    ///
    /// Items without a decorator are included as they are: nothing can be expanded on them.
    pub(crate) fn decorate_item(
        &mut self,
        resolver: &DecoratorResolver,
        item: &dyn Resource,
        level: &Level,
    ) -> Result<Value, PropertyError> {
        match resolver.resolve(item) {
            Some(decorator) => Ok(Value::Object(self.decorate(&decorator, item, level)?)),
            None => {
                self.settle(None, level);
                item.to_raw()
            }
        }
    }

    /// Check `level` against the decorators an empty association would have used.
    ///
    /// Decorators picked at runtime can't be known without an item, so their paths
    /// are accepted as they are.
    pub(crate) fn validate_unreached(&mut self, resolver: &DecoratorResolver, level: &Level) {
        if level.is_empty() {
            return;
        }
        match resolver {
            DecoratorResolver::Fixed(decorator) => {
                for reflection in decorator.associations() {
                    if let Some(branch) = level.get(reflection.property()) {
                        self.validate_unreached(reflection.resolver(), branch.level());
                    }
                }
                self.settle(Some(&**decorator), level);
            }
            DecoratorResolver::Undecorated => self.settle(None, level),
            DecoratorResolver::Computed(_) => {}
        }
    }

    /// Report the branches of `level` that `decorator` can't expand, and its orphans.
    fn settle(&mut self, decorator: Option<&Decorator>, level: &Level) {
        for (segment, branch) in level.branches() {
            if decorator.and_then(|d| d.association(segment)).is_none() {
                self.errors.push(ExpansionError::UnknownAssociation {
                    path: branch.path().full_path(),
                });
            }
        }
        for orphan in level.orphans() {
            self.errors.push(ExpansionError::OrphanedChild {
                path: orphan.full_path(),
                parent: orphan.parent_path().unwrap_or_default(),
            });
        }
    }

    pub(crate) fn finish(
        self,
        output: Map<String, Value>,
    ) -> Result<Map<String, Value>, DecorateError> {
        if self.errors.is_empty() {
            return Ok(output);
        }
        let invalid_paths: Vec<&str> = self.errors.iter().map(|e| e.path()).collect();
        tracing::debug!(
            expand.invalid_paths = ?invalid_paths,
            "Some of the requested expansions are invalid"
        );
        Err(DecorateError::Expansion(self.errors))
    }
}

/// The error returned by [`decorate`] and [`decorate_paths`].
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum DecorateError {
    #[error(transparent)]
    /// See [`ValidationError`] for details.
    Validation(#[from] ValidationError),
    #[error(transparent)]
    /// See [`ExpansionErrors`] for details.
    Expansion(#[from] ExpansionErrors),
    #[error(transparent)]
    /// A getter failed. It's a server-side problem.
    Property(#[from] PropertyError),
}

impl DecorateError {
    /// `422` for validation errors, `400` for expansion errors, `500` for getter failures.
    pub fn status_code(&self) -> StatusCode {
        match self {
            DecorateError::Validation(e) => e.status_code(),
            DecorateError::Expansion(e) => e.status_code(),
            DecorateError::Property(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_type(&self) -> &'static str {
        match self {
            DecorateError::Validation(e) => e.error_type(),
            DecorateError::Expansion(e) => e.error_type(),
            DecorateError::Property(_) => "internal_server_error",
        }
    }

    /// The JSON body of the error response.
    ///
    /// The details of getter failures are not exposed to the client.
    pub fn to_body(&self) -> Value {
        match self {
            DecorateError::Validation(e) => e.to_body(),
            DecorateError::Expansion(e) => e.to_body(),
            DecorateError::Property(_) => error_body(
                self.error_type(),
                "Something went wrong when trying to render the resource",
                json!({}),
            ),
        }
    }
}
