use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::decorator::Decorator;
use crate::expand::is_identifier;
use crate::resource::Resource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// The cardinality of an association.
pub enum AssociationKind {
    /// A single associated item (e.g. an article belongs to its author).
    ToOne,
    /// An ordered collection of associated items (e.g. an article has many comments).
    ToMany,
}

impl AssociationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssociationKind::ToOne => "to_one",
            AssociationKind::ToMany => "to_many",
        }
    }
}

impl fmt::Display for AssociationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
/// The receiver a getter is invoked on.
pub enum ExecContext {
    /// The getter is invoked on the decorated domain object.
    ///
    /// This is the default.
    #[default]
    Decorated,
    /// The getter is invoked on the decorator instance, i.e. it's one of the
    /// computed getters registered on the [`Decorator`].
    #[serde(alias = "decorator_instance")]
    Decorator,
}

impl ExecContext {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecContext::Decorated => "decorated",
            ExecContext::Decorator => "decorator",
        }
    }
}

impl FromStr for ExecContext {
    type Err = InvalidExecContext;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "decorated" => Ok(ExecContext::Decorated),
            "decorator" | "decorator_instance" => Ok(ExecContext::Decorator),
            _ => Err(InvalidExecContext(s.to_owned())),
        }
    }
}

impl fmt::Display for ExecContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("`{0}` is not a valid exec context. Expected either `decorated` or `decorator`")]
/// The error returned when parsing an [`ExecContext`] from an unknown name.
pub struct InvalidExecContext(pub String);

type ResolveFn = dyn Fn(&dyn Resource) -> Option<Arc<Decorator>> + Send + Sync;

#[derive(Clone)]
/// How the decorator for an associated item is chosen.
pub enum DecoratorResolver {
    /// Every item is rendered with the same decorator.
    Fixed(Arc<Decorator>),
    /// The decorator is picked item by item, e.g. for polymorphic associations.
    ///
    /// Returning `None` includes the item without decoration.
    Computed(Arc<ResolveFn>),
    /// Items are included as they are, via [`Resource::to_raw`].
    Undecorated,
}

impl DecoratorResolver {
    /// Pick the decorator for each item using `f`.
    pub fn computed<F>(f: F) -> Self
    where
        F: Fn(&dyn Resource) -> Option<Arc<Decorator>> + Send + Sync + 'static,
    {
        Self::Computed(Arc::new(f))
    }

    /// The decorator to use for `item`, if any.
    pub fn resolve(&self, item: &dyn Resource) -> Option<Arc<Decorator>> {
        match self {
            DecoratorResolver::Fixed(decorator) => Some(decorator.clone()),
            DecoratorResolver::Computed(f) => f(item),
            DecoratorResolver::Undecorated => None,
        }
    }
}

impl fmt::Debug for DecoratorResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecoratorResolver::Fixed(decorator) => {
                f.debug_tuple("Fixed").field(&decorator.name()).finish()
            }
            DecoratorResolver::Computed(_) => f.write_str("Computed"),
            DecoratorResolver::Undecorated => f.write_str("Undecorated"),
        }
    }
}

#[derive(Debug, Clone)]
enum RawExecContext {
    Typed(ExecContext),
    Named(String),
}

#[derive(Debug, Clone)]
/// The options accepted when declaring an association.
///
/// A resolution strategy is required: use [`decorator`](Self::decorator),
/// [`decorate_with`](Self::decorate_with) or [`undecorated`](Self::undecorated).
pub struct ReflectionOptions {
    resolver: Option<DecoratorResolver>,
    render_nil: bool,
    exec_context: RawExecContext,
}

impl Default for ReflectionOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl ReflectionOptions {
    /// Options with the default settings: `nil` associations are rendered, getters are
    /// invoked on the decorated object, and no resolution strategy is set.
    pub fn new() -> Self {
        Self {
            resolver: None,
            render_nil: true,
            exec_context: RawExecContext::Typed(ExecContext::Decorated),
        }
    }

    /// Render every associated item with `decorator`.
    pub fn decorator(self, decorator: Arc<Decorator>) -> Self {
        self.resolver(DecoratorResolver::Fixed(decorator))
    }

    /// Pick the decorator for each associated item using `f`.
    pub fn decorate_with<F>(self, f: F) -> Self
    where
        F: Fn(&dyn Resource) -> Option<Arc<Decorator>> + Send + Sync + 'static,
    {
        self.resolver(DecoratorResolver::computed(f))
    }

    /// Include associated items without decorating them.
    pub fn undecorated(self) -> Self {
        self.resolver(DecoratorResolver::Undecorated)
    }

    /// Set the resolution strategy explicitly.
    pub fn resolver(mut self, resolver: DecoratorResolver) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Whether an empty association should be rendered as `null` (`true`, the default)
    /// or omitted from the output (`false`).
    pub fn render_nil(mut self, render_nil: bool) -> Self {
        self.render_nil = render_nil;
        self
    }

    /// Set the receiver of the association getter.
    pub fn exec_context(mut self, exec_context: ExecContext) -> Self {
        self.exec_context = RawExecContext::Typed(exec_context);
        self
    }

    /// Set the receiver of the association getter by name (e.g. from configuration).
    ///
    /// The name is validated when the [`Reflection`] is built.
    pub fn exec_context_named(mut self, name: impl Into<String>) -> Self {
        self.exec_context = RawExecContext::Named(name.into());
        self
    }
}

#[derive(Debug, Clone)]
/// The metadata for an association declared on a [`Decorator`].
///
/// It's immutable once built and can be shared across threads.
pub struct Reflection {
    kind: AssociationKind,
    property: String,
    resolver: DecoratorResolver,
    render_nil: bool,
    exec_context: ExecContext,
}

impl Reflection {
    /// Declare an association.
    ///
    /// `property` is the name of the getter holding the associated value(s); it's also
    /// the key used in the output and the segment clients use to expand the association.
    pub fn new(
        kind: AssociationKind,
        property: impl Into<String>,
        options: ReflectionOptions,
    ) -> Result<Self, ConfigurationError> {
        let property = property.into();
        if !is_identifier(&property) {
            return Err(ConfigurationError::InvalidProperty { property });
        }
        let exec_context = match options.exec_context {
            RawExecContext::Typed(exec_context) => exec_context,
            RawExecContext::Named(name) => match name.parse() {
                Ok(exec_context) => exec_context,
                Err(source) => {
                    return Err(ConfigurationError::InvalidExecContext { property, source });
                }
            },
        };
        let Some(resolver) = options.resolver else {
            return Err(ConfigurationError::MissingDecorator { property });
        };
        Ok(Self {
            kind,
            property,
            resolver,
            render_nil: options.render_nil,
            exec_context,
        })
    }

    /// Declare a to-one association.
    pub fn to_one(
        property: impl Into<String>,
        options: ReflectionOptions,
    ) -> Result<Self, ConfigurationError> {
        Self::new(AssociationKind::ToOne, property, options)
    }

    /// Declare a to-many association.
    pub fn to_many(
        property: impl Into<String>,
        options: ReflectionOptions,
    ) -> Result<Self, ConfigurationError> {
        Self::new(AssociationKind::ToMany, property, options)
    }

    pub fn kind(&self) -> AssociationKind {
        self.kind
    }

    pub fn property(&self) -> &str {
        &self.property
    }

    pub fn resolver(&self) -> &DecoratorResolver {
        &self.resolver
    }

    pub fn render_nil(&self) -> bool {
        self.render_nil
    }

    pub fn exec_context(&self) -> ExecContext {
        self.exec_context
    }
}

/// A decorator was declared with an invalid configuration.
///
/// These errors surface when the decorator is built, never while handling a request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigurationError {
    #[error(
        "The `{property}` association doesn't specify how to decorate its items. \
        Use `decorator`, `decorate_with` or `undecorated` on its options"
    )]
    MissingDecorator { property: String },
    #[error("The `{property}` association has an invalid exec context")]
    InvalidExecContext {
        property: String,
        #[source]
        source: InvalidExecContext,
    },
    #[error("`{property}` is not a valid property name")]
    InvalidProperty { property: String },
    #[error("`{property}` is declared more than once on the `{decorator}` decorator")]
    DuplicateProperty { decorator: String, property: String },
    #[error(
        "The `{property}` association runs on the `{decorator}` decorator, \
        but there is no `computed_association` getter for it"
    )]
    MissingComputedAssociation { decorator: String, property: String },
}
