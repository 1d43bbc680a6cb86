use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;

use crate::reflection::{
    AssociationKind, ConfigurationError, ExecContext, Reflection, ReflectionOptions,
};
use crate::resource::{Associated, PropertyError, Resource};

pub use instance::DecoratorInstance;

mod instance;

pub(crate) type ComputedAttribute =
    Arc<dyn Fn(&dyn Resource) -> Result<Value, PropertyError> + Send + Sync>;
pub(crate) type ComputedAssociation =
    Arc<dyn for<'r> Fn(&'r dyn Resource) -> Result<Associated<'r>, PropertyError> + Send + Sync>;

/// Describes how a resource is rendered.
///
/// A decorator holds:
///
/// - the scalar [`Property`]s that are always rendered;
/// - the associations ([`Reflection`]s) that are rendered only when the client expands them;
/// - the computed getters that can be invoked on the decorator itself, rather than on
///   the decorated object (see [`ExecContext::Decorator`]).
///
/// Decorators are immutable once built and are meant to be shared, via `Arc`, across
/// every request that renders the same kind of resource.
///
/// Use [`Decorator::builder`] to create one.
pub struct Decorator {
    name: String,
    properties: Vec<Property>,
    associations: Vec<Reflection>,
    computed_attributes: IndexMap<String, ComputedAttribute>,
    computed_associations: IndexMap<String, ComputedAssociation>,
}

impl Decorator {
    /// Start declaring a new decorator.
    ///
    /// `name` is only used in diagnostics.
    pub fn builder(name: impl Into<String>) -> DecoratorBuilder {
        DecoratorBuilder {
            name: name.into(),
            properties: Vec::new(),
            associations: Vec::new(),
            computed_attributes: IndexMap::new(),
            computed_associations: IndexMap::new(),
            error: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The scalar properties, in declaration order.
    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    /// The declared associations, in declaration order.
    pub fn associations(&self) -> &[Reflection] {
        &self.associations
    }

    /// Look up an association by name.
    pub fn association(&self, property: &str) -> Option<&Reflection> {
        self.associations.iter().find(|r| r.property() == property)
    }

    /// Wrap `represented` with this decorator.
    pub fn decorate<'a>(&'a self, represented: &'a dyn Resource) -> DecoratorInstance<'a> {
        DecoratorInstance::new(self, represented)
    }

    pub(crate) fn computed_attribute(&self, name: &str) -> Option<&ComputedAttribute> {
        self.computed_attributes.get(name)
    }

    pub(crate) fn computed_association(&self, name: &str) -> Option<&ComputedAssociation> {
        self.computed_associations.get(name)
    }
}

impl fmt::Debug for Decorator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Decorator")
            .field("name", &self.name)
            .field("properties", &self.properties)
            .field("associations", &self.associations)
            .field(
                "computed_attributes",
                &self.computed_attributes.keys().collect::<Vec<_>>(),
            )
            .field(
                "computed_associations",
                &self.computed_associations.keys().collect::<Vec<_>>(),
            )
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A scalar property, always included in the output.
pub struct Property {
    name: String,
    exec_context: ExecContext,
}

impl Property {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn exec_context(&self) -> ExecContext {
        self.exec_context
    }
}

#[must_use]
/// The builder returned by [`Decorator::builder`].
///
/// Declaration mistakes are reported by [`DecoratorBuilder::build`].
pub struct DecoratorBuilder {
    name: String,
    properties: Vec<Property>,
    associations: Vec<Reflection>,
    computed_attributes: IndexMap<String, ComputedAttribute>,
    computed_associations: IndexMap<String, ComputedAssociation>,
    error: Option<ConfigurationError>,
}

impl DecoratorBuilder {
    /// Render the `name` property of the decorated object.
    pub fn property(self, name: impl Into<String>) -> Self {
        self.push_property(name.into(), ExecContext::Decorated)
    }

    /// Render a property computed by the decorator.
    ///
    /// `f` receives the decorated object.
    pub fn computed_property<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&dyn Resource) -> Result<Value, PropertyError> + Send + Sync + 'static,
    {
        let name = name.into();
        self.computed_attributes.insert(name.clone(), Arc::new(f));
        self.push_property(name, ExecContext::Decorator)
    }

    /// Register an association getter on the decorator.
    ///
    /// It's used by associations declared with [`ExecContext::Decorator`];
    /// `f` receives the decorated object.
    pub fn computed_association<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: for<'r> Fn(&'r dyn Resource) -> Result<Associated<'r>, PropertyError>
            + Send
            + Sync
            + 'static,
    {
        self.computed_associations.insert(name.into(), Arc::new(f));
        self
    }

    /// Declare a to-one association where the decorated object holds a reference to
    /// its parent.
    pub fn belongs_to(self, property: impl Into<String>, options: ReflectionOptions) -> Self {
        self.declare(AssociationKind::ToOne, property.into(), options)
    }

    /// Declare a to-one association.
    pub fn has_one(self, property: impl Into<String>, options: ReflectionOptions) -> Self {
        self.declare(AssociationKind::ToOne, property.into(), options)
    }

    /// Declare a to-many association.
    pub fn has_many(self, property: impl Into<String>, options: ReflectionOptions) -> Self {
        self.declare(AssociationKind::ToMany, property.into(), options)
    }

    /// Declare an association from a pre-built [`Reflection`].
    pub fn association(mut self, reflection: Reflection) -> Self {
        if self.error.is_none() && self.is_declared(reflection.property()) {
            self.error = Some(self.duplicate(reflection.property()));
        }
        self.associations.push(reflection);
        self
    }

    /// Finish the declaration.
    ///
    /// It fails with the first configuration mistake that was made.
    /// Associations declared with [`ExecContext::Decorator`] must have a matching
    /// [`computed_association`](Self::computed_association).
    pub fn build(self) -> Result<Arc<Decorator>, ConfigurationError> {
        if let Some(e) = self.error {
            return Err(e);
        }
        let uncomputed = self
            .associations
            .iter()
            .find(|r| {
                r.exec_context() == ExecContext::Decorator
                    && !self.computed_associations.contains_key(r.property())
            })
            .map(|r| r.property().to_owned());
        if let Some(property) = uncomputed {
            return Err(ConfigurationError::MissingComputedAssociation {
                decorator: self.name,
                property,
            });
        }
        Ok(Arc::new(Decorator {
            name: self.name,
            properties: self.properties,
            associations: self.associations,
            computed_attributes: self.computed_attributes,
            computed_associations: self.computed_associations,
        }))
    }

    fn declare(
        mut self,
        kind: AssociationKind,
        property: String,
        options: ReflectionOptions,
    ) -> Self {
        match Reflection::new(kind, property, options) {
            Ok(reflection) => self.association(reflection),
            Err(e) => {
                self.error.get_or_insert(e);
                self
            }
        }
    }

    fn push_property(mut self, name: String, exec_context: ExecContext) -> Self {
        if self.error.is_none() {
            if !crate::expand::is_identifier(&name) {
                self.error = Some(ConfigurationError::InvalidProperty {
                    property: name.clone(),
                });
            } else if self.is_declared(&name) {
                self.error = Some(self.duplicate(&name));
            }
        }
        self.properties.push(Property { name, exec_context });
        self
    }

    fn is_declared(&self, name: &str) -> bool {
        self.properties.iter().any(|p| p.name == name)
            || self.associations.iter().any(|r| r.property() == name)
    }

    fn duplicate(&self, property: &str) -> ConfigurationError {
        ConfigurationError::DuplicateProperty {
            decorator: self.name.clone(),
            property: property.to_owned(),
        }
    }
}
