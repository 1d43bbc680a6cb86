use serde_json::{Map, Value};

use super::Decorator;
use crate::decorate::{DecorateError, Walk};
use crate::expand::ExpandPaths;
use crate::reflection::ExecContext;
use crate::resource::{Associated, PropertyError, Resource};

/// A [`Decorator`] wrapping a specific domain object.
///
/// It's the receiver for getters declared with [`ExecContext::Decorator`]:
/// as a [`Resource`], it exposes the computed getters registered on its decorator.
#[derive(Clone, Copy)]
pub struct DecoratorInstance<'a> {
    decorator: &'a Decorator,
    represented: &'a dyn Resource,
}

impl<'a> DecoratorInstance<'a> {
    pub(super) fn new(decorator: &'a Decorator, represented: &'a dyn Resource) -> Self {
        Self {
            decorator,
            represented,
        }
    }

    pub fn decorator(&self) -> &'a Decorator {
        self.decorator
    }

    /// The decorated domain object.
    pub fn represented(&self) -> &'a dyn Resource {
        self.represented
    }

    /// Render the decorated object, expanding `paths`.
    pub fn render(&self, paths: &ExpandPaths) -> Result<Map<String, Value>, DecorateError> {
        let mut walk = Walk::new();
        let output = walk.decorate(self.decorator, self.represented, &paths.level())?;
        walk.finish(output)
    }

    /// The object getters should be invoked on.
    pub(crate) fn receiver(&self, exec_context: ExecContext) -> &dyn Resource {
        match exec_context {
            ExecContext::Decorated => self.represented,
            ExecContext::Decorator => self,
        }
    }

    fn receiver_name(&self) -> String {
        format!("the `{}` decorator", self.decorator.name())
    }
}

impl Resource for DecoratorInstance<'_> {
    fn attribute(&self, name: &str) -> Result<Value, PropertyError> {
        match self.decorator.computed_attribute(name) {
            Some(getter) => getter(self.represented),
            None => Err(PropertyError::missing(name, self.receiver_name())),
        }
    }

    fn association(&self, name: &str) -> Result<Associated<'_>, PropertyError> {
        match self.decorator.computed_association(name) {
            Some(getter) => getter(self.represented),
            None => Err(PropertyError::missing(name, self.receiver_name())),
        }
    }

    fn to_raw(&self) -> Result<Value, PropertyError> {
        self.represented.to_raw()
    }
}
