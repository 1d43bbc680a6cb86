use std::ops::Deref;
use std::sync::Arc;

use serde_json::{Map, Value};

/// A domain object that can be rendered by a [`Decorator`](crate::Decorator).
///
/// Implement it for your models to expose their properties by name.
/// `serde_json::Value` and `serde_json::Map` implement it out of the box, which makes
/// it possible to decorate raw JSON documents, including the output of a previous
/// decoration.
///
/// # Example
///
/// ```rust
/// use serde_json::Value;
/// use unfurl::{Associated, PropertyError, Resource};
///
/// struct Role {
///     name: String,
/// }
///
/// struct User {
///     full_name: String,
///     role: Option<Role>,
/// }
///
/// impl Resource for Role {
///     fn attribute(&self, name: &str) -> Result<Value, PropertyError> {
///         match name {
///             "name" => Ok(self.name.clone().into()),
///             _ => Err(PropertyError::missing(name, "Role")),
///         }
///     }
///
///     fn association(&self, name: &str) -> Result<Associated<'_>, PropertyError> {
///         Err(PropertyError::missing(name, "Role"))
///     }
///
///     fn to_raw(&self) -> Result<Value, PropertyError> {
///         Ok(serde_json::json!({ "name": self.name }))
///     }
/// }
///
/// impl Resource for User {
///     fn attribute(&self, name: &str) -> Result<Value, PropertyError> {
///         match name {
///             "full_name" => Ok(self.full_name.clone().into()),
///             _ => Err(PropertyError::missing(name, "User")),
///         }
///     }
///
///     fn association(&self, name: &str) -> Result<Associated<'_>, PropertyError> {
///         match name {
///             "role" => Ok(Associated::from_option(self.role.as_ref())),
///             _ => Err(PropertyError::missing(name, "User")),
///         }
///     }
///
///     fn to_raw(&self) -> Result<Value, PropertyError> {
///         Ok(serde_json::json!({ "full_name": self.full_name }))
///     }
/// }
/// ```
pub trait Resource {
    /// Read a scalar property.
    fn attribute(&self, name: &str) -> Result<Value, PropertyError>;

    /// Read the value(s) held by an association.
    fn association(&self, name: &str) -> Result<Associated<'_>, PropertyError>;

    /// The representation used when the resource is included without a decorator.
    fn to_raw(&self) -> Result<Value, PropertyError>;
}

/// The value(s) returned by [`Resource::association`].
pub enum Associated<'a> {
    /// The association is empty (e.g. a `NULL` foreign key).
    Nil,
    /// A single associated item, for to-one associations.
    One(Item<'a>),
    /// An ordered collection of associated items, for to-many associations.
    Many(Vec<Item<'a>>),
}

impl<'a> Associated<'a> {
    /// A single item, borrowed from the receiver.
    pub fn one<R>(item: &'a R) -> Self
    where
        R: Resource + 'a,
    {
        Self::One(Item::Borrowed(item))
    }

    /// A single item, computed on the fly.
    pub fn owned<R>(item: R) -> Self
    where
        R: Resource + 'a,
    {
        Self::One(Item::Owned(Box::new(item)))
    }

    /// `Nil` for `None`, a single borrowed item otherwise.
    pub fn from_option<R>(item: Option<&'a R>) -> Self
    where
        R: Resource + 'a,
    {
        match item {
            Some(item) => Self::one(item),
            None => Self::Nil,
        }
    }

    /// A collection of items borrowed from the receiver.
    pub fn many<I, R>(items: I) -> Self
    where
        I: IntoIterator<Item = &'a R>,
        R: Resource + 'a,
    {
        Self::Many(
            items
                .into_iter()
                .map(|item| Item::Borrowed(item as &dyn Resource))
                .collect(),
        )
    }

    pub(crate) fn shape(&self) -> &'static str {
        match self {
            Self::Nil => "nothing",
            Self::One(_) => "a single item",
            Self::Many(_) => "a collection",
        }
    }
}

/// An associated item, either borrowed from its parent or owned.
pub enum Item<'a> {
    Borrowed(&'a dyn Resource),
    Owned(Box<dyn Resource + 'a>),
}

impl<'a> Deref for Item<'a> {
    type Target = dyn Resource + 'a;

    fn deref(&self) -> &Self::Target {
        match self {
            Item::Borrowed(item) => *item,
            Item::Owned(item) => item.as_ref(),
        }
    }
}

impl<'a> From<&'a dyn Resource> for Item<'a> {
    fn from(item: &'a dyn Resource) -> Self {
        Item::Borrowed(item)
    }
}

/// A getter failed while rendering a resource.
///
/// The engine doesn't try to interpret these failures: they're returned to the caller as they are.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum PropertyError {
    #[error("`{property}` is not defined on {receiver}")]
    /// The receiver doesn't expose a property with the requested name.
    Missing { property: String, receiver: String },
    #[error("`{property}` was expected to hold {expected}, but it holds {actual}")]
    /// An association returned a value with the wrong cardinality.
    UnexpectedShape {
        property: String,
        expected: &'static str,
        actual: &'static str,
    },
    #[error("Failed to read `{property}`")]
    /// The getter itself failed.
    Getter {
        property: String,
        #[source]
        source: anyhow::Error,
    },
}

impl PropertyError {
    /// The receiver doesn't expose `property`.
    pub fn missing(property: impl Into<String>, receiver: impl Into<String>) -> Self {
        Self::Missing {
            property: property.into(),
            receiver: receiver.into(),
        }
    }

    /// The getter for `property` failed with `source`.
    pub fn getter<E>(property: impl Into<String>, source: E) -> Self
    where
        E: Into<anyhow::Error>,
    {
        Self::Getter {
            property: property.into(),
            source: source.into(),
        }
    }
}

impl Resource for Map<String, Value> {
    fn attribute(&self, name: &str) -> Result<Value, PropertyError> {
        self.get(name)
            .cloned()
            .ok_or_else(|| PropertyError::missing(name, "a JSON object"))
    }

    fn association(&self, name: &str) -> Result<Associated<'_>, PropertyError> {
        let value = self
            .get(name)
            .ok_or_else(|| PropertyError::missing(name, "a JSON object"))?;
        Ok(match value {
            Value::Null => Associated::Nil,
            Value::Array(items) => Associated::many(items),
            item => Associated::one(item),
        })
    }

    fn to_raw(&self) -> Result<Value, PropertyError> {
        Ok(Value::Object(self.clone()))
    }
}

impl Resource for Value {
    fn attribute(&self, name: &str) -> Result<Value, PropertyError> {
        match self {
            Value::Object(map) => map.attribute(name),
            other => Err(PropertyError::missing(name, json_type(other))),
        }
    }

    fn association(&self, name: &str) -> Result<Associated<'_>, PropertyError> {
        match self {
            Value::Object(map) => map.association(name),
            other => Err(PropertyError::missing(name, json_type(other))),
        }
    }

    fn to_raw(&self) -> Result<Value, PropertyError> {
        Ok(self.clone())
    }
}

impl<R> Resource for &R
where
    R: Resource + ?Sized,
{
    fn attribute(&self, name: &str) -> Result<Value, PropertyError> {
        (**self).attribute(name)
    }

    fn association(&self, name: &str) -> Result<Associated<'_>, PropertyError> {
        (**self).association(name)
    }

    fn to_raw(&self) -> Result<Value, PropertyError> {
        (**self).to_raw()
    }
}

impl<R> Resource for Box<R>
where
    R: Resource + ?Sized,
{
    fn attribute(&self, name: &str) -> Result<Value, PropertyError> {
        (**self).attribute(name)
    }

    fn association(&self, name: &str) -> Result<Associated<'_>, PropertyError> {
        (**self).association(name)
    }

    fn to_raw(&self) -> Result<Value, PropertyError> {
        (**self).to_raw()
    }
}

impl<R> Resource for Arc<R>
where
    R: Resource + ?Sized,
{
    fn attribute(&self, name: &str) -> Result<Value, PropertyError> {
        (**self).attribute(name)
    }

    fn association(&self, name: &str) -> Result<Associated<'_>, PropertyError> {
        (**self).association(name)
    }

    fn to_raw(&self) -> Result<Value, PropertyError> {
        (**self).to_raw()
    }
}

/// A human-readable name for the type of a JSON value, article included.
pub(crate) fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
