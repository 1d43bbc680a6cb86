use serde_json::Value;

use crate::decorate::Walk;
use crate::decorator::DecoratorInstance;
use crate::expand::Level;
use crate::reflection::{AssociationKind, Reflection};
use crate::resource::{Associated, PropertyError};

use super::{AssociationIncluder, Inclusion, fetch, include_nil, unexpected_shape};

/// Traverse an association holding an ordered collection of items.
pub(super) struct ToMany;

impl AssociationIncluder for ToMany {
    fn supports(&self, kind: AssociationKind) -> bool {
        kind == AssociationKind::ToMany
    }

    fn include(
        &self,
        reflection: &Reflection,
        instance: &DecoratorInstance<'_>,
        level: &Level,
        walk: &mut Walk,
    ) -> Result<Inclusion, PropertyError> {
        let items = match fetch(reflection, instance)? {
            Associated::Nil => return Ok(include_nil(reflection, level, walk)),
            Associated::Many(items) => items,
            one @ Associated::One(_) => {
                return Err(unexpected_shape(reflection, "a collection", &one));
            }
        };
        if items.is_empty() {
            walk.validate_unreached(reflection.resolver(), level);
            return Ok(Inclusion::Render(Value::Array(Vec::new())));
        }

        let mut rendered = Vec::with_capacity(items.len());
        for item in &items {
            rendered.push(walk.decorate_item(reflection.resolver(), &**item, level)?);
        }
        Ok(Inclusion::Render(Value::Array(rendered)))
    }
}
