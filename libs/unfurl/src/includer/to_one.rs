use crate::decorate::Walk;
use crate::decorator::DecoratorInstance;
use crate::expand::Level;
use crate::reflection::{AssociationKind, Reflection};
use crate::resource::{Associated, PropertyError};

use super::{AssociationIncluder, Inclusion, fetch, include_nil, unexpected_shape};

/// Traverse an association holding (at most) a single item.
pub(super) struct ToOne;

impl AssociationIncluder for ToOne {
    fn supports(&self, kind: AssociationKind) -> bool {
        kind == AssociationKind::ToOne
    }

    fn include(
        &self,
        reflection: &Reflection,
        instance: &DecoratorInstance<'_>,
        level: &Level,
        walk: &mut Walk,
    ) -> Result<Inclusion, PropertyError> {
        match fetch(reflection, instance)? {
            Associated::Nil => Ok(include_nil(reflection, level, walk)),
            Associated::One(item) => {
                let value = walk.decorate_item(reflection.resolver(), &*item, level)?;
                Ok(Inclusion::Render(value))
            }
            many @ Associated::Many(_) => Err(unexpected_shape(reflection, "a single item", &many)),
        }
    }
}
