//! Strategies to traverse an association, one per cardinality.
use serde_json::Value;

use crate::decorate::Walk;
use crate::decorator::DecoratorInstance;
use crate::expand::Level;
use crate::reflection::{AssociationKind, Reflection};
use crate::resource::{Associated, PropertyError};

use to_many::ToMany;
use to_one::ToOne;

mod to_many;
mod to_one;

/// What an includer decided to do with a requested association.
pub(crate) enum Inclusion {
    /// Insert the value in the output, under the association name.
    Render(Value),
    /// The association was requested, but it must not appear in the output.
    Omit,
}

pub(crate) trait AssociationIncluder: Sync {
    /// `true` if this includer can traverse associations of the given kind.
    fn supports(&self, kind: AssociationKind) -> bool;

    /// Fetch the association from `instance` and render it, expanding the branches
    /// of `level` on the associated items.
    fn include(
        &self,
        reflection: &Reflection,
        instance: &DecoratorInstance<'_>,
        level: &Level,
        walk: &mut Walk,
    ) -> Result<Inclusion, PropertyError>;
}

static INCLUDERS: &[&dyn AssociationIncluder] = &[&ToOne, &ToMany];

/// The first includer that supports `kind`.
pub(crate) fn includer_for(kind: AssociationKind) -> &'static dyn AssociationIncluder {
    for includer in INCLUDERS {
        if includer.supports(kind) {
            return *includer;
        }
    }
    unreachable!("There is no includer for {kind} associations")
}

/// Fetch the value(s) of the association, on the receiver picked by its exec context.
fn fetch<'a>(
    reflection: &Reflection,
    instance: &'a DecoratorInstance<'_>,
) -> Result<Associated<'a>, PropertyError> {
    instance
        .receiver(reflection.exec_context())
        .association(reflection.property())
}

/// An empty association: nothing to traverse, but the requested subpaths are still checked.
fn include_nil(reflection: &Reflection, level: &Level, walk: &mut Walk) -> Inclusion {
    walk.validate_unreached(reflection.resolver(), level);
    if reflection.render_nil() {
        Inclusion::Render(Value::Null)
    } else {
        Inclusion::Omit
    }
}

fn unexpected_shape(
    reflection: &Reflection,
    expected: &'static str,
    actual: &Associated<'_>,
) -> PropertyError {
    PropertyError::UnexpectedShape {
        property: reflection.property().to_owned(),
        expected,
        actual: actual.shape(),
    }
}
