use std::collections::HashMap;
use std::hash::Hash;

/// Load a model by its identifier.
pub trait Finder {
    type Id: ?Sized;
    type Model;

    /// It returns `Ok(None)` if there is no model with the given identifier.
    fn find(&self, id: &Self::Id) -> Result<Option<Self::Model>, anyhow::Error>;
}

impl<K, M> Finder for HashMap<K, M>
where
    K: Hash + Eq,
    M: Clone,
{
    type Id = K;
    type Model = M;

    fn find(&self, id: &K) -> Result<Option<M>, anyhow::Error> {
        Ok(self.get(id).cloned())
    }
}

impl<F> Finder for &F
where
    F: Finder + ?Sized,
{
    type Id = F::Id;
    type Model = F::Model;

    fn find(&self, id: &Self::Id) -> Result<Option<Self::Model>, anyhow::Error> {
        (**self).find(id)
    }
}
