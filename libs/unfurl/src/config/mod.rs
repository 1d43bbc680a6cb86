//! Settings that control how the `expand` parameter is processed.
//!
//! [`ExpandConfig`] is a plain `serde` type: embed it in your application configuration
//! or load it on its own with [`ConfigLoader`] (requires the `config` feature).
#[cfg(feature = "config")]
pub use loader::{ConfigLoader, errors};

#[cfg(feature = "config")]
mod loader;

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
/// Limits applied to the `expand` parameter.
///
/// # Example
///
/// ```yaml
/// max_path_count: 10
/// disabled: false
/// ```
pub struct ExpandConfig {
    /// The maximum number of paths a client can request at once.
    ///
    /// `None` means there is no limit.
    #[serde(default)]
    pub max_path_count: Option<usize>,
    /// When `true`, clients can't expand any association.
    #[serde(default)]
    pub disabled: bool,
}

impl ExpandConfig {
    /// No limit on the number of paths, expansion enabled.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_max_path_count(mut self, max_path_count: Option<usize>) -> Self {
        self.max_path_count = max_path_count;
        self
    }

    /// Reject every non-empty `expand` parameter.
    pub fn disable(mut self) -> Self {
        self.disabled = true;
        self
    }

    /// The number of paths a client can actually request.
    pub fn effective_limit(&self) -> Option<usize> {
        if self.disabled {
            Some(0)
        } else {
            self.max_path_count
        }
    }
}
