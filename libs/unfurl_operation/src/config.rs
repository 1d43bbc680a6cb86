use unfurl::ExpandConfig;

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
/// The configuration shared by all operations.
///
/// It can be loaded with [`unfurl::config::ConfigLoader`]:
///
/// ```yaml
/// expand:
///   max_path_count: 10
/// ```
pub struct OperationConfig {
    /// Limits applied to the `expand` parameter.
    #[serde(default)]
    pub expand: ExpandConfig,
}

impl OperationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_expand(mut self, expand: ExpandConfig) -> Self {
        self.expand = expand;
        self
    }
}
