use std::path::PathBuf;

use anyhow::Context;
use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use serde::de::DeserializeOwned;

static PROFILE_ENV_VAR: &str = "UNFURL_PROFILE";
static ENV_PREFIX: &str = "UNFURL_";

#[derive(Clone, Debug, Default)]
/// Load configuration from YAML files and environment variables.
///
/// Sources are merged in order, later sources winning over earlier ones:
///
/// 1. `{configuration_dir}/base.yml`
/// 2. `{configuration_dir}/{profile}.yml`
/// 3. environment variables prefixed with `UNFURL_`, using `__` to separate nested keys
///    (e.g. `UNFURL_EXPAND__MAX_PATH_COUNT=10`).
///
/// Missing files are skipped.
/// The configuration directory defaults to `configuration`; the profile, when not set
/// explicitly, is read from the `UNFURL_PROFILE` environment variable.
pub struct ConfigLoader {
    configuration_dir: Option<PathBuf>,
    profile: Option<String>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the profile explicitly, rather than reading it from `UNFURL_PROFILE`.
    pub fn profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    pub fn configuration_dir<Dir>(mut self, dir: Dir) -> Self
    where
        Dir: Into<PathBuf>,
    {
        self.configuration_dir = Some(dir.into());
        self
    }

    pub fn load<Config>(self) -> Result<Config, errors::ConfigLoadError>
    where
        Config: DeserializeOwned,
    {
        let profile = match self.profile {
            Some(profile) => profile,
            None => load_profile().map_err(|e| errors::ConfigLoadError(e.into()))?,
        };
        let configuration_dir = self
            .configuration_dir
            .unwrap_or_else(|| PathBuf::from("configuration"));
        let span = tracing::info_span!(
            "Loading configuration",
            configuration.directory = %configuration_dir.display(),
            configuration.profile = %profile,
        );
        let _guard = span.enter();

        let base_filepath = configuration_dir.join("base.yml");
        let profile_filepath = configuration_dir.join(format!("{profile}.yml"));
        let env_source = Env::prefixed(ENV_PREFIX)
            .split("__")
            .ignore(&["PROFILE"]);
        let figment = Figment::new()
            .merge(Yaml::file(base_filepath))
            .merge(Yaml::file(profile_filepath))
            .merge(env_source);

        figment
            .extract()
            .context("Failed to load hierarchical configuration")
            .map_err(errors::ConfigLoadError)
    }
}

fn load_profile() -> Result<String, errors::ConfigProfileLoadError> {
    std::env::var(PROFILE_ENV_VAR)
        .with_context(|| {
            format!(
                "Failed to load the configuration profile: the environment variable `{PROFILE_ENV_VAR}` \
                is either not set or set to a value that contains invalid UTF-8"
            )
        })
        .map_err(errors::ConfigProfileLoadError)
}

pub mod errors {
    //! Errors that can happen when loading configuration.

    #[derive(Debug, thiserror::Error)]
    #[error("Failed to load configuration")]
    /// The error returned by [`ConfigLoader::load`](super::ConfigLoader::load).
    pub struct ConfigLoadError(#[source] pub(super) anyhow::Error);

    #[derive(Debug, thiserror::Error)]
    #[error(transparent)]
    /// The configuration profile couldn't be determined.
    pub struct ConfigProfileLoadError(pub(super) anyhow::Error);
}
