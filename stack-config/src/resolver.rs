use crate::error::{ConfigError, ConfigResult};
use crate::keys::ConfigKey;
use crate::secret::Secret;
use crate::source::{ConfigSource, EnvSnapshot};
use serde::Serialize;
use std::fmt;
use tracing::debug;

/// Where a resolved value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueOrigin {
    Environment(&'static str),
    Config(&'static str),
}

impl fmt::Display for ValueOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueOrigin::Environment(var) => write!(f, "env:{}", var),
            ValueOrigin::Config(key) => write!(f, "config:{}", key),
        }
    }
}

/// Every required value, resolved once per run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedConfig {
    pub project_name: String,
    pub project_number: String,
    pub location: String,
    pub repository_name: String,
    pub repository_owner: String,
    pub branch_name: String,
    pub db_user: String,
    pub db_pass: Secret,
    /// Raw value; coerced when the database settings are selected.
    pub db_high_availability: String,
    pub db_node_size: String,
}

/// Looks up each key in the environment snapshot first, then in the
/// configuration source.
pub struct ConfigResolver<'a> {
    env: &'a EnvSnapshot,
    source: &'a dyn ConfigSource,
}

impl<'a> ConfigResolver<'a> {
    pub fn new(env: &'a EnvSnapshot, source: &'a dyn ConfigSource) -> Self {
        Self { env, source }
    }

    pub fn resolve_key(&self, key: ConfigKey) -> ConfigResult<(String, ValueOrigin)> {
        if let Some(value) = self.env.get(key.env_var()) {
            debug!(key = %key, origin = key.env_var(), "resolved from environment");
            return Ok((value.to_string(), ValueOrigin::Environment(key.env_var())));
        }

        match self.source.get(key.config_key()) {
            Some(value) => {
                debug!(
                    key = %key,
                    origin = %self.source.describe(),
                    "resolved from stack configuration"
                );
                Ok((value.to_string(), ValueOrigin::Config(key.config_key())))
            }
            None => Err(ConfigError::MissingConfiguration {
                key: key.config_key(),
                env_var: key.env_var(),
            }),
        }
    }

    fn require(&self, key: ConfigKey) -> ConfigResult<String> {
        self.resolve_key(key).map(|(value, _)| value)
    }

    /// Resolves all keys in [`ConfigKey::ALL`] order, stopping at the first
    /// missing one.
    pub fn resolve(&self) -> ConfigResult<ResolvedConfig> {
        Ok(ResolvedConfig {
            project_name: self.require(ConfigKey::ProjectName)?,
            project_number: self.require(ConfigKey::ProjectNumber)?,
            location: self.require(ConfigKey::Location)?,
            repository_name: self.require(ConfigKey::Repository)?,
            db_user: self.require(ConfigKey::DbUser)?,
            db_pass: Secret::new(self.require(ConfigKey::DbPass)?),
            db_high_availability: self.require(ConfigKey::DbHighAvailability)?,
            db_node_size: self.require(ConfigKey::DbNodeSize)?,
            repository_owner: self.require(ConfigKey::Owner)?,
            branch_name: self.require(ConfigKey::Branch)?,
        })
    }
}
