use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while resolving stack configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Required key absent from both the environment and the stack file
    #[error("Missing required configuration '{key}': set {env_var} or add '{key}' to the stack configuration")]
    MissingConfiguration {
        key: &'static str,
        env_var: &'static str,
    },

    /// No stage override and no stack selected
    #[error("No stack selected: pass --stack or set {env_var}")]
    MissingStage { env_var: &'static str },

    /// Value present but unusable
    #[error("Invalid value '{value}' for '{key}': {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },

    /// Stack file does not exist
    #[error("Stack configuration file not found: {}", path.display())]
    ConfigFileNotFound { path: PathBuf },

    /// Stack file is not valid TOML or has the wrong shape
    #[error("Failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
