//! Configuration for the notejam stack.
//!
//! Values are read from an [`EnvSnapshot`] taken once at startup and from a
//! [`ConfigSource`] (normally the stack's TOML file). Nothing in this crate
//! reads the process environment except [`EnvSnapshot::capture`].

pub mod error;
pub mod keys;
pub mod resolver;
pub mod secret;
pub mod source;

pub use error::{ConfigError, ConfigResult};
pub use keys::{ConfigKey, APP_NAME_ENV, ENV_PREFIX, IMAGE_NAME_ENV, STAGE_NAME_ENV};
pub use resolver::{ConfigResolver, ResolvedConfig, ValueOrigin};
pub use secret::Secret;
pub use source::{ConfigSource, EnvSnapshot, StackFile};
