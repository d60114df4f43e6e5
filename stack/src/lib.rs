//! The notejam GCP stack: resolves configuration, derives names, picks the
//! database settings and declares the resource graph.

pub mod builder;
pub mod catalog;
pub mod database;
pub mod error;
pub mod names;

pub use builder::ResourceGraphBuilder;
pub use database::{coerce_flag, DatabaseSettingsSelector};
pub use error::{StackError, StackResult};
pub use names::DerivedNames;

use model::{ApplyEngine, ApplyPlan, DatabaseSettings, Manifest, ResourceGraph};
use stack_config::{
    ConfigError, ConfigResolver, ConfigResult, ConfigSource, EnvSnapshot, ResolvedConfig,
    StackFile, STAGE_NAME_ENV,
};
use std::path::{Path, PathBuf};
use tracing::info;

/// Everything resolved for one run. Built once, then only read.
#[derive(Debug, Clone)]
pub struct Stack {
    pub config: ResolvedConfig,
    pub names: DerivedNames,
    pub database: DatabaseSettings,
}

impl Stack {
    /// Resolves configuration, derived names and database settings. Any
    /// missing value fails here, before a resource is declared.
    pub fn resolve(
        env: &EnvSnapshot,
        source: &dyn ConfigSource,
        ambient_stack: Option<&str>,
    ) -> StackResult<Self> {
        let config = ConfigResolver::new(env, source).resolve()?;
        let names = DerivedNames::derive(&config, env, ambient_stack)?;
        let database = DatabaseSettingsSelector::from_config(&config)?;

        info!(
            stage = %names.stage_name,
            app = %names.app_name,
            image = %names.image_name,
            availability_type = %database.availability_type,
            "stack resolved"
        );
        Ok(Self {
            config,
            names,
            database,
        })
    }

    pub fn build_graph(&self) -> StackResult<ResourceGraph> {
        Ok(ResourceGraphBuilder::new(&self.config, &self.names, &self.database).build()?)
    }

    pub fn manifest(&self, graph: &ResourceGraph) -> StackResult<Manifest> {
        Ok(Manifest::from_graph(self.names.stage_name.clone(), graph)?)
    }

    pub fn plan(&self, engine: &dyn ApplyEngine) -> StackResult<ApplyPlan> {
        let graph = self.build_graph()?;
        Ok(engine.submit(&graph)?)
    }
}

/// Path of the stack file: the explicit path if given, else
/// `Notejam.<stack>.toml` for the selected stack (or the stage override).
pub fn locate_stack_file(
    explicit: Option<&Path>,
    env: &EnvSnapshot,
    ambient_stack: Option<&str>,
) -> ConfigResult<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    ambient_stack
        .filter(|s| !s.is_empty())
        .or_else(|| env.get(STAGE_NAME_ENV))
        .map(StackFile::default_path)
        .ok_or(ConfigError::MissingStage {
            env_var: STAGE_NAME_ENV,
        })
}
