pub mod dry_run;
pub mod graph;
pub mod manifest;
pub mod provider;
pub mod resource;
pub mod types;

pub use dry_run::DryRunEngine;
pub use graph::{Dependency, Edge, GraphError, GraphResult, ResourceGraph};
pub use manifest::{Manifest, ManifestEntry};
pub use provider::{ApplyEngine, ApplyPlan, EngineError, EngineResult, PlanStep};
pub use resource::{
    AvailabilityType, BackupConfiguration, BuildTrigger, Container, ContainerService, Database,
    DatabaseInstance, DatabaseSettings, DatabaseUser, EnvVar, GithubSource, IamBinding, PushFilter,
    Resource, ResourceSpec, ServiceActivation, ServiceMetadata,
};
pub use types::{Attribute, Input, OutputRef, ResourceId, ResourceKind};

pub mod prelude {
    pub use crate::dry_run::*;
    pub use crate::graph::*;
    pub use crate::manifest::*;
    pub use crate::provider::*;
    pub use crate::resource::*;
    pub use crate::types::*;
}
