//! Typed declarations for every resource kind the notejam stack provisions.
//!
//! Field names follow the provider's input schema so the serialized form can
//! be handed to the apply engine unchanged.

use crate::types::{Input, OutputRef, ResourceId, ResourceKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Enables one Google API on the project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceActivation {
    pub project: String,
    pub service: String,
    pub disable_dependent_services: bool,
}

/// Cloud SQL availability mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AvailabilityType {
    /// Single zone, no standby.
    Zonal,
    /// Regional failover standby.
    Regional,
}

impl fmt::Display for AvailabilityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AvailabilityType::Zonal => f.write_str("ZONAL"),
            AvailabilityType::Regional => f.write_str("REGIONAL"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupConfiguration {
    pub binary_log_enabled: bool,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseSettings {
    pub tier: String,
    pub availability_type: AvailabilityType,
    pub backup_configuration: BackupConfiguration,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseInstance {
    pub project: String,
    pub database_version: String,
    pub region: String,
    pub settings: DatabaseSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Database {
    pub project: String,
    pub instance: Input,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseUser {
    pub project: String,
    pub name: String,
    pub instance: Input,
    pub password: Input,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvVar {
    pub name: String,
    pub value: Input,
}

impl EnvVar {
    pub fn new(name: impl Into<String>, value: Input) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Container {
    pub image: String,
    pub envs: Vec<EnvVar>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceMetadata {
    pub namespace: String,
}

/// A Cloud Run service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerService {
    pub location: String,
    pub project: String,
    pub metadata: ServiceMetadata,
    pub containers: Vec<Container>,
}

impl ContainerService {
    /// Looks up an environment variable across all containers.
    pub fn env(&self, name: &str) -> Option<&Input> {
        self.containers
            .iter()
            .flat_map(|container| container.envs.iter())
            .find(|env| env.name == name)
            .map(|env| &env.value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushFilter {
    pub branch: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GithubSource {
    pub name: String,
    pub owner: String,
    pub push: PushFilter,
}

/// A Cloud Build trigger fired on pushes to a GitHub branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildTrigger {
    pub project: String,
    pub github: GithubSource,
    pub description: String,
    pub substitutions: BTreeMap<String, Input>,
    pub filename: String,
}

/// Authoritative project-level grant of one role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IamBinding {
    pub project: String,
    pub role: String,
    pub members: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "properties", rename_all = "snake_case")]
pub enum ResourceSpec {
    ServiceActivation(ServiceActivation),
    DatabaseInstance(DatabaseInstance),
    Database(Database),
    DatabaseUser(DatabaseUser),
    ContainerService(ContainerService),
    BuildTrigger(BuildTrigger),
    IamBinding(IamBinding),
}

impl ResourceSpec {
    pub fn kind(&self) -> ResourceKind {
        match self {
            ResourceSpec::ServiceActivation(_) => ResourceKind::ServiceActivation,
            ResourceSpec::DatabaseInstance(_) => ResourceKind::DatabaseInstance,
            ResourceSpec::Database(_) => ResourceKind::Database,
            ResourceSpec::DatabaseUser(_) => ResourceKind::DatabaseUser,
            ResourceSpec::ContainerService(_) => ResourceKind::ContainerService,
            ResourceSpec::BuildTrigger(_) => ResourceKind::BuildTrigger,
            ResourceSpec::IamBinding(_) => ResourceKind::IamBinding,
        }
    }

    /// Every input whose value may come from another resource.
    pub fn inputs(&self) -> Vec<&Input> {
        match self {
            ResourceSpec::ServiceActivation(_)
            | ResourceSpec::DatabaseInstance(_)
            | ResourceSpec::IamBinding(_) => Vec::new(),
            ResourceSpec::Database(database) => vec![&database.instance],
            ResourceSpec::DatabaseUser(user) => vec![&user.instance, &user.password],
            ResourceSpec::ContainerService(service) => service
                .containers
                .iter()
                .flat_map(|container| container.envs.iter().map(|env| &env.value))
                .collect(),
            ResourceSpec::BuildTrigger(trigger) => trigger.substitutions.values().collect(),
        }
    }
}

/// A declared resource: logical name plus typed properties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub name: String,
    #[serde(flatten)]
    pub spec: ResourceSpec,
}

impl Resource {
    pub fn new(name: impl Into<String>, spec: ResourceSpec) -> Self {
        Self {
            name: name.into(),
            spec,
        }
    }

    pub fn kind(&self) -> ResourceKind {
        self.spec.kind()
    }

    pub fn id(&self) -> ResourceId {
        ResourceId::new(self.kind(), self.name.clone())
    }

    /// Upstream outputs this resource consumes, in declaration order.
    pub fn dependencies(&self) -> Vec<&OutputRef> {
        self.spec
            .inputs()
            .into_iter()
            .filter_map(Input::dependency)
            .collect()
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind(), self.name)
    }
}
