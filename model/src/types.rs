use serde::{Deserialize, Serialize};
use std::fmt;

/// The kinds of resources a stack can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    ServiceActivation,
    DatabaseInstance,
    Database,
    DatabaseUser,
    ContainerService,
    BuildTrigger,
    IamBinding,
}

impl ResourceKind {
    /// Provider type token understood by the apply engine.
    pub fn type_token(&self) -> &'static str {
        match self {
            ResourceKind::ServiceActivation => "gcp:projects/service:Service",
            ResourceKind::DatabaseInstance => "gcp:sql/databaseInstance:DatabaseInstance",
            ResourceKind::Database => "gcp:sql/database:Database",
            ResourceKind::DatabaseUser => "gcp:sql/user:User",
            ResourceKind::ContainerService => "gcp:cloudrun/service:Service",
            ResourceKind::BuildTrigger => "gcp:cloudbuild/trigger:Trigger",
            ResourceKind::IamBinding => "gcp:projects/iAMBinding:IAMBinding",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ResourceKind::ServiceActivation => "service-activation",
            ResourceKind::DatabaseInstance => "database-instance",
            ResourceKind::Database => "database",
            ResourceKind::DatabaseUser => "database-user",
            ResourceKind::ContainerService => "container-service",
            ResourceKind::BuildTrigger => "build-trigger",
            ResourceKind::IamBinding => "iam-binding",
        };
        f.write_str(label)
    }
}

/// Identity of a declared resource: its kind plus the logical name.
///
/// Logical names are only unique per kind (the Cloud Run service and the
/// build trigger share the app name).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResourceId {
    pub kind: ResourceKind,
    pub name: String,
}

impl ResourceId {
    pub fn new(kind: ResourceKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }

    /// `<type token>::<logical name>`, stable across runs.
    pub fn urn(&self) -> String {
        format!("{}::{}", self.kind.type_token(), self.name)
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind, self.name)
    }
}

/// Output attributes that are only known once the engine has created a
/// resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Attribute {
    /// Provider-generated resource name.
    #[serde(rename = "name")]
    Name,
    /// Cloud SQL `project:region:instance` connection string.
    #[serde(rename = "connectionName")]
    ConnectionName,
}

impl Attribute {
    pub fn as_str(&self) -> &'static str {
        match self {
            Attribute::Name => "name",
            Attribute::ConnectionName => "connectionName",
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reference to an output attribute of another resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OutputRef {
    pub resource: ResourceId,
    pub attribute: Attribute,
}

impl OutputRef {
    pub fn new(resource: ResourceId, attribute: Attribute) -> Self {
        Self {
            resource,
            attribute,
        }
    }
}

impl fmt::Display for OutputRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${{{}.{}}}", self.resource, self.attribute)
    }
}

/// A resource property value.
///
/// Secrets serialize in full (the engine needs them) but never show up in
/// `Debug` or `Display`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Input {
    Value(String),
    Secret(String),
    Output(OutputRef),
}

impl Input {
    pub fn value(value: impl Into<String>) -> Self {
        Input::Value(value.into())
    }

    pub fn secret(value: impl Into<String>) -> Self {
        Input::Secret(value.into())
    }

    pub fn output(resource: &ResourceId, attribute: Attribute) -> Self {
        Input::Output(OutputRef::new(resource.clone(), attribute))
    }

    /// The upstream output this input waits on, if any.
    pub fn dependency(&self) -> Option<&OutputRef> {
        match self {
            Input::Output(output) => Some(output),
            _ => None,
        }
    }

    pub fn is_secret(&self) -> bool {
        matches!(self, Input::Secret(_))
    }
}

impl fmt::Debug for Input {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Input::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Input::Secret(_) => f.write_str("Secret([secret])"),
            Input::Output(output) => f.debug_tuple("Output").field(output).finish(),
        }
    }
}

impl fmt::Display for Input {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Input::Value(value) => f.write_str(value),
            Input::Secret(_) => f.write_str("[secret]"),
            Input::Output(output) => write!(f, "{}", output),
        }
    }
}
