//! JSON manifest handed to the external apply engine.

use crate::graph::{GraphResult, ResourceGraph};
use crate::resource::ResourceSpec;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub urn: String,
    pub name: String,
    #[serde(flatten)]
    pub spec: ResourceSpec,
    pub depends_on: Vec<String>,
}

/// Resources in apply order, each listing the URNs it depends on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub stack: String,
    pub generated_at: DateTime<Utc>,
    pub resources: Vec<ManifestEntry>,
}

impl Manifest {
    pub fn from_graph(stack: impl Into<String>, graph: &ResourceGraph) -> GraphResult<Self> {
        let mut resources = Vec::with_capacity(graph.len());
        for resource in graph.apply_order()? {
            let mut depends_on: Vec<String> = graph
                .dependencies_of(&resource.id())?
                .into_iter()
                .map(|(id, _)| id.urn())
                .collect();
            depends_on.dedup();
            resources.push(ManifestEntry {
                urn: resource.id().urn(),
                name: resource.name.clone(),
                spec: resource.spec.clone(),
                depends_on,
            });
        }

        Ok(Self {
            stack: stack.into(),
            generated_at: Utc::now(),
            resources,
        })
    }

    pub fn to_json_pretty(&self) -> GraphResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
