//! Engine that plans without touching any cloud API.

use crate::graph::ResourceGraph;
use crate::provider::{ApplyEngine, ApplyPlan, EngineResult, PlanStep};
use tracing::{debug, info};

#[derive(Debug, Clone, Default)]
pub struct DryRunEngine;

impl DryRunEngine {
    pub fn new() -> Self {
        Self
    }
}

impl ApplyEngine for DryRunEngine {
    fn submit(&self, graph: &ResourceGraph) -> EngineResult<ApplyPlan> {
        let mut steps = Vec::with_capacity(graph.len());
        for (wave, resources) in graph.waves()?.into_iter().enumerate() {
            debug!(wave, size = resources.len(), "planning wave");
            for resource in resources {
                let id = resource.id();
                let mut depends_on: Vec<_> = graph
                    .dependencies_of(&id)?
                    .into_iter()
                    .map(|(upstream, _)| upstream)
                    .collect();
                depends_on.dedup();
                steps.push(PlanStep {
                    wave,
                    kind: resource.kind(),
                    resource: id,
                    depends_on,
                });
            }
        }

        info!(
            engine = self.engine_name(),
            resources = steps.len(),
            "dry-run plan ready"
        );
        Ok(ApplyPlan {
            engine: self.engine_name().to_string(),
            steps,
        })
    }

    fn engine_name(&self) -> &'static str {
        "dry-run"
    }
}
