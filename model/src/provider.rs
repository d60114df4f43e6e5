use crate::graph::{GraphError, ResourceGraph};
use crate::types::{ResourceId, ResourceKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("Engine rejected {resource}: {reason}")]
    Rejected { resource: ResourceId, reason: String },
}

pub type EngineResult<T> = Result<T, EngineError>;

/// One resource in an apply plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanStep {
    pub wave: usize,
    pub resource: ResourceId,
    pub kind: ResourceKind,
    pub depends_on: Vec<ResourceId>,
}

/// What an engine intends to do with a graph, in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyPlan {
    pub engine: String,
    pub steps: Vec<PlanStep>,
}

impl ApplyPlan {
    pub fn wave_count(&self) -> usize {
        self.steps.iter().map(|s| s.wave + 1).max().unwrap_or(0)
    }

    pub fn step(&self, resource: &ResourceId) -> Option<&PlanStep> {
        self.steps.iter().find(|s| &s.resource == resource)
    }
}

/// The external provisioning engine. Diffing, creation and retries live
/// behind this trait; the stack only hands over a finished graph.
pub trait ApplyEngine {
    fn submit(&self, graph: &ResourceGraph) -> EngineResult<ApplyPlan>;

    fn engine_name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::{IamBinding, Resource, ResourceSpec};

    struct MockEngine {
        reject: bool,
    }

    impl ApplyEngine for MockEngine {
        fn submit(&self, graph: &ResourceGraph) -> EngineResult<ApplyPlan> {
            let mut steps = Vec::new();
            for resource in graph.apply_order()? {
                if self.reject {
                    return Err(EngineError::Rejected {
                        resource: resource.id(),
                        reason: "quota exceeded".to_string(),
                    });
                }
                steps.push(PlanStep {
                    wave: 0,
                    resource: resource.id(),
                    kind: resource.kind(),
                    depends_on: vec![],
                });
            }
            Ok(ApplyPlan {
                engine: self.engine_name().to_string(),
                steps,
            })
        }

        fn engine_name(&self) -> &'static str {
            "mock"
        }
    }

    fn graph() -> ResourceGraph {
        let mut graph = ResourceGraph::new();
        graph
            .declare(Resource::new(
                "app-service",
                ResourceSpec::IamBinding(IamBinding {
                    project: "p".to_string(),
                    role: "roles/cloudsql.client".to_string(),
                    members: vec![],
                }),
            ))
            .unwrap();
        graph
    }

    #[test]
    fn test_mock_engine() {
        let plan = MockEngine { reject: false }.submit(&graph()).unwrap();
        assert_eq!(plan.engine, "mock");
        assert_eq!(plan.steps.len(), 1);
        assert_eq!(plan.wave_count(), 1);
        let id = ResourceId::new(ResourceKind::IamBinding, "app-service");
        assert_eq!(plan.step(&id).unwrap().kind, ResourceKind::IamBinding);
    }

    #[test]
    fn test_engine_rejection_surfaces() {
        let err = MockEngine { reject: true }.submit(&graph()).unwrap_err();
        assert!(err.to_string().contains("quota exceeded"));
        assert!(err.to_string().contains("iam-binding/app-service"));
    }
}
