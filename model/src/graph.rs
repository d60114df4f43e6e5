//! Resource graph with explicit dependency edges.
//!
//! Edges point from the resource that produces an output to the resource
//! that consumes it, so a topological order of the graph is a valid apply
//! order.

use crate::resource::Resource;
use crate::types::{Attribute, ResourceId, ResourceKind};
use petgraph::algo::toposort;
use petgraph::dot::Dot;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use thiserror::Error;
use tracing::debug;

/// Errors related to graph construction and traversal
#[derive(Error, Debug)]
pub enum GraphError {
    #[error("Resource already declared: {0}")]
    DuplicateResource(ResourceId),

    #[error("Resource {consumer} references undeclared resource {missing}")]
    UnknownResource {
        consumer: ResourceId,
        missing: ResourceId,
    },

    #[error("Resource not found: {0}")]
    NotFound(ResourceId),

    #[error("Dependency cycle through {0}")]
    CyclicDependency(ResourceId),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type GraphResult<T> = Result<T, GraphError>;

/// Edge weight: which output attribute of the upstream resource is consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    pub attribute: Attribute,
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.attribute)
    }
}

/// A directed edge in resolved form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub from: ResourceId,
    pub to: ResourceId,
    pub attribute: Attribute,
}

pub struct ResourceGraph {
    graph: DiGraph<Resource, Dependency>,
    index: HashMap<ResourceId, NodeIndex>,
}

impl ResourceGraph {
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            index: HashMap::new(),
        }
    }

    /// Declare a resource and link it to every resource whose outputs it
    /// consumes. Referenced resources must already be declared, which keeps
    /// the graph acyclic.
    pub fn declare(&mut self, resource: Resource) -> GraphResult<ResourceId> {
        let id = resource.id();
        if self.contains(&id) {
            return Err(GraphError::DuplicateResource(id));
        }

        let mut upstream = Vec::new();
        for output in resource.dependencies() {
            let node = self.index.get(&output.resource).ok_or_else(|| {
                GraphError::UnknownResource {
                    consumer: id.clone(),
                    missing: output.resource.clone(),
                }
            })?;
            upstream.push((*node, output.attribute));
        }

        let node = self.graph.add_node(resource);
        self.index.insert(id.clone(), node);
        for (from, attribute) in upstream {
            self.graph.add_edge(from, node, Dependency { attribute });
        }

        debug!(
            resource = %id,
            dependencies = self.graph.edges_directed(node, Direction::Incoming).count(),
            "declared resource"
        );
        Ok(id)
    }

    pub fn get(&self, id: &ResourceId) -> GraphResult<&Resource> {
        let node = self
            .index
            .get(id)
            .ok_or_else(|| GraphError::NotFound(id.clone()))?;
        Ok(&self.graph[*node])
    }

    pub fn find(&self, kind: ResourceKind, name: &str) -> Option<&Resource> {
        self.get(&ResourceId::new(kind, name)).ok()
    }

    pub fn contains(&self, id: &ResourceId) -> bool {
        self.index.contains_key(id)
    }

    /// Resources in declaration order.
    pub fn resources(&self) -> impl Iterator<Item = &Resource> {
        self.graph.node_weights()
    }

    pub fn of_kind(&self, kind: ResourceKind) -> Vec<&Resource> {
        self.resources().filter(|r| r.kind() == kind).collect()
    }

    pub fn count_by_kind(&self) -> BTreeMap<ResourceKind, usize> {
        let mut counts = BTreeMap::new();
        for resource in self.resources() {
            *counts.entry(resource.kind()).or_insert(0) += 1;
        }
        counts
    }

    /// Resources `id` consumes outputs from.
    pub fn dependencies_of(&self, id: &ResourceId) -> GraphResult<Vec<(ResourceId, Attribute)>> {
        self.neighbours(id, Direction::Incoming)
    }

    /// Resources that consume outputs of `id`.
    pub fn dependents_of(&self, id: &ResourceId) -> GraphResult<Vec<(ResourceId, Attribute)>> {
        self.neighbours(id, Direction::Outgoing)
    }

    fn neighbours(
        &self,
        id: &ResourceId,
        direction: Direction,
    ) -> GraphResult<Vec<(ResourceId, Attribute)>> {
        let node = self
            .index
            .get(id)
            .ok_or_else(|| GraphError::NotFound(id.clone()))?;

        let mut found: Vec<(ResourceId, Attribute)> = self
            .graph
            .edges_directed(*node, direction)
            .map(|edge| {
                let other = match direction {
                    Direction::Incoming => edge.source(),
                    Direction::Outgoing => edge.target(),
                };
                (self.graph[other].id(), edge.weight().attribute)
            })
            .collect();
        // petgraph yields edges newest first
        found.reverse();
        Ok(found)
    }

    pub fn edges(&self) -> Vec<Edge> {
        self.graph
            .edge_references()
            .map(|edge| Edge {
                from: self.graph[edge.source()].id(),
                to: self.graph[edge.target()].id(),
                attribute: edge.weight().attribute,
            })
            .collect()
    }

    /// Topological order: every resource comes after everything it depends on.
    pub fn apply_order(&self) -> GraphResult<Vec<&Resource>> {
        let order = toposort(&self.graph, None)
            .map_err(|cycle| GraphError::CyclicDependency(self.graph[cycle.node_id()].id()))?;
        Ok(order.into_iter().map(|node| &self.graph[node]).collect())
    }

    /// Groups resources into waves. Wave 0 has no dependencies; every other
    /// resource sits one wave after its deepest dependency, so resources in
    /// the same wave may be applied concurrently.
    pub fn waves(&self) -> GraphResult<Vec<Vec<&Resource>>> {
        let order = toposort(&self.graph, None)
            .map_err(|cycle| GraphError::CyclicDependency(self.graph[cycle.node_id()].id()))?;

        let mut depth: HashMap<NodeIndex, usize> = HashMap::new();
        let mut waves: Vec<Vec<&Resource>> = Vec::new();
        for node in order {
            let level = self
                .graph
                .neighbors_directed(node, Direction::Incoming)
                .filter_map(|upstream| depth.get(&upstream))
                .map(|d| d + 1)
                .max()
                .unwrap_or(0);
            depth.insert(node, level);
            if waves.len() <= level {
                waves.resize_with(level + 1, Vec::new);
            }
            waves[level].push(&self.graph[node]);
        }
        Ok(waves)
    }

    /// Graphviz rendering of the graph.
    pub fn to_dot(&self) -> String {
        format!("{}", Dot::new(&self.graph))
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}

impl Default for ResourceGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::{
        AvailabilityType, BackupConfiguration, Database, DatabaseInstance, DatabaseSettings,
        IamBinding, ResourceSpec,
    };
    use crate::types::Input;

    fn instance(name: &str) -> Resource {
        Resource::new(
            name,
            ResourceSpec::DatabaseInstance(DatabaseInstance {
                project: "p".to_string(),
                database_version: "POSTGRES_9_6".to_string(),
                region: "us-central1".to_string(),
                settings: DatabaseSettings {
                    tier: "db-f1-micro".to_string(),
                    availability_type: AvailabilityType::Zonal,
                    backup_configuration: BackupConfiguration {
                        binary_log_enabled: false,
                        enabled: false,
                    },
                },
            }),
        )
    }

    fn database(name: &str, instance: &ResourceId) -> Resource {
        Resource::new(
            name,
            ResourceSpec::Database(Database {
                project: "p".to_string(),
                instance: Input::output(instance, Attribute::Name),
                name: name.to_string(),
            }),
        )
    }

    fn binding(name: &str) -> Resource {
        Resource::new(
            name,
            ResourceSpec::IamBinding(IamBinding {
                project: "p".to_string(),
                role: "roles/editor".to_string(),
                members: vec!["serviceAccount:1@cloudbuild.gserviceaccount.com".to_string()],
            }),
        )
    }

    #[test]
    fn test_create_resource_graph() {
        let graph = ResourceGraph::new();
        assert_eq!(graph.len(), 0);
        assert!(graph.is_empty());
        assert!(graph.apply_order().unwrap().is_empty());
        assert!(graph.waves().unwrap().is_empty());
    }

    #[test]
    fn test_declare_links_dependencies() {
        let mut graph = ResourceGraph::new();
        let inst = graph.declare(instance("inst")).unwrap();
        let db = graph.declare(database("db", &inst)).unwrap();

        assert_eq!(graph.len(), 2);
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(
            graph.dependencies_of(&db).unwrap(),
            vec![(inst.clone(), Attribute::Name)]
        );
        assert_eq!(
            graph.dependents_of(&inst).unwrap(),
            vec![(db.clone(), Attribute::Name)]
        );

        let edges = graph.edges();
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].from, inst);
        assert_eq!(edges[0].to, db);
    }

    #[test]
    fn test_duplicate_resource_rejected() {
        let mut graph = ResourceGraph::new();
        let inst = graph.declare(instance("inst")).unwrap();
        assert!(graph.contains(&inst));
        assert!(!graph.contains(&ResourceId::new(ResourceKind::Database, "inst")));
        match graph.declare(instance("inst")) {
            Err(GraphError::DuplicateResource(id)) => assert_eq!(id.name, "inst"),
            other => panic!("Expected DuplicateResource, got {:?}", other.map(|_| ())),
        }
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn test_unknown_reference_rejected() {
        let mut graph = ResourceGraph::new();
        let ghost = ResourceId::new(ResourceKind::DatabaseInstance, "ghost");
        match graph.declare(database("db", &ghost)) {
            Err(GraphError::UnknownResource { consumer, missing }) => {
                assert_eq!(consumer.name, "db");
                assert_eq!(missing, ghost);
            }
            other => panic!("Expected UnknownResource, got {:?}", other.map(|_| ())),
        }
        assert!(graph.is_empty());
    }

    #[test]
    fn test_apply_order_respects_edges() {
        let mut graph = ResourceGraph::new();
        graph.declare(binding("b1")).unwrap();
        let inst = graph.declare(instance("inst")).unwrap();
        graph.declare(database("db", &inst)).unwrap();

        let order: Vec<String> = graph
            .apply_order()
            .unwrap()
            .iter()
            .map(|r| r.name.clone())
            .collect();
        let inst_pos = order.iter().position(|n| n == "inst").unwrap();
        let db_pos = order.iter().position(|n| n == "db").unwrap();
        assert!(inst_pos < db_pos);
        assert_eq!(order.len(), 3);
    }

    #[test]
    fn test_waves() {
        let mut graph = ResourceGraph::new();
        graph.declare(binding("b1")).unwrap();
        let inst = graph.declare(instance("inst")).unwrap();
        graph.declare(database("db1", &inst)).unwrap();
        graph.declare(database("db2", &inst)).unwrap();

        let waves = graph.waves().unwrap();
        assert_eq!(waves.len(), 2);
        assert_eq!(waves[0].len(), 2);
        let second: Vec<&str> = waves[1].iter().map(|r| r.name.as_str()).collect();
        assert!(second.contains(&"db1"));
        assert!(second.contains(&"db2"));
    }

    #[test]
    fn test_query_by_kind() {
        let mut graph = ResourceGraph::new();
        graph.declare(binding("b1")).unwrap();
        graph.declare(binding("b2")).unwrap();
        graph.declare(instance("inst")).unwrap();

        assert_eq!(graph.of_kind(ResourceKind::IamBinding).len(), 2);
        let counts = graph.count_by_kind();
        assert_eq!(counts[&ResourceKind::IamBinding], 2);
        assert_eq!(counts[&ResourceKind::DatabaseInstance], 1);
        assert!(graph.find(ResourceKind::IamBinding, "b2").is_some());
        assert!(graph.find(ResourceKind::Database, "b2").is_none());
    }

    #[test]
    fn test_not_found() {
        let graph = ResourceGraph::new();
        let id = ResourceId::new(ResourceKind::Database, "nope");
        match graph.get(&id) {
            Err(GraphError::NotFound(missing)) => assert_eq!(missing, id),
            _ => panic!("Expected NotFound error"),
        }
    }

    #[test]
    fn test_dot_output() {
        let mut graph = ResourceGraph::new();
        let inst = graph.declare(instance("inst")).unwrap();
        graph.declare(database("db", &inst)).unwrap();

        let dot = graph.to_dot();
        assert!(dot.starts_with("digraph"));
        assert!(dot.contains("database-instance/inst"));
        assert!(dot.contains("database/db"));
        assert!(dot.contains("name"));
    }
}
