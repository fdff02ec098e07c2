use std::collections::HashSet;

use petgraph::graph::NodeIndex;

use crate::core::service::{Service, ServiceId};
use crate::graph::{DirectionIndex, ServiceGraph};

#[derive(Debug, Clone, Default)]
pub struct BuildPolicy {
    /// Exact names that never become nodes, sources or targets.
    pub excluded: HashSet<String>,
    /// Record per-node direction back-references while inserting edges.
    pub tag_directions: bool,
}

pub struct GraphBuilder {
    graph: ServiceGraph,
    policy: BuildPolicy,
}

impl GraphBuilder {
    pub fn new(policy: BuildPolicy) -> Self {
        let graph = ServiceGraph {
            directions: policy.tag_directions.then(DirectionIndex::default),
            ..ServiceGraph::default()
        };
        Self { graph, policy }
    }

    pub fn is_excluded(&self, id: &str) -> bool {
        self.policy.excluded.contains(id)
    }

    /// Inserts `id` unless present or excluded. Returns the slot of the retained node.
    pub fn add_node(&mut self, id: &str) -> Option<NodeIndex> {
        if self.is_excluded(id) {
            return None;
        }
        if let Some(existing) = self.graph.index.get(id) {
            return Some(*existing);
        }
        let node = self.graph.inner.add_node(ServiceId::new(id));
        self.graph.index.insert(id.to_string(), node);
        if let Some(directions) = self.graph.directions.as_mut() {
            directions.ensure_node(node);
        }
        Some(node)
    }

    /// Inserts `source -> target` unless the pair already exists or an endpoint is excluded.
    /// Returns whether a new edge was stored.
    pub fn add_edge(&mut self, source: &str, target: &str) -> bool {
        let (Some(from), Some(to)) = (self.add_node(source), self.add_node(target)) else {
            return false;
        };
        if self.graph.inner.find_edge(from, to).is_some() {
            return false;
        }
        let edge = self.graph.inner.add_edge(from, to, ());
        if let Some(directions) = self.graph.directions.as_mut() {
            directions.record(from, to, edge);
        }
        true
    }

    pub fn add_service<S: AsRef<str>>(&mut self, service: &str, dependencies: &[S]) {
        let Some(node) = self.add_node(service) else {
            return;
        };
        if self.graph.principal_set.insert(node) {
            self.graph.principals.push(node);
        }
        for dep in dependencies {
            self.add_edge(service, dep.as_ref());
        }
    }

    pub fn finish(self) -> ServiceGraph {
        self.graph
    }
}

pub fn build_graph(services: &[Service], policy: &BuildPolicy) -> ServiceGraph {
    let mut builder = GraphBuilder::new(policy.clone());
    for service in services {
        let deps: Vec<&str> = service.dependencies.iter().map(ServiceId::as_str).collect();
        builder.add_service(service.id.as_str(), &deps);
    }
    builder.finish()
}
