use std::borrow::Cow;
use std::collections::{HashMap, HashSet};

use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use serde::Serialize;

use crate::core::service::ServiceId;

pub mod builder;
pub mod views;
pub mod viz;

/// Every edge counts once, however many manifest lines declare it.
pub const EDGE_WEIGHT: u32 = 1;

/// Direction of an edge as seen from one of its endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Outbound,
    Inbound,
}

/// Per-node back-references to touching edges, labelled with the direction seen from that
/// node. Derived data: it can always be rebuilt from the edge set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectionIndex {
    entries: Vec<Vec<(EdgeIndex, Direction)>>,
}

impl DirectionIndex {
    pub fn from_graph(graph: &DiGraph<ServiceId, ()>) -> Self {
        let mut index = Self::default();
        for node in graph.node_indices() {
            index.ensure_node(node);
        }
        for edge in graph.edge_indices() {
            if let Some((source, target)) = graph.edge_endpoints(edge) {
                index.record(source, target, edge);
            }
        }
        index
    }

    pub(crate) fn ensure_node(&mut self, node: NodeIndex) {
        if self.entries.len() <= node.index() {
            self.entries.resize_with(node.index() + 1, Vec::new);
        }
    }

    pub(crate) fn record(&mut self, source: NodeIndex, target: NodeIndex, edge: EdgeIndex) {
        self.ensure_node(source);
        self.ensure_node(target);
        self.entries[source.index()].push((edge, Direction::Outbound));
        self.entries[target.index()].push((edge, Direction::Inbound));
    }

    pub fn entries(&self, node: NodeIndex) -> &[(EdgeIndex, Direction)] {
        self.entries
            .get(node.index())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Deduplicated service dependency graph. Nodes live in an arena keyed by a string index;
/// edges refer to endpoints by arena slot. Only [`builder::GraphBuilder`] mutates it.
#[derive(Debug, Clone, Default)]
pub struct ServiceGraph {
    pub(crate) inner: DiGraph<ServiceId, ()>,
    pub(crate) index: HashMap<String, NodeIndex>,
    pub(crate) principals: Vec<NodeIndex>,
    pub(crate) principal_set: HashSet<NodeIndex>,
    pub(crate) directions: Option<DirectionIndex>,
}

impl ServiceGraph {
    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    pub fn node_index(&self, id: &str) -> Option<NodeIndex> {
        self.index.get(id).copied()
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn contains_edge(&self, source: &str, target: &str) -> bool {
        match (self.node_index(source), self.node_index(target)) {
            (Some(from), Some(to)) => self.inner.find_edge(from, to).is_some(),
            _ => false,
        }
    }

    pub fn id(&self, node: NodeIndex) -> &str {
        self.inner[node].as_str()
    }

    /// Node ids in insertion order.
    pub fn node_ids(&self) -> impl Iterator<Item = &str> {
        self.inner.node_indices().map(move |node| self.id(node))
    }

    /// `(source, target)` pairs in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner
            .raw_edges()
            .iter()
            .map(move |edge| (self.id(edge.source()), self.id(edge.target())))
    }

    pub fn edge_endpoints(&self, edge: EdgeIndex) -> Option<(&str, &str)> {
        self.inner
            .edge_endpoints(edge)
            .map(|(source, target)| (self.id(source), self.id(target)))
    }

    /// Services discovered as principals, in discovery order.
    pub fn principals(&self) -> impl Iterator<Item = &str> {
        self.principals.iter().map(move |node| self.id(*node))
    }

    pub fn is_principal(&self, id: &str) -> bool {
        self.node_index(id)
            .map(|node| self.principal_set.contains(&node))
            .unwrap_or(false)
    }

    /// The direction index recorded during the build, or one rebuilt from the edges.
    pub fn direction_index(&self) -> Cow<'_, DirectionIndex> {
        match &self.directions {
            Some(index) => Cow::Borrowed(index),
            None => Cow::Owned(DirectionIndex::from_graph(&self.inner)),
        }
    }

    pub fn has_tagged_directions(&self) -> bool {
        self.directions.is_some()
    }
}
