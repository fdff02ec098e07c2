//! Read-only projections of a finished [`ServiceGraph`].

use serde::Serialize;

use petgraph::graph::NodeIndex;

use crate::graph::{Direction, DirectionIndex, ServiceGraph, EDGE_WEIGHT};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdjacencyMatrix {
    pub nodes: Vec<String>,
    pub matrix: Vec<Vec<u8>>,
}

/// Square matrix over `order`: `matrix[i][j] == 1` when `order[i]` depends on `order[j]`.
///
/// Nodes missing from `order` are not represented, so dependency-only services drop out when
/// the principal order is used. The diagonal is always zero.
pub fn adjacency_matrix<S: AsRef<str>>(graph: &ServiceGraph, order: &[S]) -> AdjacencyMatrix {
    let nodes: Vec<String> = order.iter().map(|id| id.as_ref().to_string()).collect();
    let matrix = nodes
        .iter()
        .map(|from| {
            nodes
                .iter()
                .map(|to| u8::from(from != to && graph.contains_edge(from, to)))
                .collect()
        })
        .collect();
    AdjacencyMatrix { nodes, matrix }
}

pub fn principal_matrix(graph: &ServiceGraph) -> AdjacencyMatrix {
    let order: Vec<&str> = graph.principals().collect();
    adjacency_matrix(graph, &order)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeRecord {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkRecord {
    pub source: String,
    pub target: String,
    pub value: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeLink {
    pub nodes: Vec<NodeRecord>,
    pub links: Vec<LinkRecord>,
}

pub fn node_link(graph: &ServiceGraph) -> NodeLink {
    let nodes = graph
        .node_ids()
        .map(|id| NodeRecord { id: id.to_string() })
        .collect();
    let links = graph
        .edges()
        .map(|(source, target)| LinkRecord {
            source: source.to_string(),
            target: target.to_string(),
            value: EDGE_WEIGHT,
        })
        .collect();
    NodeLink { nodes, links }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EdgeEntry {
    pub source: String,
    pub target: String,
}

/// Edges touching one node: `outbound` where it is the source, `inbound` where it is the
/// target. Both lists follow edge insertion order.
///
/// Label mapping: an `outbound` edge is tagged "used-by" on the edge itself (its target is
/// used by this node), so the text listing prints these targets under "depends on". An
/// `inbound` edge is tagged "depends-on" (its source depends on this node), so its sources
/// print under "used by".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeAdjacency {
    pub id: String,
    pub outbound: Vec<EdgeEntry>,
    pub inbound: Vec<EdgeEntry>,
}

pub fn directional_adjacency(graph: &ServiceGraph) -> Vec<NodeAdjacency> {
    let index = graph.direction_index();
    graph
        .inner
        .node_indices()
        .map(|node| node_adjacency(graph, &index, node))
        .collect()
}

/// Directional entry for a single node, read straight from its direction index slot.
pub fn adjacency_for(graph: &ServiceGraph, id: &str) -> Option<NodeAdjacency> {
    let node = graph.node_index(id)?;
    Some(node_adjacency(graph, &graph.direction_index(), node))
}

fn node_adjacency(graph: &ServiceGraph, index: &DirectionIndex, node: NodeIndex) -> NodeAdjacency {
    let mut entry = NodeAdjacency {
        id: graph.id(node).to_string(),
        outbound: Vec::new(),
        inbound: Vec::new(),
    };
    for (edge, direction) in index.entries(node) {
        let Some((source, target)) = graph.edge_endpoints(*edge) else {
            continue;
        };
        let item = EdgeEntry {
            source: source.to_string(),
            target: target.to_string(),
        };
        match direction {
            Direction::Outbound => entry.outbound.push(item),
            Direction::Inbound => entry.inbound.push(item),
        }
    }
    entry
}
