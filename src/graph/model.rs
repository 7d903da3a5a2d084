use petgraph::graph::{Graph, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};

use crate::error::{SamplingError, SamplingResult};

pub type GraphId = String;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawGraph {
    pub nodes: Vec<RawNode>,
    pub edges: Vec<RawEdge>,
    #[serde(default)]
    pub directed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawNode {
    pub id: GraphId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawEdge {
    pub source: GraphId,
    pub target: GraphId,
}

/// Topology only: node and edge payloads are carried in score rows.
pub type SampleGraph = Graph<(), ()>;

/// A graph as seen by the sampler.
///
/// Node positions are the petgraph indices `0..node_count()`; the edge list is
/// the petgraph edge order, which is the order every edge-domain score vector
/// and mask refers to. Undirected graphs carry each edge in both directions.
#[derive(Debug, Clone)]
pub struct GraphInstance {
    pub graph: SampleGraph,
}

impl GraphInstance {
    /// Build a graph straight from a directed edge index, the way batched
    /// graph data usually arrives.
    pub fn from_edge_index(num_nodes: usize, edges: &[(usize, usize)]) -> SamplingResult<Self> {
        let mut graph = SampleGraph::with_capacity(num_nodes, edges.len());
        for _ in 0..num_nodes {
            graph.add_node(());
        }

        for &(source, target) in edges {
            if source >= num_nodes || target >= num_nodes {
                return Err(SamplingError::Precondition(format!(
                    "edge ({source}, {target}) out of range for {num_nodes} nodes"
                )));
            }
            graph.add_edge(NodeIndex::new(source), NodeIndex::new(target), ());
        }

        Ok(Self { graph })
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Edge endpoints as node positions, in edge order.
    pub fn edge_index(&self) -> Vec<(usize, usize)> {
        self.graph
            .edge_references()
            .map(|edge| (edge.source().index(), edge.target().index()))
            .collect()
    }
}
