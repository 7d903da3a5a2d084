use anyhow::{Result, anyhow};
use indexmap::IndexMap;
use petgraph::graph::NodeIndex;

use crate::graph::model::{GraphId, GraphInstance, RawGraph, SampleGraph};

/// Turns JSON graph descriptions into in-memory graphs.
#[derive(Debug, Default)]
pub struct GraphLoader;

impl GraphLoader {
    /// Parse a JSON string into a graph instance.
    pub fn from_json_str(json: &str) -> Result<GraphInstance> {
        let raw: RawGraph = serde_json::from_str(json)?;
        Self::from_raw(raw)
    }

    /// Build a graph from its raw description. Node positions follow the
    /// order of `nodes`; undirected edges are stored in both directions, the
    /// forward copy first.
    pub fn from_raw(raw: RawGraph) -> Result<GraphInstance> {
        let mut graph = SampleGraph::with_capacity(raw.nodes.len(), raw.edges.len() * 2);
        let mut node_lookup: IndexMap<GraphId, NodeIndex> = IndexMap::new();

        for raw_node in raw.nodes {
            let idx = graph.add_node(());
            if node_lookup.insert(raw_node.id.clone(), idx).is_some() {
                return Err(anyhow!("Duplicate node id: {}", raw_node.id));
            }
        }

        for raw_edge in raw.edges {
            let source_idx = *node_lookup
                .get(&raw_edge.source)
                .ok_or_else(|| anyhow!("Unknown source node id: {}", raw_edge.source))?;
            let target_idx = *node_lookup
                .get(&raw_edge.target)
                .ok_or_else(|| anyhow!("Unknown target node id: {}", raw_edge.target))?;

            graph.add_edge(source_idx, target_idx, ());
            if !raw.directed && source_idx != target_idx {
                graph.add_edge(target_idx, source_idx, ());
            }
        }

        Ok(GraphInstance { graph })
    }
}
