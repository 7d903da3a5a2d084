use std::collections::VecDeque;

use indexmap::IndexSet;
use petgraph::Direction;
use petgraph::prelude::NodeIndex;

use crate::error::{SamplingError, SamplingResult};
use crate::graph::GraphInstance;

/// Nodes and edges around a seed set, in original graph ids.
#[derive(Debug, Clone, PartialEq)]
pub struct Neighborhood {
    /// Node positions in ascending order.
    pub nodes: Vec<usize>,
    /// Retained edges in original edge order, not relabelled.
    pub edges: Vec<(usize, usize)>,
    /// One flag per edge of the original graph, set exactly at retained edges.
    pub edge_mask: Vec<bool>,
}

impl Neighborhood {
    /// Positions of the retained edges within the original edge list.
    pub fn edge_positions(&self) -> impl Iterator<Item = usize> + '_ {
        self.edge_mask
            .iter()
            .enumerate()
            .filter_map(|(position, &kept)| kept.then_some(position))
    }
}

pub trait NeighborhoodExtractor {
    fn extract(
        &self,
        graph: &GraphInstance,
        seeds: &[usize],
        radius: usize,
    ) -> SamplingResult<Neighborhood>;
}

/// k-hop neighbourhood following message flow from source to target: each hop
/// adds the sources of edges pointing into the current frontier. The edge set
/// is the subgraph induced by the collected nodes.
#[derive(Debug, Clone, Copy, Default)]
pub struct KHopExtractor;

impl NeighborhoodExtractor for KHopExtractor {
    fn extract(
        &self,
        graph: &GraphInstance,
        seeds: &[usize],
        radius: usize,
    ) -> SamplingResult<Neighborhood> {
        let node_count = graph.node_count();
        if let Some(&bad) = seeds.iter().find(|&&seed| seed >= node_count) {
            return Err(SamplingError::Precondition(format!(
                "seed node {bad} out of range for {node_count} nodes"
            )));
        }

        let visited = bfs_collect(graph, seeds, radius);
        let mut inside = vec![false; node_count];
        for node in &visited {
            inside[*node] = true;
        }
        let mut nodes: Vec<usize> = visited.into_iter().collect();
        nodes.sort_unstable();

        let edge_index = graph.edge_index();
        let edge_mask: Vec<bool> = edge_index
            .iter()
            .map(|&(source, target)| inside[source] && inside[target])
            .collect();
        let edges = edge_index
            .into_iter()
            .zip(&edge_mask)
            .filter_map(|(edge, &kept)| kept.then_some(edge))
            .collect();

        Ok(Neighborhood {
            nodes,
            edges,
            edge_mask,
        })
    }
}

fn bfs_collect(graph: &GraphInstance, seeds: &[usize], radius: usize) -> IndexSet<usize> {
    let mut visited = IndexSet::new();
    let mut queue = VecDeque::new();
    for &seed in seeds {
        if visited.insert(seed) {
            queue.push_back((seed, 0usize));
        }
    }

    while let Some((node, depth)) = queue.pop_front() {
        if depth >= radius {
            continue;
        }
        for neighbor in graph
            .graph
            .neighbors_directed(NodeIndex::new(node), Direction::Incoming)
        {
            if visited.insert(neighbor.index()) {
                queue.push_back((neighbor.index(), depth + 1));
            }
        }
    }

    visited
}

#[cfg(test)]
mod tests {
    use super::*;

    fn undirected_path(n: usize) -> GraphInstance {
        let mut edges = Vec::new();
        for i in 0..n - 1 {
            edges.push((i, i + 1));
            edges.push((i + 1, i));
        }
        GraphInstance::from_edge_index(n, &edges).expect("path graph")
    }

    #[test]
    fn radius_bounds_the_node_set() {
        let graph = undirected_path(6);
        let hood = KHopExtractor.extract(&graph, &[2], 1).expect("extract");
        assert_eq!(hood.nodes, vec![1, 2, 3]);
        assert_eq!(hood.edges, vec![(1, 2), (2, 1), (2, 3), (3, 2)]);
        assert_eq!(hood.edge_mask.len(), graph.edge_count());
        assert_eq!(hood.edge_positions().collect::<Vec<_>>(), vec![2, 3, 4, 5]);
    }

    #[test]
    fn zero_radius_keeps_only_the_seed() {
        let graph = undirected_path(4);
        let hood = KHopExtractor.extract(&graph, &[3], 0).expect("extract");
        assert_eq!(hood.nodes, vec![3]);
        assert!(hood.edges.is_empty());
        assert!(hood.edge_mask.iter().all(|kept| !kept));
    }

    #[test]
    fn flow_follows_incoming_edges() {
        // 0 -> 1 -> 2: only upstream nodes reach the seed
        let graph = GraphInstance::from_edge_index(3, &[(0, 1), (1, 2)]).expect("graph");
        let hood = KHopExtractor.extract(&graph, &[1], 2).expect("extract");
        assert_eq!(hood.nodes, vec![0, 1]);
        assert_eq!(hood.edge_mask, vec![true, false]);
    }

    #[test]
    fn induced_edges_between_far_nodes_are_kept() {
        // triangle plus tail; radius 1 from 0 reaches 1 and 2, and edge 1-2 is induced
        let graph = GraphInstance::from_edge_index(
            4,
            &[(0, 1), (1, 0), (0, 2), (2, 0), (1, 2), (2, 1), (2, 3), (3, 2)],
        )
        .expect("graph");
        let hood = KHopExtractor.extract(&graph, &[0], 1).expect("extract");
        assert_eq!(hood.nodes, vec![0, 1, 2]);
        assert_eq!(hood.edges.len(), 6);
        assert!(!hood.edge_mask[6] && !hood.edge_mask[7]);
    }

    #[test]
    fn out_of_range_seed_is_a_precondition_error() {
        let graph = undirected_path(3);
        let err = KHopExtractor.extract(&graph, &[7], 1).expect_err("bad seed");
        assert!(matches!(err, SamplingError::Precondition(_)));
    }
}
