use std::fmt;
use std::str::FromStr;

use log::trace;
use ndarray::{Array2, ArrayView1, ArrayView2, Axis};

use crate::error::{SamplingError, SamplingResult};
use crate::forest::max_spanning_forest;
use crate::graph::GraphInstance;
use crate::neighborhood::{KHopExtractor, NeighborhoodExtractor};

/// How a k-hop neighbourhood is turned into a mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrunePolicy {
    /// Keep a maximum spanning forest of the neighbourhood; edge-domain masks.
    MaxSpanningForest,
    /// Keep every node of the neighbourhood; node-domain masks.
    NodeCollection,
}

impl FromStr for PrunePolicy {
    type Err = SamplingError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "mst" | "forest" => Ok(PrunePolicy::MaxSpanningForest),
            "none" | "nodes" => Ok(PrunePolicy::NodeCollection),
            other => Err(SamplingError::UnsupportedPrunePolicy(other.to_string())),
        }
    }
}

impl fmt::Display for PrunePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrunePolicy::MaxSpanningForest => f.write_str("mst"),
            PrunePolicy::NodeCollection => f.write_str("none"),
        }
    }
}

/// Builds one mask per sampling instance around the highest-scoring node.
#[derive(Debug, Clone)]
pub struct SubgraphMaskBuilder<E = KHopExtractor> {
    extractor: E,
    radius: usize,
    prune: PrunePolicy,
}

impl SubgraphMaskBuilder<KHopExtractor> {
    pub fn new(radius: usize, prune: PrunePolicy) -> Self {
        Self::with_extractor(KHopExtractor, radius, prune)
    }
}

impl<E: NeighborhoodExtractor> SubgraphMaskBuilder<E> {
    pub fn with_extractor(extractor: E, radius: usize, prune: PrunePolicy) -> Self {
        Self {
            extractor,
            radius,
            prune,
        }
    }

    pub fn radius(&self) -> usize {
        self.radius
    }

    pub fn prune(&self) -> PrunePolicy {
        self.prune
    }

    /// Number of rows `weights` must have for `graph`.
    pub fn domain_len(&self, graph: &GraphInstance) -> usize {
        match self.prune {
            PrunePolicy::MaxSpanningForest => graph.edge_count(),
            PrunePolicy::NodeCollection => graph.node_count(),
        }
    }

    /// `weights` holds one row per edge (forest mode) or node (collection
    /// mode) and one column per instance. The result has one row per instance.
    pub fn build(
        &self,
        graph: &GraphInstance,
        weights: ArrayView2<'_, f64>,
    ) -> SamplingResult<Array2<bool>> {
        let domain = self.domain_len(graph);
        if weights.nrows() != domain {
            return Err(SamplingError::Precondition(format!(
                "{} weight rows for a {} domain of size {domain}",
                weights.nrows(),
                self.prune
            )));
        }

        let edge_index = graph.edge_index();
        let node_weights = match self.prune {
            PrunePolicy::MaxSpanningForest => {
                scatter_by_source(&edge_index, weights, graph.node_count())
            }
            PrunePolicy::NodeCollection => weights.to_owned(),
        };

        let instances = weights.ncols();
        let mut masks = Array2::from_elem((instances, domain), false);
        for (instance, mut row) in masks.axis_iter_mut(Axis(0)).enumerate() {
            let Some(seed) = first_argmax(node_weights.column(instance)) else {
                continue;
            };
            let hood = self.extractor.extract(graph, &[seed], self.radius)?;
            match self.prune {
                PrunePolicy::MaxSpanningForest => {
                    let positions: Vec<usize> = hood.edge_positions().collect();
                    let column = weights.column(instance);
                    let local_weights: Vec<f64> =
                        positions.iter().map(|&position| column[position]).collect();
                    let local = max_spanning_forest(
                        graph.node_count(),
                        &hood.edges,
                        Some(&local_weights),
                    );
                    for (&position, selected) in positions.iter().zip(local) {
                        row[position] = selected;
                    }
                }
                PrunePolicy::NodeCollection => {
                    for &node in &hood.nodes {
                        row[node] = true;
                    }
                }
            }
            trace!(
                "Instance {instance}: seed {seed}, {} nodes, {} edges in neighbourhood",
                hood.nodes.len(),
                hood.edges.len()
            );
        }

        Ok(masks)
    }
}

/// Sum edge weights onto their source node, one column per instance.
/// Rows cover all `node_count` nodes; nodes without out-edges stay at 0.
fn scatter_by_source(
    edge_index: &[(usize, usize)],
    weights: ArrayView2<'_, f64>,
    node_count: usize,
) -> Array2<f64> {
    let mut sums = Array2::<f64>::zeros((node_count, weights.ncols()));
    for (&(source, _), row) in edge_index.iter().zip(weights.axis_iter(Axis(0))) {
        let mut target = sums.row_mut(source);
        target += &row;
    }
    sums
}

/// First index holding the maximum; `None` for an empty column.
fn first_argmax(values: ArrayView1<'_, f64>) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, &value) in values.iter().enumerate() {
        match best {
            Some((_, current)) if value.total_cmp(&current).is_le() => {}
            _ => best = Some((idx, value)),
        }
    }
    best.map(|(idx, _)| idx)
}

#[cfg(test)]
mod tests {
    use ndarray::{Array1, array};

    use super::*;

    fn undirected(n: usize, pairs: &[(usize, usize)]) -> GraphInstance {
        let mut edges = Vec::new();
        for &(u, v) in pairs {
            edges.push((u, v));
            edges.push((v, u));
        }
        GraphInstance::from_edge_index(n, &edges).expect("graph")
    }

    #[test]
    fn prune_policy_names() {
        assert_eq!("mst".parse::<PrunePolicy>().ok(), Some(PrunePolicy::MaxSpanningForest));
        assert_eq!("none".parse::<PrunePolicy>().ok(), Some(PrunePolicy::NodeCollection));
        let err = "steiner".parse::<PrunePolicy>().expect_err("unsupported");
        assert!(err.is_configuration());
    }

    #[test]
    fn argmax_prefers_first_maximum() {
        assert_eq!(first_argmax(array![1.0, 3.0, 3.0, 2.0].view()), Some(1));
        assert_eq!(first_argmax(Array1::<f64>::zeros(0).view()), None);
    }

    #[test]
    fn scatter_sums_outgoing_edge_weights() {
        let edges = [(0, 1), (1, 0), (1, 2), (2, 1)];
        let weights = array![[1.0], [2.0], [3.0], [4.0]];
        let sums = scatter_by_source(&edges, weights.view(), 3);
        assert_eq!(sums, array![[1.0], [5.0], [4.0]]);
    }

    #[test]
    fn scatter_keeps_a_row_for_nodes_without_out_edges() {
        let edges = [(0, 1), (1, 2)];
        let weights = array![[-1.0], [-2.0]];
        let sums = scatter_by_source(&edges, weights.view(), 4);
        assert_eq!(sums, array![[-1.0], [-2.0], [0.0], [0.0]]);
        assert_eq!(first_argmax(sums.column(0)), Some(2));
    }

    #[test]
    fn node_collection_marks_the_neighbourhood_of_the_best_node() {
        let graph = undirected(5, &[(0, 1), (1, 2), (2, 3), (3, 4)]);
        let builder = SubgraphMaskBuilder::new(1, PrunePolicy::NodeCollection);
        let weights = array![[0.0, 9.0], [0.0, 0.0], [0.0, 0.0], [5.0, 0.0], [0.0, 0.0]];
        let masks = builder.build(&graph, weights.view()).expect("masks");
        assert_eq!(masks.dim(), (2, 5));
        assert_eq!(masks.row(0).to_vec(), vec![false, false, true, true, true]);
        assert_eq!(masks.row(1).to_vec(), vec![true, true, false, false, false]);
    }

    #[test]
    fn forest_mode_drops_the_lightest_cycle_edge() {
        // triangle 0-1-2 with a tail 2-3; edges in both directions
        let graph = undirected(4, &[(0, 1), (1, 2), (0, 2), (2, 3)]);
        let builder = SubgraphMaskBuilder::new(1, PrunePolicy::MaxSpanningForest);
        let weights = array![[5.0], [5.0], [4.0], [4.0], [1.0], [1.0], [0.5], [0.5]];
        let masks = builder.build(&graph, weights.view()).expect("masks");
        // seed is node 1 (5 + 4); its 1-hop neighbourhood is the triangle
        assert_eq!(
            masks.row(0).to_vec(),
            vec![true, true, true, true, false, false, false, false]
        );
    }

    #[test]
    fn weight_rows_must_match_the_domain() {
        let graph = undirected(3, &[(0, 1)]);
        let builder = SubgraphMaskBuilder::new(1, PrunePolicy::MaxSpanningForest);
        let weights = Array2::<f64>::zeros((3, 1));
        let err = builder.build(&graph, weights.view()).expect_err("rows");
        assert!(matches!(err, SamplingError::Precondition(_)));
    }
}
