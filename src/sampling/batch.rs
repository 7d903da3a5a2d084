use std::ops::Range;
use std::sync::Arc;

use crate::error::{SamplingError, SamplingResult};
use crate::graph::GraphInstance;
use crate::sampling::policy::MaskDomain;

/// Graphs of one batch together with the number of score rows each owns.
#[derive(Debug, Clone)]
pub struct GraphBatch {
    graphs: Vec<Arc<GraphInstance>>,
    sizes: Vec<usize>,
}

impl GraphBatch {
    /// `sizes[i]` is the length of graph `i`'s contiguous score segment.
    pub fn new(graphs: Vec<Arc<GraphInstance>>, sizes: Vec<usize>) -> SamplingResult<Self> {
        if graphs.len() != sizes.len() {
            return Err(SamplingError::BoundaryCount {
                graphs: graphs.len(),
                boundaries: sizes.len(),
            });
        }
        Ok(Self { graphs, sizes })
    }

    /// Sizes taken from each graph's node or edge count.
    pub fn for_domain(graphs: Vec<Arc<GraphInstance>>, domain: MaskDomain) -> Self {
        let sizes = graphs.iter().map(|graph| domain.len(graph)).collect();
        Self { graphs, sizes }
    }

    pub fn len(&self) -> usize {
        self.graphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graphs.is_empty()
    }

    pub fn graphs(&self) -> &[Arc<GraphInstance>] {
        &self.graphs
    }

    pub fn sizes(&self) -> &[usize] {
        &self.sizes
    }

    pub fn total_size(&self) -> usize {
        self.sizes.iter().sum()
    }

    /// Row range of every graph's segment, in graph order.
    pub fn segments(&self) -> Vec<Range<usize>> {
        let mut start = 0;
        self.sizes
            .iter()
            .map(|&size| {
                let range = start..start + size;
                start += size;
                range
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn isolated(n: usize) -> Arc<GraphInstance> {
        Arc::new(GraphInstance::from_edge_index(n, &[]).expect("graph"))
    }

    #[test]
    fn segments_are_contiguous() {
        let batch = GraphBatch::for_domain(vec![isolated(2), isolated(3), isolated(1)], MaskDomain::Nodes);
        assert_eq!(batch.sizes(), &[2, 3, 1]);
        assert_eq!(batch.total_size(), 6);
        assert_eq!(batch.segments(), vec![0..2, 2..5, 5..6]);
    }

    #[test]
    fn size_count_must_match_graph_count() {
        let err = GraphBatch::new(vec![isolated(2)], vec![2, 2]).expect_err("count");
        assert!(err.is_configuration());
    }
}
