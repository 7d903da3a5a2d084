use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use ndarray::Array2;
use serde::Deserialize;

use crate::config::SamplerConfig;
use crate::graph::{GraphLoader, RawGraph};
use crate::sampling::{GraphBatch, MaskDomain};

/// One sampling call described as JSON: configuration, graphs, and the score
/// rows of the whole batch (one inner vector per node or edge).
#[derive(Debug, Clone, Deserialize)]
pub struct BatchRequest {
    #[serde(default)]
    pub config: SamplerConfig,
    pub graphs: Vec<RawGraph>,
    pub scores: Vec<Vec<f64>>,
    /// Segment sizes; derived from the policy's domain when absent.
    #[serde(default)]
    pub boundaries: Option<Vec<usize>>,
}

impl BatchRequest {
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("parse batch request")
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let json =
            fs::read_to_string(path).with_context(|| format!("read batch request {:?}", path))?;
        Self::from_json_str(&json).with_context(|| format!("load batch request {:?}", path))
    }

    pub fn graph_batch(&self, domain: MaskDomain) -> Result<GraphBatch> {
        let graphs = self
            .graphs
            .iter()
            .enumerate()
            .map(|(idx, raw)| {
                GraphLoader::from_raw(raw.clone())
                    .map(Arc::new)
                    .with_context(|| format!("build graph {idx} of batch request"))
            })
            .collect::<Result<Vec<_>>>()?;

        match &self.boundaries {
            Some(sizes) => Ok(GraphBatch::new(graphs, sizes.clone())?),
            None => Ok(GraphBatch::for_domain(graphs, domain)),
        }
    }

    pub fn score_matrix(&self) -> Result<Array2<f64>> {
        let rows = self.scores.len();
        let cols = self.scores.first().map(Vec::len).unwrap_or_default();
        if let Some((idx, row)) = self.scores.iter().enumerate().find(|(_, row)| row.len() != cols) {
            return Err(anyhow!(
                "score row {idx} has {} instances, expected {cols}",
                row.len()
            ));
        }
        let flat: Vec<f64> = self.scores.iter().flatten().copied().collect();
        Ok(Array2::from_shape_vec((rows, cols), flat)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REQUEST: &str = r#"{
        "config": {"policy": "node", "sample_k": 1, "return_list": true},
        "graphs": [
            {"nodes": [{"id": "a"}, {"id": "b"}], "edges": [{"source": "a", "target": "b"}]},
            {"nodes": [{"id": "c"}], "edges": []}
        ],
        "scores": [[0.1, 0.9], [0.5, 0.2], [1.0, 1.0]]
    }"#;

    #[test]
    fn boundaries_default_to_the_domain() {
        let request = BatchRequest::from_json_str(REQUEST).expect("request");
        assert!(request.config.return_list);
        let nodes = request.graph_batch(MaskDomain::Nodes).expect("batch");
        assert_eq!(nodes.sizes(), &[2, 1]);
        let edges = request.graph_batch(MaskDomain::Edges).expect("batch");
        assert_eq!(edges.sizes(), &[2, 0]);
    }

    #[test]
    fn scores_become_a_row_major_matrix() {
        let request = BatchRequest::from_json_str(REQUEST).expect("request");
        let scores = request.score_matrix().expect("scores");
        assert_eq!(scores.dim(), (3, 2));
        assert_eq!(scores[(0, 1)], 0.9);
    }

    #[test]
    fn ragged_scores_are_rejected() {
        let mut request = BatchRequest::from_json_str(REQUEST).expect("request");
        request.scores[1].push(0.0);
        assert!(request.score_matrix().is_err());
    }

    #[test]
    fn explicit_boundaries_are_validated() {
        let mut request = BatchRequest::from_json_str(REQUEST).expect("request");
        request.boundaries = Some(vec![3]);
        assert!(request.graph_batch(MaskDomain::Nodes).is_err());
    }
}
