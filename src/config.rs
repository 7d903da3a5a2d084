use serde::{Deserialize, Serialize};

/// Sampler settings as handed over by the owning training process.
///
/// `policy` and `prune_policy` are resolved into typed policies by
/// [`crate::BatchSampler::new`]; an unknown name fails there, not on the
/// first batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    /// `node`, `khop_subgraph`, or the name of a registered strategy.
    pub policy: String,
    /// Pruning of k-hop neighbourhoods: `mst` or `none`.
    pub prune_policy: String,
    /// Top-k size for `node` (negative counts from the graph size), hop count
    /// for `khop_subgraph`, passed through to external strategies.
    pub sample_k: i64,
    /// Add graph-local noise to the scores before selecting.
    pub perturb: bool,
    /// Ignore the scores and sample from standard-normal draws instead.
    pub sample_rand: bool,
    /// Return one mask per graph instead of a single stacked matrix.
    pub return_list: bool,
    /// Seed for perturbation and random scores; time-derived when unset.
    pub seed: Option<u64>,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            policy: "node".to_string(),
            prune_policy: "mst".to_string(),
            sample_k: 15,
            perturb: false,
            sample_rand: false,
            return_list: false,
            seed: None,
        }
    }
}
