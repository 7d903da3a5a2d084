use std::fmt;
use std::sync::Arc;

use anyhow::Result;
use indexmap::IndexMap;
use ndarray::{Array2, ArrayView1, ArrayView2, Axis};

use crate::config::SamplerConfig;
use crate::error::{SamplingError, SamplingResult};
use crate::forest::max_spanning_forest;
use crate::graph::GraphInstance;
use crate::sampling::topk::top_k_mask;
use crate::subgraph::{PrunePolicy, SubgraphMaskBuilder};

pub const NODE_POLICY: &str = "node";
pub const KHOP_POLICY: &str = "khop_subgraph";
pub const MST_POLICY: &str = "mst";

/// What a per-graph score segment and its mask are indexed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaskDomain {
    Nodes,
    Edges,
}

impl MaskDomain {
    pub fn len(self, graph: &GraphInstance) -> usize {
        match self {
            MaskDomain::Nodes => graph.node_count(),
            MaskDomain::Edges => graph.edge_count(),
        }
    }
}

/// A sampling policy implemented outside this crate.
///
/// Called once per graph and instance with that instance's score column; the
/// returned mask must have one entry per element of [`Self::domain`].
pub trait SamplingStrategy: Send + Sync {
    fn domain(&self) -> MaskDomain;

    fn sample(
        &self,
        graph: &GraphInstance,
        scores: ArrayView1<'_, f64>,
        sample_k: i64,
    ) -> Result<Vec<bool>>;
}

/// Maximum spanning forest over the whole graph, scored per instance.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaxSpanningTreeStrategy;

impl SamplingStrategy for MaxSpanningTreeStrategy {
    fn domain(&self) -> MaskDomain {
        MaskDomain::Edges
    }

    fn sample(
        &self,
        graph: &GraphInstance,
        scores: ArrayView1<'_, f64>,
        _sample_k: i64,
    ) -> Result<Vec<bool>> {
        let weights = scores.to_vec();
        Ok(max_spanning_forest(
            graph.node_count(),
            &graph.edge_index(),
            Some(&weights),
        ))
    }
}

/// Named external strategies available to [`SamplingPolicy::resolve`].
#[derive(Clone, Default)]
pub struct StrategyRegistry {
    strategies: IndexMap<String, Arc<dyn SamplingStrategy>>,
}

impl StrategyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the strategies shipped with this crate.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register(MST_POLICY, MaxSpanningTreeStrategy);
        registry
    }

    pub fn register(&mut self, name: impl Into<String>, strategy: impl SamplingStrategy + 'static) {
        self.strategies.insert(name.into(), Arc::new(strategy));
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn SamplingStrategy>> {
        self.strategies.get(name).cloned()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.strategies.keys().map(String::as_str)
    }
}

impl fmt::Debug for StrategyRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrategyRegistry")
            .field("strategies", &self.strategies.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// The selection rule applied to each graph of a batch.
#[derive(Clone)]
pub enum SamplingPolicy {
    /// Per instance column, the `k` best nodes (ties at the threshold kept).
    NodeTopK { k: i64 },
    /// Neighbourhood of the best node, pruned to a forest or kept whole.
    KHop(SubgraphMaskBuilder),
    External {
        name: String,
        strategy: Arc<dyn SamplingStrategy>,
        sample_k: i64,
    },
}

impl SamplingPolicy {
    /// Turn the configured policy name into a policy, failing on names that
    /// are neither built in nor registered.
    pub fn resolve(config: &SamplerConfig, registry: &StrategyRegistry) -> SamplingResult<Self> {
        match config.policy.as_str() {
            NODE_POLICY => Ok(SamplingPolicy::NodeTopK { k: config.sample_k }),
            KHOP_POLICY => {
                let prune = config.prune_policy.parse::<PrunePolicy>()?;
                let radius = usize::try_from(config.sample_k).map_err(|_| {
                    SamplingError::InvalidConfig(format!(
                        "hop count must be non-negative, got {}",
                        config.sample_k
                    ))
                })?;
                Ok(SamplingPolicy::KHop(SubgraphMaskBuilder::new(radius, prune)))
            }
            name => registry
                .get(name)
                .map(|strategy| SamplingPolicy::External {
                    name: name.to_string(),
                    strategy,
                    sample_k: config.sample_k,
                })
                .ok_or_else(|| SamplingError::UnknownPolicy(name.to_string())),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            SamplingPolicy::NodeTopK { .. } => NODE_POLICY,
            SamplingPolicy::KHop(_) => KHOP_POLICY,
            SamplingPolicy::External { name, .. } => name.as_str(),
        }
    }

    /// Domain the score segments of this policy are indexed by.
    pub fn domain(&self) -> MaskDomain {
        match self {
            SamplingPolicy::NodeTopK { .. } => MaskDomain::Nodes,
            SamplingPolicy::KHop(builder) => match builder.prune() {
                PrunePolicy::MaxSpanningForest => MaskDomain::Edges,
                PrunePolicy::NodeCollection => MaskDomain::Nodes,
            },
            SamplingPolicy::External { strategy, .. } => strategy.domain(),
        }
    }

    /// Mask for one graph's score segment.
    ///
    /// Top-k masks keep the segment's shape (rows × instances), k-hop masks
    /// have one row per instance, external masks one row per domain element.
    pub fn apply(
        &self,
        graph: &GraphInstance,
        segment: ArrayView2<'_, f64>,
    ) -> SamplingResult<Array2<bool>> {
        match self {
            SamplingPolicy::NodeTopK { k } => top_k_mask(segment, *k),
            SamplingPolicy::KHop(builder) => builder.build(graph, segment),
            SamplingPolicy::External {
                name,
                strategy,
                sample_k,
            } => apply_external(name, strategy.as_ref(), graph, segment, *sample_k),
        }
    }
}

impl fmt::Debug for SamplingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SamplingPolicy::NodeTopK { k } => f.debug_struct("NodeTopK").field("k", k).finish(),
            SamplingPolicy::KHop(builder) => f.debug_tuple("KHop").field(builder).finish(),
            SamplingPolicy::External { name, sample_k, .. } => f
                .debug_struct("External")
                .field("name", name)
                .field("sample_k", sample_k)
                .finish(),
        }
    }
}

fn apply_external(
    name: &str,
    strategy: &dyn SamplingStrategy,
    graph: &GraphInstance,
    segment: ArrayView2<'_, f64>,
    sample_k: i64,
) -> SamplingResult<Array2<bool>> {
    let domain = strategy.domain().len(graph);
    if segment.nrows() != domain {
        return Err(SamplingError::Precondition(format!(
            "strategy '{name}' expects {domain} score rows, got {}",
            segment.nrows()
        )));
    }

    let mut mask = Array2::from_elem((domain, segment.ncols()), false);
    for (scores, mut column) in segment.axis_iter(Axis(1)).zip(mask.axis_iter_mut(Axis(1))) {
        let selected = strategy
            .sample(graph, scores, sample_k)
            .map_err(|source| SamplingError::Strategy {
                name: name.to_string(),
                source,
            })?;
        if selected.len() != domain {
            return Err(SamplingError::Precondition(format!(
                "strategy '{name}' returned {} mask entries for a domain of {domain}",
                selected.len()
            )));
        }
        for (slot, keep) in column.iter_mut().zip(selected) {
            *slot = keep;
        }
    }
    Ok(mask)
}
