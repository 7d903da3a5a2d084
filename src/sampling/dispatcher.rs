use std::sync::atomic::{AtomicU64, Ordering};

use log::{debug, trace};
use ndarray::{Array2, ArrayView2, Axis, CowArray, concatenate, s};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use rayon::prelude::*;

use crate::config::SamplerConfig;
use crate::error::{SamplingError, SamplingResult};
use crate::sampling::batch::GraphBatch;
use crate::sampling::mask::BatchMask;
use crate::sampling::noise;
use crate::sampling::policy::{MaskDomain, SamplingPolicy, StrategyRegistry};

/// Splits batch scores per graph, applies the configured policy and
/// reassembles the masks.
///
/// Configuration only changes through `&mut self` ([`Self::reconfigure`]),
/// while [`Self::sample`] borrows immutably, so a configuration change can
/// never interleave with a running call.
///
/// Every call draws new noise. With a fixed seed the sequence of calls is
/// reproducible: two samplers built from the same configuration produce the
/// same masks call for call.
#[derive(Debug)]
pub struct BatchSampler {
    config: SamplerConfig,
    policy: SamplingPolicy,
    registry: StrategyRegistry,
    calls: AtomicU64,
}

impl Clone for BatchSampler {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            policy: self.policy.clone(),
            registry: self.registry.clone(),
            calls: AtomicU64::new(self.calls.load(Ordering::Relaxed)),
        }
    }
}

impl BatchSampler {
    pub fn new(config: SamplerConfig, registry: StrategyRegistry) -> SamplingResult<Self> {
        let policy = SamplingPolicy::resolve(&config, &registry)?;
        debug!("Sampler configured with policy {policy:?}");
        Ok(Self {
            config,
            policy,
            registry,
            calls: AtomicU64::new(0),
        })
    }

    /// Swap in a new configuration and restart the noise sequence. On error
    /// the previous configuration stays active.
    pub fn reconfigure(&mut self, config: SamplerConfig) -> SamplingResult<()> {
        let policy = SamplingPolicy::resolve(&config, &self.registry)?;
        debug!("Sampler reconfigured with policy {policy:?}");
        self.config = config;
        self.policy = policy;
        *self.calls.get_mut() = 0;
        Ok(())
    }

    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    pub fn policy(&self) -> &SamplingPolicy {
        &self.policy
    }

    /// Domain each graph's score segment must be indexed by.
    pub fn domain(&self) -> MaskDomain {
        self.policy.domain()
    }

    /// Sample masks for every graph of `batch`.
    ///
    /// `scores` has one row per node or edge of the batch, graphs stacked in
    /// order, and one column per sampling instance.
    pub fn sample(
        &self,
        batch: &GraphBatch,
        scores: ArrayView2<'_, f64>,
    ) -> SamplingResult<BatchMask> {
        let call = self.calls.fetch_add(1, Ordering::Relaxed);
        let base_seed = call_seed(self.config.seed.unwrap_or_else(random_seed), call);
        let scores: CowArray<'_, f64, _> = if self.config.sample_rand {
            let mut rng = Xoshiro256PlusPlus::seed_from_u64(base_seed);
            noise::standard_normal(scores.dim(), &mut rng).into()
        } else {
            scores.into()
        };

        let expected = batch.total_size();
        if expected != scores.nrows() {
            return Err(SamplingError::BoundaryMismatch {
                expected,
                actual: scores.nrows(),
            });
        }

        debug!(
            "Sampling {} graphs ({} rows, {} instances) with policy {}",
            batch.len(),
            scores.nrows(),
            scores.ncols(),
            self.policy.name()
        );

        let segments = batch.segments();
        let masks = segments
            .into_par_iter()
            .zip(batch.graphs().par_iter())
            .enumerate()
            .map(|(index, (rows, graph))| {
                let segment = scores.slice(s![rows, ..]);
                let mask = if self.config.perturb {
                    // stream seeded by graph index, not by worker
                    let mut rng =
                        Xoshiro256PlusPlus::seed_from_u64(base_seed.wrapping_add(index as u64 + 1));
                    let perturbed = noise::perturb(segment, &mut rng);
                    self.policy.apply(graph, perturbed.view())?
                } else {
                    self.policy.apply(graph, segment)?
                };
                trace!("Graph {index}: mask shape {:?}", mask.dim());
                Ok::<_, SamplingError>(mask)
            })
            .collect::<SamplingResult<Vec<_>>>()?;

        if self.config.return_list {
            Ok(BatchMask::List(masks))
        } else {
            stack(masks).map(BatchMask::Stacked)
        }
    }
}

fn stack(masks: Vec<Array2<bool>>) -> SamplingResult<Array2<bool>> {
    let Some(width) = masks.first().map(|mask| mask.ncols()) else {
        return Ok(Array2::from_elem((0, 0), false));
    };
    if let Some(other) = masks.iter().find(|mask| mask.ncols() != width) {
        return Err(SamplingError::InvalidConfig(format!(
            "stacking needs equal mask widths, found {width} and {}; sample with return_list",
            other.ncols()
        )));
    }
    let views: Vec<_> = masks.iter().map(|mask| mask.view()).collect();
    concatenate(Axis(0), &views).map_err(|err| SamplingError::InvalidConfig(err.to_string()))
}

/// Seed of the `call`-th sampling call. Graph streams within a call use
/// consecutive offsets from it, so calls are spread far apart.
fn call_seed(seed: u64, call: u64) -> u64 {
    seed.wrapping_add(call.wrapping_mul(0x9E37_79B9_7F4A_7C15))
}

fn random_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    // low 64 bits
    nanos as u64
}
