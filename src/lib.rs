pub mod config;
pub mod error;
pub mod forest;
pub mod graph;
pub mod neighborhood;
pub mod request;
pub mod sampling;
pub mod subgraph;

pub use config::SamplerConfig;
pub use error::{SamplingError, SamplingResult};
pub use forest::{ComponentLabeler, DisjointSetLabeler, LinearLabeler, max_spanning_forest};
pub use graph::{GraphInstance, GraphLoader};
pub use neighborhood::{KHopExtractor, Neighborhood, NeighborhoodExtractor};
pub use request::BatchRequest;
pub use sampling::{
    BatchMask, BatchSampler, GraphBatch, MaskDomain, SamplingPolicy, SamplingStrategy,
    StrategyRegistry,
};
pub use subgraph::{PrunePolicy, SubgraphMaskBuilder};
