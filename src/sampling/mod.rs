pub mod batch;
pub mod dispatcher;
pub mod mask;
pub mod noise;
pub mod policy;
pub mod topk;

pub use batch::GraphBatch;
pub use dispatcher::BatchSampler;
pub use mask::{BatchMask, MaskDocument, MaskLayout};
pub use policy::{
    MaskDomain, MaxSpanningTreeStrategy, SamplingPolicy, SamplingStrategy, StrategyRegistry,
};
pub use topk::{effective_k, top_k_mask};
