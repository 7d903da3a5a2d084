pub mod construction;
pub mod model;

pub use construction::GraphLoader;
pub use model::{GraphId, GraphInstance, RawEdge, RawGraph, RawNode, SampleGraph};
