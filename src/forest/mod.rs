pub mod kruskal;
pub mod labeler;

pub use kruskal::{max_spanning_forest, max_spanning_forest_with};
pub use labeler::{ComponentId, ComponentLabeler, DisjointSetLabeler, LinearLabeler};
