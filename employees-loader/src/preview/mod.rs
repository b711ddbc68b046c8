// Preview module - evaluates the imports in memory for dry runs
pub mod graph_model;
pub mod source;

pub use graph_model::{GraphModel, NodeLabel, RelationshipType};
pub use source::PreviewData;
