mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from vertexenum for tests
pub use vertexenum::{
    Classification, Config, DetectionParams, Point, RenderParams, Session, Subset, VertexError,
};
