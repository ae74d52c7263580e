pub mod config;
pub mod detection;
pub mod error;
pub mod export;
pub mod models;
pub mod pipeline;
pub mod session;

pub use config::{Config, CornerDetectorKind, DetectionParams, RenderParams};
pub use detection::clustering::{
    MAX_MERGE_ROUNDS, MergeOutcome, merge_clusters, merge_clusters_capped,
};
pub use detection::corners::{CornerDetector, FastCornerDetector, HarrisCornerDetector};
pub use detection::dedup::suppress_duplicates;
pub use detection::mask::{EdgeMask, extract_edge_mask};
pub use detection::ordering::{order_grid, order_rows};
pub use detection::topology::{Classification, classify_vertices};
pub use error::{Result, VertexError};
pub use models::{LabelColor, Point, Subset, VertexClass};
pub use pipeline::{MetadataValue, Pipeline, PipelineContext, PipelineData, PipelineStep};
pub use session::{Rendering, Session, Summary};
