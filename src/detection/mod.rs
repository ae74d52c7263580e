pub mod annotate;
pub mod clustering;
pub mod corners;
pub mod dedup;
pub mod font;
pub mod mask;
pub mod ordering;
pub mod preprocessing;
pub mod steps;
pub mod topology;

use std::sync::Arc;

use crate::config::DetectionParams;
use crate::pipeline::Pipeline;
use steps::{ClusterMergeStep, DuplicateSuppressionStep};

/// Candidate points -> cluster centroids
pub fn build_merge_pipeline(params: &DetectionParams) -> Pipeline {
    Pipeline::new().add_step(Arc::new(ClusterMergeStep {
        merge_radius: params.merge_radius,
        max_rounds: clustering::MAX_MERGE_ROUNDS,
    }))
}

/// Cluster centroids -> deduplicated points (wide pass, then tight pass)
pub fn build_refine_pipeline(params: &DetectionParams) -> Pipeline {
    Pipeline::new()
        .add_step(Arc::new(DuplicateSuppressionStep {
            min_distance: params.min_distance,
        }))
        .add_step(Arc::new(DuplicateSuppressionStep {
            min_distance: params.tight_min_distance(),
        }))
}
