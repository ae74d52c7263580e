use crate::detection::{clustering, dedup};
use crate::error::Result;
use crate::pipeline::{MetadataValue, PipelineContext, PipelineData, PipelineStep};

/// Metadata key: rounds executed by the cluster merger
pub const MERGE_ROUNDS: &str = "merge_rounds";
/// Metadata key: whether merging stopped on its own before the round cap
pub const MERGE_CONVERGED: &str = "merge_converged";

/// Collapse mutually-close candidates into cluster centroids
pub struct ClusterMergeStep {
    pub merge_radius: f64,
    pub max_rounds: usize,
}

impl PipelineStep for ClusterMergeStep {
    fn process(&self, data: PipelineData, _context: &PipelineContext) -> Result<PipelineData> {
        let outcome =
            clustering::merge_clusters_capped(&data.points, self.merge_radius, self.max_rounds);
        if !outcome.converged {
            tracing::warn!(
                rounds = outcome.rounds,
                "cluster merge hit the round cap; centroids may be closer than the merge radius"
            );
        }

        let merged = PipelineData {
            points: outcome.centroids,
            original: data.original.clone(),
            metadata: data.metadata.clone(),
        };
        Ok(merged
            .with_metadata(MERGE_ROUNDS, MetadataValue::Int(outcome.rounds as i64))
            .with_metadata(MERGE_CONVERGED, MetadataValue::Bool(outcome.converged)))
    }

    fn name(&self) -> &str {
        "Cluster Merge"
    }
}

/// Drop points closer than `min_distance` to an earlier point in (y, x) order
pub struct DuplicateSuppressionStep {
    pub min_distance: f64,
}

impl PipelineStep for DuplicateSuppressionStep {
    fn process(&self, mut data: PipelineData, _context: &PipelineContext) -> Result<PipelineData> {
        data.points = dedup::suppress_duplicates(&data.points, self.min_distance);
        Ok(data)
    }

    fn name(&self) -> &str {
        "Duplicate Suppression"
    }
}
