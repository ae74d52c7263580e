use crate::models::Point;

/// Upper bound on merge rounds; output may stay under-merged past this.
pub const MAX_MERGE_ROUNDS: usize = 10;

/// Result of iterative cluster merging
#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutcome {
    /// One centroid per surviving cluster, in finalization order
    pub centroids: Vec<Point>,
    /// Number of rounds executed
    pub rounds: usize,
    /// False when the round cap stopped a still-merging run
    pub converged: bool,
}

/// Iteratively merge points whose cluster centroids lie within `eps`.
///
/// Clusters are index lists into the input slice. Every round recomputes
/// centroids from the previous round's clusters, then scans in index order:
/// each unmerged cluster absorbs all later unmerged clusters within `eps`
/// of its own (fixed) centroid. Stops after [`MAX_MERGE_ROUNDS`].
pub fn merge_clusters(points: &[Point], eps: f64) -> MergeOutcome {
    merge_clusters_capped(points, eps, MAX_MERGE_ROUNDS)
}

/// [`merge_clusters`] with an explicit round limit
pub fn merge_clusters_capped(points: &[Point], eps: f64, max_rounds: usize) -> MergeOutcome {
    let mut clusters: Vec<Vec<usize>> = (0..points.len()).map(|i| vec![i]).collect();
    let mut rounds = 0;
    let mut changed = !points.is_empty();

    while changed && rounds < max_rounds {
        changed = false;
        rounds += 1;

        let centers: Vec<Point> = clusters.iter().map(|c| centroid_of(points, c)).collect();
        let mut consumed = vec![false; clusters.len()];
        let mut next: Vec<Vec<usize>> = Vec::with_capacity(clusters.len());

        for i in 0..clusters.len() {
            if consumed[i] {
                continue;
            }
            consumed[i] = true;
            let mut members = clusters[i].clone();

            for j in (i + 1)..clusters.len() {
                if consumed[j] {
                    continue;
                }
                if centers[i].distance(&centers[j]) <= eps {
                    members.extend_from_slice(&clusters[j]);
                    consumed[j] = true;
                    changed = true;
                }
            }

            next.push(members);
        }

        tracing::debug!(round = rounds, clusters = next.len(), changed, "merge round");
        clusters = next;
    }

    MergeOutcome {
        centroids: clusters.iter().map(|c| centroid_of(points, c)).collect(),
        rounds,
        converged: !changed,
    }
}

fn centroid_of(points: &[Point], members: &[usize]) -> Point {
    Point::centroid(members.iter().map(|&i| &points[i])).unwrap_or(Point::new(0.0, 0.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_is_empty_output() {
        let outcome = merge_clusters(&[], 8.0);
        assert!(outcome.centroids.is_empty());
        assert_eq!(outcome.rounds, 0);
        assert!(outcome.converged);
    }

    #[test]
    fn single_point_passes_through() {
        let outcome = merge_clusters(&[Point::new(3.0, 4.0)], 8.0);
        assert_eq!(outcome.centroids, vec![Point::new(3.0, 4.0)]);
        assert_eq!(outcome.rounds, 1);
        assert!(outcome.converged);
    }

    #[test]
    fn close_pair_merges_to_mean() {
        let points = [Point::new(0.0, 0.0), Point::new(4.0, 0.0), Point::new(50.0, 50.0)];
        let outcome = merge_clusters(&points, 5.0);
        assert_eq!(outcome.centroids, vec![Point::new(2.0, 0.0), Point::new(50.0, 50.0)]);
        assert_eq!(outcome.rounds, 2);
        assert!(outcome.converged);
    }

    #[test]
    fn merge_radius_is_inclusive() {
        let points = [Point::new(0.0, 0.0), Point::new(5.0, 0.0)];
        assert_eq!(merge_clusters(&points, 5.0).centroids.len(), 1);
    }

    #[test]
    fn chain_merges_over_several_rounds() {
        // eps 6: round 1 pairs (0, 6) and (13, 19), centroids 3 and 16 stay apart.
        // eps 13: round 1 leaves {0, 6, 13} and {19}, round 2 joins them.
        let points: Vec<Point> = [0.0, 6.0, 13.0, 19.0]
            .iter()
            .map(|&x| Point::new(x, 0.0))
            .collect();
        let outcome = merge_clusters(&points, 6.0);
        assert_eq!(outcome.centroids.len(), 2);

        let outcome = merge_clusters(&points, 13.0);
        assert_eq!(outcome.centroids, vec![Point::new(9.5, 0.0)]);
        assert!(outcome.converged);
    }

    #[test]
    fn round_cap_stops_a_still_merging_run() {
        // eps 13 needs a second merging round to absorb 19.
        let points: Vec<Point> = [0.0, 6.0, 13.0, 19.0]
            .iter()
            .map(|&x| Point::new(x, 0.0))
            .collect();

        let capped = merge_clusters_capped(&points, 13.0, 1);
        assert_eq!(capped.rounds, 1);
        assert!(!capped.converged);
        assert_eq!(capped.centroids.len(), 2);
        assert_eq!(capped.centroids[1], Point::new(19.0, 0.0));

        let free = merge_clusters_capped(&points, 13.0, MAX_MERGE_ROUNDS);
        assert_eq!(free.rounds, 3);
        assert!(free.converged);
        assert_eq!(free.centroids, merge_clusters(&points, 13.0).centroids);
    }

    #[test]
    fn absorption_uses_fixed_centroid_of_scanning_cluster() {
        // 0 absorbs 4 but not 8, even though the merged centroid (2) would reach it.
        let points = [Point::new(0.0, 0.0), Point::new(4.0, 0.0), Point::new(8.0, 0.0)];
        let outcome = merge_clusters(&points, 5.0);
        // Round 1: {0,4} and {8}; round 2: centroid 2 vs 8 is 6 apart, stop.
        assert_eq!(outcome.centroids, vec![Point::new(2.0, 0.0), Point::new(8.0, 0.0)]);
    }
}
