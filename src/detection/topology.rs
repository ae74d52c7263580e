use crate::models::{Point, VertexClass};

/// Neighbor radius used when fewer than two points exist
pub const FALLBACK_NEIGHBOR_RADIUS: f64 = 20.0;

/// Multiplier applied to the median nearest-neighbor distance
pub const RADIUS_FACTOR: f64 = 1.5;

/// Points bucketed by local neighbor density
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Classification {
    pub junctions: Vec<Point>,
    pub edge_centers: Vec<Point>,
    pub cell_centers: Vec<Point>,
    /// Radius actually used for neighbor counting
    pub neighbor_radius: f64,
    /// Neighbor count per input point, in input order
    pub neighbor_counts: Vec<usize>,
}

impl Classification {
    pub fn total(&self) -> usize {
        self.junctions.len() + self.edge_centers.len() + self.cell_centers.len()
    }

    pub fn points_of(&self, class: VertexClass) -> &[Point] {
        match class {
            VertexClass::Junction => &self.junctions,
            VertexClass::EdgeCenter => &self.edge_centers,
            VertexClass::CellCenter => &self.cell_centers,
        }
    }
}

/// Class for a neighbor count; junction wins when thresholds overlap
pub fn class_for_count(count: usize, junction_threshold: usize) -> VertexClass {
    if count >= junction_threshold {
        VertexClass::Junction
    } else if count >= 2 {
        VertexClass::EdgeCenter
    } else {
        VertexClass::CellCenter
    }
}

/// `1.5 x median` of nearest-neighbor distances, or the fallback radius
pub fn auto_neighbor_radius(points: &[Point]) -> f64 {
    if points.len() < 2 {
        return FALLBACK_NEIGHBOR_RADIUS;
    }

    let mut nearest: Vec<f64> = points
        .iter()
        .enumerate()
        .map(|(i, p)| {
            points
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .map(|(_, q)| p.distance(q))
                .fold(f64::INFINITY, f64::min)
        })
        .collect();
    nearest.sort_by(f64::total_cmp);

    let mid = nearest.len() / 2;
    let median = if nearest.len() % 2 == 0 {
        (nearest[mid - 1] + nearest[mid]) / 2.0
    } else {
        nearest[mid]
    };
    median * RADIUS_FACTOR
}

/// Count, for each point, the other points strictly within `radius`
pub fn neighbor_counts(points: &[Point], radius: f64) -> Vec<usize> {
    points
        .iter()
        .enumerate()
        .map(|(i, p)| {
            points
                .iter()
                .enumerate()
                .filter(|(j, q)| *j != i && p.distance(q) < radius)
                .count()
        })
        .collect()
}

/// Bucket points into junctions, edge centers and cell centers.
///
/// When `neighbor_radius` is `None` it is derived from the point spacing.
/// Input order is preserved within each bucket.
pub fn classify_vertices(
    points: &[Point],
    junction_threshold: usize,
    neighbor_radius: Option<f64>,
) -> Classification {
    let radius = neighbor_radius.unwrap_or_else(|| auto_neighbor_radius(points));
    let counts = neighbor_counts(points, radius);

    let mut result = Classification {
        neighbor_radius: radius,
        ..Default::default()
    };
    for (point, &count) in points.iter().zip(&counts) {
        match class_for_count(count, junction_threshold) {
            VertexClass::Junction => result.junctions.push(*point),
            VertexClass::EdgeCenter => result.edge_centers.push(*point),
            VertexClass::CellCenter => result.cell_centers.push(*point),
        }
    }
    result.neighbor_counts = counts;
    result
}
