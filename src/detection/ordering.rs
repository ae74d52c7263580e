use crate::models::Point;

/// Smallest row band tolerance in pixels
pub const MIN_ROW_THRESHOLD: f64 = 4.0;

/// Row band tolerance for a point cloud: `max(4, f * (height + 1))`
pub fn row_threshold(points: &[Point], row_tolerance: f64) -> f64 {
    if points.is_empty() {
        return MIN_ROW_THRESHOLD;
    }
    let (min_y, max_y) = points
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
            (lo.min(p.y), hi.max(p.y))
        });
    MIN_ROW_THRESHOLD.max(row_tolerance * (max_y - min_y + 1.0))
}

/// Order points top-to-bottom in row bands, left-to-right within a band
pub fn order_grid(points: &[Point], row_tolerance: f64) -> Vec<Point> {
    order_rows(points, row_threshold(points, row_tolerance))
}

/// Order with an explicit band tolerance.
///
/// A new band starts when a point's y differs from the last point added to
/// the current band by more than `threshold`, so bands can drift downward.
pub fn order_rows(points: &[Point], threshold: f64) -> Vec<Point> {
    row_bands(points, threshold).into_iter().flatten().collect()
}

/// The row bands themselves, each sorted by x
pub fn row_bands(points: &[Point], threshold: f64) -> Vec<Vec<Point>> {
    let mut by_y = points.to_vec();
    by_y.sort_by(|a, b| a.y.total_cmp(&b.y));

    let mut bands: Vec<Vec<Point>> = Vec::new();
    let mut current: Vec<Point> = Vec::new();
    for point in by_y {
        let new_band = current
            .last()
            .is_some_and(|last| (point.y - last.y).abs() > threshold);
        if new_band {
            bands.push(std::mem::take(&mut current));
        }
        current.push(point);
    }
    if !current.is_empty() {
        bands.push(current);
    }

    for band in &mut bands {
        band.sort_by(|a, b| a.x.total_cmp(&b.x));
    }
    bands
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_bands_sorted_by_x() {
        let points = [
            Point::new(0.0, 0.0),
            Point::new(10.0, 1.0),
            Point::new(0.0, 5.0),
            Point::new(10.0, 6.0),
        ];
        assert_eq!(
            order_rows(&points, 2.0),
            vec![
                Point::new(0.0, 0.0),
                Point::new(10.0, 1.0),
                Point::new(0.0, 5.0),
                Point::new(10.0, 6.0),
            ]
        );
    }

    #[test]
    fn threshold_floor_merges_close_rows() {
        // The 4 px floor puts all four points in one band.
        let points = [
            Point::new(0.0, 0.0),
            Point::new(10.0, 1.0),
            Point::new(0.0, 5.0),
            Point::new(10.0, 6.0),
        ];
        assert_eq!(row_threshold(&points, 0.04), 4.0);
        assert_eq!(
            order_grid(&points, 0.04),
            vec![
                Point::new(0.0, 0.0),
                Point::new(0.0, 5.0),
                Point::new(10.0, 1.0),
                Point::new(10.0, 6.0),
            ]
        );
    }

    #[test]
    fn bands_drift_with_last_point() {
        // Each step is 3 px, within a 4 px threshold, so one band spans 9 px.
        let points: Vec<Point> = (0..4).map(|i| Point::new(-(i as f64), i as f64 * 3.0)).collect();
        let bands = row_bands(&points, 4.0);
        assert_eq!(bands.len(), 1);
        assert_eq!(bands[0][0], Point::new(-3.0, 9.0));
    }

    #[test]
    fn threshold_scales_with_height() {
        let points = [Point::new(0.0, 0.0), Point::new(0.0, 999.0)];
        assert_eq!(row_threshold(&points, 0.05), 50.0);
    }

    #[test]
    fn empty_and_single() {
        assert!(order_grid(&[], 0.04).is_empty());
        let single = [Point::new(1.0, 2.0)];
        assert_eq!(order_grid(&single, 0.04), single.to_vec());
    }
}
