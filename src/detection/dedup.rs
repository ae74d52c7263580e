use crate::models::Point;

/// Remove near-duplicate points with a one-directional sweep.
///
/// Points are stably sorted by `(y, x)`; each surviving point removes every
/// later survivor strictly closer than `min_distance`. Earlier points in sort
/// order always win. The result is returned in sorted order.
pub fn suppress_duplicates(points: &[Point], min_distance: f64) -> Vec<Point> {
    if points.len() <= 1 {
        return points.to_vec();
    }

    let mut sorted = points.to_vec();
    sorted.sort_by(|a, b| a.y.total_cmp(&b.y).then(a.x.total_cmp(&b.x)));

    let mut keep = vec![true; sorted.len()];
    for i in 0..sorted.len() {
        if !keep[i] {
            continue;
        }
        for j in (i + 1)..sorted.len() {
            if keep[j] && sorted[i].distance(&sorted[j]) < min_distance {
                keep[j] = false;
            }
        }
    }

    sorted
        .into_iter()
        .zip(keep)
        .filter_map(|(p, k)| k.then_some(p))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_later_close_point() {
        let points = [Point::new(0.0, 0.0), Point::new(1.0, 0.0), Point::new(20.0, 20.0)];
        assert_eq!(
            suppress_duplicates(&points, 5.0),
            vec![Point::new(0.0, 0.0), Point::new(20.0, 20.0)]
        );
    }

    #[test]
    fn sort_key_is_y_then_x() {
        let points = [Point::new(3.0, 1.0), Point::new(0.0, 1.0), Point::new(9.0, 0.0)];
        assert_eq!(
            suppress_duplicates(&points, 0.5),
            vec![Point::new(9.0, 0.0), Point::new(0.0, 1.0), Point::new(3.0, 1.0)]
        );
    }

    #[test]
    fn removed_points_do_not_suppress_others() {
        // b is removed by a, so c (close to b but not to a) survives.
        let a = Point::new(0.0, 0.0);
        let b = Point::new(0.0, 4.0);
        let c = Point::new(0.0, 8.0);
        assert_eq!(suppress_duplicates(&[c, b, a], 5.0), vec![a, c]);
    }

    #[test]
    fn boundary_distance_survives() {
        let points = [Point::new(0.0, 0.0), Point::new(5.0, 0.0)];
        assert_eq!(suppress_duplicates(&points, 5.0).len(), 2);
    }

    #[test]
    fn single_and_empty_pass_through() {
        assert!(suppress_duplicates(&[], 5.0).is_empty());
        let single = [Point::new(7.0, 7.0)];
        assert_eq!(suppress_duplicates(&single, 5.0), single.to_vec());
    }

    #[test]
    fn identical_points_collapse_to_one() {
        let points = vec![Point::new(2.0, 2.0); 4];
        assert_eq!(suppress_duplicates(&points, 1.0), vec![Point::new(2.0, 2.0)]);
    }
}
