//! Arc-length parametrization of ordered point sequences.

use crate::types::Point2;

/// Cumulative traveled distance at each point, starting at 0.0.
///
/// The result has the same length as the input, so it can serve as a
/// per-point parametrization for correspondence between differently
/// sampled paths.
pub fn cumulative_lengths(points: &[Point2]) -> Vec<f64> {
    let mut lengths = Vec::with_capacity(points.len());
    let mut total = 0.0;
    for (i, point) in points.iter().enumerate() {
        if i > 0 {
            total += points[i - 1].distance_to(point);
        }
        lengths.push(total);
    }
    lengths
}

/// Total traveled length of the path.
pub fn path_length(points: &[Point2]) -> f64 {
    points
        .windows(2)
        .map(|pair| pair[0].distance_to(&pair[1]))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cumulative_lengths() {
        let points = [
            Point2::new(0.0, 0.0),
            Point2::new(3.0, 4.0),
            Point2::new(3.0, 14.0),
        ];
        let lengths = cumulative_lengths(&points);
        assert_eq!(lengths, vec![0.0, 5.0, 15.0]);
        assert_eq!(path_length(&points), 15.0);
    }

    #[test]
    fn test_empty_and_single() {
        assert!(cumulative_lengths(&[]).is_empty());
        assert_eq!(cumulative_lengths(&[Point2::new(1.0, 1.0)]), vec![0.0]);
        assert_eq!(path_length(&[]), 0.0);
    }

    #[test]
    fn test_duplicate_points_add_nothing() {
        let points = [
            Point2::new(0.0, 0.0),
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
        ];
        assert_eq!(cumulative_lengths(&points), vec![0.0, 0.0, 1.0]);
    }
}
