use super::LocalProjector;
use crate::domain::Polygon;
use geo::{LineString, SimplifyIdx};

/// Ramer-Douglas-Peucker over a lat/lon polyline with a tolerance in meters.
///
/// Points are projected around the first one before simplifying so the
/// tolerance means the same thing in both axes. The kept points are the
/// original, unprojected vertices.
pub fn simplify_indices(points: &[(f64, f64)], epsilon_m: f64) -> Vec<usize> {
    if points.len() < 4 {
        return (0..points.len()).collect();
    }

    let projector = LocalProjector::new(points[0].into());
    let line: LineString<f64> = points
        .iter()
        .map(|&p| {
            let (x, y) = projector.project(p.into());
            geo::coord! { x: x, y: y }
        })
        .collect();

    line.simplify_idx(&epsilon_m)
}

/// Thin out a heavily sampled outline.
///
/// The first and last points always survive, so a ring that repeats its
/// first vertex stays closed. If fewer than 4 points would remain the
/// original polygon is returned unchanged.
pub fn simplify_polygon(polygon: &Polygon, epsilon_m: f64) -> Polygon {
    if polygon.len() < 5 || epsilon_m <= 0.0 {
        return polygon.clone();
    }

    let points: Vec<(f64, f64)> = polygon.vertices().iter().map(|v| v.as_tuple()).collect();
    let kept = simplify_indices(&points, epsilon_m);

    if kept.len() < 4 {
        return polygon.clone();
    }

    Polygon::new(
        polygon.id(),
        kept.into_iter().map(|i| polygon.vertices()[i]).collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Vertex;

    const DEG_PER_M: f64 = 1.0 / 111_120.0;

    /// Square ring ~1 km a side at the equator with a noisy bottom edge.
    fn wobbly_square() -> Polygon {
        let mut vertices = Vec::new();
        for i in 0..=20 {
            let wobble = if i % 2 == 0 { 0.0 } else { 0.5 * DEG_PER_M };
            vertices.push(Vertex::new(wobble, i as f64 * 50.0 * DEG_PER_M));
        }
        vertices.push(Vertex::new(1000.0 * DEG_PER_M, 1000.0 * DEG_PER_M));
        vertices.push(Vertex::new(1000.0 * DEG_PER_M, 0.0));
        vertices.push(Vertex::new(0.0, 0.0));
        Polygon::new(3, vertices)
    }

    #[test]
    fn test_short_input_untouched() {
        let points = vec![(0.0, 0.0), (1.0, 1.0), (2.0, 2.0)];
        assert_eq!(simplify_indices(&points, 10.0), vec![0, 1, 2]);
    }

    #[test]
    fn test_simplify_removes_wobble() {
        let polygon = wobbly_square();
        let simplified = simplify_polygon(&polygon, 5.0);
        assert!(simplified.len() < polygon.len());
        assert_eq!(simplified.id(), 3);
    }

    #[test]
    fn test_simplify_keeps_ring_closed() {
        let simplified = simplify_polygon(&wobbly_square(), 5.0);
        let vertices = simplified.vertices();
        assert_eq!(vertices.first(), vertices.last());
        assert!(simplified.len() >= 4);
    }

    #[test]
    fn test_zero_tolerance_is_noop() {
        let polygon = wobbly_square();
        assert_eq!(simplify_polygon(&polygon, 0.0), polygon);
    }
}
