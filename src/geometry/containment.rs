use crate::domain::{Polygon, Vertex};

/// Raycasting point-in-polygon test
///
/// Casts a ray from `point` toward +x and toggles on every edge it crosses.
/// An edge counts only when `min(y1, y2) < y <= max(y1, y2)`, which
/// attributes a shared vertex to exactly one of its edges; horizontal edges
/// never count. Points on the boundary may land on either side depending on
/// which edge the half-open rule picks.
///
/// # Arguments
/// * `ring` - (x, y) vertices; the edge from the last back to the first is implied
/// * `point` - (x, y) point to classify
pub fn point_in_ring(ring: &[(f64, f64)], point: (f64, f64)) -> bool {
    let n = ring.len();
    if n == 0 {
        return false;
    }

    let (x, y) = point;
    let mut inside = false;
    let (mut x1, mut y1) = ring[0];

    for i in 1..=n {
        let (x2, y2) = ring[i % n];

        if y1.min(y2) < y && y <= y1.max(y2) && x <= x1.max(x2) && y1 != y2 {
            let intercept = (y - y1) * (x2 - x1) / (y2 - y1) + x1;
            if x1 == x2 || x <= intercept {
                inside = !inside;
            }
        }

        (x1, y1) = (x2, y2);
    }

    inside
}

/// Containment for geographic vertices, with x = latitude and y = longitude.
pub fn vertex_in_ring(ring: &[Vertex], point: Vertex) -> bool {
    let ring: Vec<(f64, f64)> = ring.iter().map(Vertex::as_tuple).collect();
    point_in_ring(&ring, point.as_tuple())
}

impl Polygon {
    pub fn contains(&self, point: Vertex) -> bool {
        vertex_in_ring(self.vertices(), point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const UNIT_SQUARE: [(f64, f64); 4] = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)];

    #[test]
    fn test_unit_square_inside() {
        assert!(point_in_ring(&UNIT_SQUARE, (0.5, 0.5)));
    }

    #[test]
    fn test_unit_square_outside() {
        assert!(!point_in_ring(&UNIT_SQUARE, (1.5, 1.5)));
    }

    #[test]
    fn test_unit_square_left_edge_is_outside() {
        assert!(!point_in_ring(&UNIT_SQUARE, (0.0, 0.5)));
    }

    #[test]
    fn test_half_open_rule_splits_top_and_bottom() {
        // The bottom edge sits on the open end of the vertical edges' ranges,
        // the top edge on the closed end.
        assert!(!point_in_ring(&UNIT_SQUARE, (0.5, 0.0)));
        assert!(point_in_ring(&UNIT_SQUARE, (0.5, 1.0)));
    }

    #[test]
    fn test_closing_point_repeated() {
        let mut ring = UNIT_SQUARE.to_vec();
        ring.push(ring[0]);
        assert!(point_in_ring(&ring, (0.5, 0.5)));
        assert!(!point_in_ring(&ring, (2.0, 0.5)));
    }

    #[test]
    fn test_concave_notch() {
        // U shape opening upward; the notch is outside
        let ring = [
            (0.0, 0.0),
            (3.0, 0.0),
            (3.0, 3.0),
            (2.0, 3.0),
            (2.0, 1.0),
            (1.0, 1.0),
            (1.0, 3.0),
            (0.0, 3.0),
        ];
        assert!(point_in_ring(&ring, (0.5, 2.0)));
        assert!(!point_in_ring(&ring, (1.5, 2.0)));
        assert!(point_in_ring(&ring, (1.5, 0.5)));
    }

    #[test]
    fn test_empty_ring() {
        assert!(!point_in_ring(&[], (0.0, 0.0)));
    }

    #[test]
    fn test_repeatable() {
        let polygon = Polygon::new(
            0,
            UNIT_SQUARE.iter().map(|&(a, b)| Vertex::new(a, b)).collect(),
        );
        let p = Vertex::new(0.25, 0.75);
        let first = polygon.contains(p);
        for _ in 0..10 {
            assert_eq!(polygon.contains(p), first);
        }
        assert!(first);
    }
}
