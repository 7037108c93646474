//! Point-to-point distances over geographic coordinates.
//!
//! Two strategies share the [`DistanceMetric`] trait so the landability
//! search does not care which one it is handed:
//! - [`GreatCircle`]: haversine on a sphere, exact for any displacement
//! - [`LocalPlanar`]: Euclidean norm after a [`LocalProjector`] scale, cheaper
//!   and accurate near the projector's reference point

use super::LocalProjector;
use crate::domain::Vertex;
use serde::{Deserialize, Serialize};

/// Earth radius used by the haversine formula
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Distance in meters between two vertices.
pub trait DistanceMetric {
    fn distance(&self, a: Vertex, b: Vertex) -> f64;
}

/// Great-circle distance via the haversine formula.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GreatCircle;

impl DistanceMetric for GreatCircle {
    fn distance(&self, a: Vertex, b: Vertex) -> f64 {
        let lat1 = a.lat.to_radians();
        let lat2 = b.lat.to_radians();
        let dlat = lat2 - lat1;
        let dlon = (b.lon - a.lon).to_radians();

        let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        // Rounding can push h a hair past 1 for antipodal points
        2.0 * EARTH_RADIUS_M * h.sqrt().min(1.0).asin()
    }
}

/// Euclidean distance in a locally projected plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalPlanar {
    projector: LocalProjector,
}

impl LocalPlanar {
    pub fn new(projector: LocalProjector) -> Self {
        Self { projector }
    }

    pub fn anchored_at(reference: Vertex) -> Self {
        Self::new(LocalProjector::new(reference))
    }

    pub fn projector(&self) -> &LocalProjector {
        &self.projector
    }
}

impl DistanceMetric for LocalPlanar {
    fn distance(&self, a: Vertex, b: Vertex) -> f64 {
        let (north, east) = self.projector.delta_meters(a, b);
        north.hypot(east)
    }
}

/// Which distance strategy to use
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum MetricKind {
    /// Haversine distance on a 6371 km sphere
    GreatCircle,
    /// Flat-earth distance scaled at the polygon's first vertex
    #[default]
    LocalPlanar,
}

impl MetricKind {
    /// Instantiate the strategy for a ring whose first vertex is `reference`.
    pub fn anchored_at(self, reference: Vertex) -> Metric {
        match self {
            MetricKind::GreatCircle => Metric::GreatCircle(GreatCircle),
            MetricKind::LocalPlanar => Metric::LocalPlanar(LocalPlanar::anchored_at(reference)),
        }
    }
}

/// A concrete, ready-to-use distance strategy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Metric {
    GreatCircle(GreatCircle),
    LocalPlanar(LocalPlanar),
}

impl DistanceMetric for Metric {
    fn distance(&self, a: Vertex, b: Vertex) -> f64 {
        match self {
            Metric::GreatCircle(m) => m.distance(a, b),
            Metric::LocalPlanar(m) => m.distance(a, b),
        }
    }
}

impl<M: DistanceMetric + ?Sized> DistanceMetric for &M {
    fn distance(&self, a: Vertex, b: Vertex) -> f64 {
        (**self).distance(a, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_haversine_zero() {
        let v = Vertex::new(61.2, -149.9);
        assert_eq!(GreatCircle.distance(v, v), 0.0);
    }

    #[test]
    fn test_haversine_one_degree_of_latitude() {
        let d = GreatCircle.distance(Vertex::new(0.0, 0.0), Vertex::new(1.0, 0.0));
        let expected = EARTH_RADIUS_M * 1.0_f64.to_radians();
        assert_relative_eq!(d, expected, epsilon = 1e-6);
    }

    #[test]
    fn test_haversine_antipodal() {
        let d = GreatCircle.distance(Vertex::new(0.0, 0.0), Vertex::new(0.0, 180.0));
        assert_relative_eq!(d, std::f64::consts::PI * EARTH_RADIUS_M, epsilon = 1e-3);
    }

    #[test]
    fn test_haversine_symmetric() {
        let a = Vertex::new(61.58, -149.44);
        let b = Vertex::new(61.60, -149.40);
        assert_relative_eq!(GreatCircle.distance(a, b), GreatCircle.distance(b, a));
    }

    #[test]
    fn test_planar_matches_haversine_for_small_offsets() {
        let a = Vertex::new(61.58, -149.44);
        let b = Vertex::new(61.585, -149.43);
        let planar = LocalPlanar::anchored_at(a).distance(a, b);
        let sphere = GreatCircle.distance(a, b);
        // Under 1% apart for a ~700 m hop
        assert!((planar - sphere).abs() / sphere < 0.01);
    }

    #[test]
    fn test_planar_pythagoras() {
        let a = Vertex::new(0.0, 0.0);
        let planar = LocalPlanar::anchored_at(a);
        let (lat_scale, lon_scale) = planar.projector().scale();
        let b = Vertex::new(400.0 / lat_scale, 300.0 / lon_scale);
        assert_relative_eq!(planar.distance(a, b), 500.0, epsilon = 1e-9);
    }

    #[test]
    fn test_metric_kind_dispatch() {
        let a = Vertex::new(10.0, 10.0);
        let b = Vertex::new(10.01, 10.0);
        let gc = MetricKind::GreatCircle.anchored_at(a);
        let lp = MetricKind::LocalPlanar.anchored_at(a);
        assert_eq!(gc.distance(a, b), GreatCircle.distance(a, b));
        assert_eq!(lp.distance(a, b), LocalPlanar::anchored_at(a).distance(a, b));
    }

    #[test]
    fn test_metric_kind_from_config_string() {
        #[derive(Deserialize)]
        struct Wrapper {
            metric: MetricKind,
        }
        let w: Wrapper = toml::from_str("metric = \"great-circle\"").unwrap();
        assert_eq!(w.metric, MetricKind::GreatCircle);
    }
}
