use super::DistanceMetric;
use crate::domain::{Polygon, Vertex};
use serde::Serialize;

/// Length of every edge of a ring, in ring order.
///
/// Entry `n` is the distance from vertex `n` to vertex `(n + 1) % N`, so the
/// profile always has exactly as many entries as the ring has vertices.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeLengthProfile {
    lengths: Vec<f64>,
}

impl EdgeLengthProfile {
    pub fn compute<M: DistanceMetric>(vertices: &[Vertex], metric: &M) -> Self {
        let n = vertices.len();
        let lengths = (0..n)
            .map(|i| metric.distance(vertices[i], vertices[(i + 1) % n]))
            .collect();
        Self { lengths }
    }

    pub fn lengths(&self) -> &[f64] {
        &self.lengths
    }

    pub fn len(&self) -> usize {
        self.lengths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lengths.is_empty()
    }

    /// Longest edge, 0.0 for an empty ring
    pub fn longest(&self) -> f64 {
        self.lengths.iter().copied().fold(0.0, f64::max)
    }

    /// Shortest edge, 0.0 for an empty ring
    pub fn shortest(&self) -> f64 {
        if self.lengths.is_empty() {
            return 0.0;
        }
        self.lengths.iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// Sum of all edges. Beware the coastline paradox: this depends heavily
    /// on how densely the outline is sampled and does not compare well
    /// across differently sampled polygons.
    pub fn perimeter(&self) -> f64 {
        self.lengths.iter().sum()
    }

    pub fn mean(&self) -> f64 {
        if self.lengths.is_empty() {
            return 0.0;
        }
        self.perimeter() / self.lengths.len() as f64
    }

    /// Population standard deviation of the edge lengths
    pub fn std_dev(&self) -> f64 {
        if self.lengths.is_empty() {
            return 0.0;
        }
        let mean = self.mean();
        let variance = self
            .lengths
            .iter()
            .map(|l| (l - mean).powi(2))
            .sum::<f64>()
            / self.lengths.len() as f64;
        variance.sqrt()
    }
}

/// Arithmetic mean of vertex latitudes and longitudes (not area weighted).
pub fn centroid(vertices: &[Vertex]) -> Option<Vertex> {
    if vertices.is_empty() {
        return None;
    }
    let n = vertices.len() as f64;
    let (lat_sum, lon_sum) = vertices
        .iter()
        .fold((0.0, 0.0), |(lat, lon), v| (lat + v.lat, lon + v.lon));
    Some(Vertex::new(lat_sum / n, lon_sum / n))
}

/// Descriptive numbers attached to a polygon in the results table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PolygonStatistics {
    pub centroid: Vertex,
    pub vertex_count: usize,
    pub perimeter_m: f64,
    pub edge_mean_m: f64,
    pub edge_std_m: f64,
    pub edge_min_m: f64,
    pub edge_max_m: f64,
}

impl PolygonStatistics {
    /// Summarize a polygon from an already computed edge profile.
    ///
    /// Returns `None` for an empty polygon, which has no centroid.
    pub fn from_profile(polygon: &Polygon, profile: &EdgeLengthProfile) -> Option<Self> {
        let centroid = centroid(polygon.vertices())?;
        Some(Self {
            centroid,
            vertex_count: polygon.len(),
            perimeter_m: profile.perimeter(),
            edge_mean_m: profile.mean(),
            edge_std_m: profile.std_dev(),
            edge_min_m: profile.shortest(),
            edge_max_m: profile.longest(),
        })
    }

    pub fn compute<M: DistanceMetric>(polygon: &Polygon, metric: &M) -> Option<Self> {
        let profile = EdgeLengthProfile::compute(polygon.vertices(), metric);
        Self::from_profile(polygon, &profile)
    }
}
