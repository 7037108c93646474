use crate::domain::Vertex;

/// Meters per degree of latitude, treated as the same everywhere
pub const METERS_PER_LAT_DEGREE: f64 = 111_120.0;

/// Meters per degree of longitude at the equator
pub const METERS_PER_LON_DEGREE_AT_EQUATOR: f64 = 111_319.488;

/// Local linear projection from WGS84 degrees to meters
///
/// Uses a fixed scale taken at a single reference point:
/// - y = (lat - ref_lat) * 111120
/// - x = (lon - ref_lon) * 111319.488 * cos(ref_lat)
///
/// For lake outlines the reference is the first vertex of the polygon. The
/// error grows with the distance from that vertex; outlines are small enough
/// that this is not corrected per edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalProjector {
    reference: Vertex,
    lat_scale: f64,
    lon_scale: f64,
}

impl LocalProjector {
    /// Create a projector anchored at `reference`
    pub fn new(reference: Vertex) -> Self {
        Self {
            reference,
            lat_scale: METERS_PER_LAT_DEGREE,
            lon_scale: METERS_PER_LON_DEGREE_AT_EQUATOR * reference.lat.to_radians().cos(),
        }
    }

    /// Projector anchored at the first vertex, or `None` for an empty ring
    pub fn for_ring(vertices: &[Vertex]) -> Option<Self> {
        vertices.first().copied().map(Self::new)
    }

    pub fn reference(&self) -> Vertex {
        self.reference
    }

    /// (meters per degree latitude, meters per degree longitude)
    pub fn scale(&self) -> (f64, f64) {
        (self.lat_scale, self.lon_scale)
    }

    /// Convert a degree displacement between two vertices to meters
    ///
    /// # Returns
    /// * (north, east) offset of `to` relative to `from` in meters
    pub fn delta_meters(&self, from: Vertex, to: Vertex) -> (f64, f64) {
        (
            (to.lat - from.lat) * self.lat_scale,
            (to.lon - from.lon) * self.lon_scale,
        )
    }

    /// Project a vertex to local meters
    ///
    /// # Returns
    /// * (x, y) in meters, origin at the reference vertex
    pub fn project(&self, vertex: Vertex) -> (f64, f64) {
        let (north, east) = self.delta_meters(self.reference, vertex);
        (east, north)
    }

    /// Project a slice of vertices
    pub fn project_points(&self, vertices: &[Vertex]) -> Vec<(f64, f64)> {
        vertices.iter().map(|&v| self.project(v)).collect()
    }
}
