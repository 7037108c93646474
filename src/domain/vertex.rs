use serde::{Deserialize, Serialize};

/// A point on a lake outline in WGS84 degrees.
///
/// Equality is plain value equality with no tolerance; ring closure in the
/// raw export stream relies on the closing point repeating the first one
/// bit for bit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub lat: f64,
    pub lon: f64,
}

impl Vertex {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Build a vertex from an (x, y) = (longitude, latitude) pair as found
    /// in exported geometry text.
    pub fn from_lon_lat(lon: f64, lat: f64) -> Self {
        Self { lat, lon }
    }

    /// (lat, lon) tuple, the order the rest of the crate passes points around in.
    pub fn as_tuple(&self) -> (f64, f64) {
        (self.lat, self.lon)
    }

    /// Bit pattern key for hashing; `-0.0` and `0.0` map to the same key.
    pub(crate) fn key(&self) -> (u64, u64) {
        ((self.lat + 0.0).to_bits(), (self.lon + 0.0).to_bits())
    }
}

impl From<(f64, f64)> for Vertex {
    fn from((lat, lon): (f64, f64)) -> Self {
        Self::new(lat, lon)
    }
}
