pub mod marker;
pub mod polygon;
pub mod verdict;
pub mod vertex;

pub use marker::{DetectionRecord, DetectionRow, Marker};
pub use polygon::{Polygon, PolygonCollection, PolygonRow};
pub use verdict::{Diagonal, LandabilityVerdict};
pub use vertex::Vertex;
