pub mod containment;
pub mod distance;
pub mod projection;
pub mod simplify;
pub mod statistics;

pub use containment::{point_in_ring, vertex_in_ring};
pub use distance::{DistanceMetric, GreatCircle, LocalPlanar, Metric, MetricKind};
pub use projection::LocalProjector;
pub use simplify::simplify_polygon;
pub use statistics::{EdgeLengthProfile, PolygonStatistics, centroid};
