pub mod loader;
pub mod rings;
pub mod table;

pub use loader::{DEFAULT_GEOMETRY_COLUMN, LoadOptions};
pub use rings::{RingExtractor, extract_numbers, extract_rings};
pub use table::{read_geometry_column, read_markers, read_polygon_rows};
