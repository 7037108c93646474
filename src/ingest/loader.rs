use super::rings::{extract_rings, extract_row_numbers};
use super::table::{ensure_exists, read_geometry_column, read_polygon_rows};
use crate::domain::PolygonCollection;
use crate::error::Result;
use std::path::Path;

/// Default geometry column in Earth Engine CSV exports
pub const DEFAULT_GEOMETRY_COLUMN: &str = ".geo";

/// How a raw export is turned into a polygon collection
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Stop after this many polygons
    pub max_count: Option<usize>,
    /// Header of the free-text geometry column
    pub geometry_column: String,
    /// Fail the whole source on a row without numbers instead of skipping it
    pub strict: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            max_count: None,
            geometry_column: DEFAULT_GEOMETRY_COLUMN.to_string(),
            strict: false,
        }
    }
}

impl LoadOptions {
    pub fn with_max_count(mut self, max_count: Option<usize>) -> Self {
        self.max_count = max_count;
        self
    }

    pub fn with_geometry_column(mut self, column: impl Into<String>) -> Self {
        self.geometry_column = column.into();
        self
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}

impl PolygonCollection {
    /// Load a raw geometry export with default options.
    pub fn load(source: &Path, max_count: Option<usize>) -> Result<Self> {
        Self::load_with(source, &LoadOptions::default().with_max_count(max_count))
    }

    /// Load a raw geometry export.
    ///
    /// # Algorithm
    /// 1. Check the file exists
    /// 2. Extract every signed decimal from each row's geometry text and
    ///    concatenate the rows into one stream
    /// 3. Rebuild closed rings from the stream, numbered from 0
    /// 4. Keep the first `max_count` rings
    pub fn load_with(source: &Path, options: &LoadOptions) -> Result<Self> {
        ensure_exists(source)?;

        let texts = read_geometry_column(source, &options.geometry_column)?;

        let mut numbers = Vec::new();
        for (row, text) in texts.iter().enumerate() {
            match extract_row_numbers(text, row) {
                Ok(values) => numbers.extend(values),
                Err(e) if !options.strict => {
                    tracing::warn!(source = %source.display(), "skipping row: {}", e);
                }
                Err(e) => return Err(e),
            }
        }

        let mut rings = extract_rings(&numbers)?;
        if let Some(max) = options.max_count {
            rings.truncate(max);
        }

        tracing::debug!(
            source = %source.display(),
            rows = texts.len(),
            polygons = rings.len(),
            "loaded raw geometry"
        );

        Ok(Self::from_polygons(rings))
    }

    /// Load a processed `Polygon,Latitude,Longitude` vertex table.
    pub fn load_vertices(source: &Path, max_count: Option<usize>) -> Result<Self> {
        let rows = read_polygon_rows(source)?;
        Ok(Self::from_rows(&rows, max_count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LakeError;
    use std::fs;
    use tempfile::tempdir;

    fn square_geo(lon: f64, lat: f64) -> String {
        format!(
            "\"{{\"\"type\"\":\"\"Polygon\"\",\"\"coordinates\"\":[[[{a},{b}],[{c},{b}],[{c},{d}],[{a},{d}],[{a},{b}]]]}}\"",
            a = lon,
            b = lat,
            c = lon + 0.01,
            d = lat + 0.01
        )
    }

    fn write_export(dir: &Path, rows: &[String]) -> std::path::PathBuf {
        let path = dir.join("lakes.csv");
        let mut body = String::from("system:index,.geo\n");
        for (i, geo) in rows.iter().enumerate() {
            body.push_str(&format!("{},{}\n", i, geo));
        }
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_load_missing_source() {
        let dir = tempdir().unwrap();
        let err = PolygonCollection::load(&dir.path().join("missing.csv"), None).unwrap_err();
        assert!(matches!(err, LakeError::SourceNotFound { .. }));
    }

    #[test]
    fn test_load_raw_export() {
        let dir = tempdir().unwrap();
        let path = write_export(
            dir.path(),
            &[square_geo(-150.0, 61.0), square_geo(-149.5, 61.5)],
        );

        let collection = PolygonCollection::load(&path, None).unwrap();
        assert_eq!(collection.len(), 2);
        let first = collection.get(0).unwrap();
        assert_eq!(first.len(), 5);
        assert_eq!(first.vertices()[0].lat, 61.0);
        assert_eq!(first.vertices()[0].lon, -150.0);
    }

    #[test]
    fn test_load_respects_max_count() {
        let dir = tempdir().unwrap();
        let path = write_export(
            dir.path(),
            &[
                square_geo(-150.0, 61.0),
                square_geo(-149.5, 61.5),
                square_geo(-149.0, 62.0),
            ],
        );

        let collection = PolygonCollection::load(&path, Some(2)).unwrap();
        assert_eq!(collection.ids().collect::<Vec<_>>(), vec![0, 1]);
        assert_eq!(collection.get(1).unwrap().len(), 5);
    }

    #[test]
    fn test_lenient_load_skips_empty_rows() {
        let dir = tempdir().unwrap();
        let path = write_export(
            dir.path(),
            &[square_geo(-150.0, 61.0), "\"{}\"".to_string()],
        );

        let collection = PolygonCollection::load(&path, None).unwrap();
        assert_eq!(collection.len(), 1);
    }

    #[test]
    fn test_strict_load_reports_row() {
        let dir = tempdir().unwrap();
        let path = write_export(
            dir.path(),
            &[square_geo(-150.0, 61.0), "\"{}\"".to_string()],
        );

        let options = LoadOptions::default().with_strict(true);
        match PolygonCollection::load_with(&path, &options) {
            Err(LakeError::MalformedStream { row, .. }) => assert_eq!(row, Some(1)),
            other => panic!("expected malformed stream, got {:?}", other),
        }
    }

    #[test]
    fn test_load_vertices_table() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("vertices.csv");
        fs::write(
            &path,
            "Polygon,Latitude,Longitude\n4,61.0,-150.0\n4,61.1,-150.0\n4,61.1,-150.1\n7,62.0,-149.0\n",
        )
        .unwrap();

        let collection = PolygonCollection::load_vertices(&path, Some(1)).unwrap();
        assert_eq!(collection.ids().collect::<Vec<_>>(), vec![4]);
        assert_eq!(collection.get(4).unwrap().len(), 3);
    }
}
