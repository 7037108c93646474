//! CSV readers for the three input layouts:
//! - raw exports with a free-text geometry column
//! - processed vertex tables (`Polygon,Latitude,Longitude`)
//! - ground-truth marker tables (`Lat,Long,LakeName[,floatplanes]`)

use crate::domain::{Marker, PolygonRow};
use crate::error::{LakeError, Result};
use serde::de::DeserializeOwned;
use std::path::Path;

/// Fail with `SourceNotFound` before anything is opened.
pub fn ensure_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(LakeError::SourceNotFound {
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

/// Read one text column from a raw export, one entry per row.
///
/// # Arguments
/// * `path` - CSV file with a header row
/// * `column` - Header name of the geometry column (`.geo` for Earth Engine exports)
pub fn read_geometry_column(path: &Path, column: &str) -> Result<Vec<String>> {
    ensure_exists(path)?;

    let mut reader = csv::Reader::from_path(path).map_err(|e| LakeError::table(path, e))?;
    let headers = reader.headers().map_err(|e| LakeError::table(path, e))?;
    let index = headers
        .iter()
        .position(|h| h.trim() == column)
        .ok_or_else(|| LakeError::MissingColumn {
            path: path.to_path_buf(),
            column: column.to_string(),
        })?;

    let mut texts = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| LakeError::table(path, e))?;
        texts.push(record.get(index).unwrap_or_default().to_string());
    }

    Ok(texts)
}

fn read_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    ensure_exists(path)?;

    let mut reader = csv::Reader::from_path(path).map_err(|e| LakeError::table(path, e))?;
    reader
        .deserialize()
        .collect::<std::result::Result<Vec<T>, _>>()
        .map_err(|e| LakeError::table(path, e))
}

/// Read a processed `Polygon,Latitude,Longitude` table.
pub fn read_polygon_rows(path: &Path) -> Result<Vec<PolygonRow>> {
    read_rows(path)
}

/// Read the ground-truth marker table.
pub fn read_markers(path: &Path) -> Result<Vec<Marker>> {
    read_rows(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_is_source_not_found() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nope.csv");
        match read_geometry_column(&path, ".geo") {
            Err(LakeError::SourceNotFound { path: p }) => assert_eq!(p, path),
            other => panic!("expected source not found, got {:?}", other),
        }
    }

    #[test]
    fn test_read_geometry_column() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("raw.csv");
        fs::write(
            &path,
            "system:index,label,.geo\n\
             0,1,\"{\"\"type\"\":\"\"Polygon\"\",\"\"coordinates\"\":[[[-149.1,61.2]]]}\"\n\
             1,1,\"{\"\"type\"\":\"\"Polygon\"\"}\"\n",
        )
        .unwrap();

        let texts = read_geometry_column(&path, ".geo").unwrap();
        assert_eq!(texts.len(), 2);
        assert!(texts[0].contains("-149.1"));
    }

    #[test]
    fn test_missing_geometry_column() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("raw.csv");
        fs::write(&path, "a,b\n1,2\n").unwrap();
        assert!(matches!(
            read_geometry_column(&path, ".geo"),
            Err(LakeError::MissingColumn { .. })
        ));
    }

    #[test]
    fn test_read_markers_with_extra_columns() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cleaned.csv");
        fs::write(
            &path,
            "Lat,Long,floatplanes,LakeName\n61.18,-149.97,1,Lake Hood\n61.2,-149.8,0,Merrill Field\n",
        )
        .unwrap();

        let markers = read_markers(&path).unwrap();
        assert_eq!(markers.len(), 2);
        assert_eq!(markers[0].label, "Lake Hood");
        assert!(markers[0].serves_floatplanes());
        assert!(!markers[1].serves_floatplanes());
    }

    #[test]
    fn test_read_polygon_rows() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("vertices.csv");
        fs::write(
            &path,
            "Polygon,Latitude,Longitude\n0,61.0,-150.0\n0,61.1,-150.0\n",
        )
        .unwrap();

        let rows = read_polygon_rows(&path).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].latitude, 61.1);
    }
}
