use crate::analysis::{PolygonOutcome, SourceReport, ValidationReport};
use crate::domain::{LandabilityVerdict, PolygonCollection};
use crate::error::{LakeError, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

const POLYGON_HEADER: [&str; 3] = ["Polygon", "Latitude", "Longitude"];
const RESULTS_HEADER: [&str; 5] = ["Polygon", "Latitude", "Longitude", "Result", "Perimeter"];
const DETECTION_HEADER: [&str; 4] = ["Lat", "Long", "LakeName", "detected"];

/// One line of the landability results table. Position is the centroid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultRow {
    #[serde(rename = "Polygon")]
    pub polygon: usize,
    #[serde(rename = "Latitude")]
    pub latitude: f64,
    #[serde(rename = "Longitude")]
    pub longitude: f64,
    #[serde(rename = "Result")]
    pub result: LandabilityVerdict,
    #[serde(rename = "Perimeter")]
    pub perimeter: f64,
}

pub fn result_rows(outcomes: &[PolygonOutcome]) -> Vec<ResultRow> {
    outcomes
        .iter()
        .map(|o| ResultRow {
            polygon: o.polygon_id,
            latitude: o.statistics.centroid.lat,
            longitude: o.statistics.centroid.lon,
            result: o.verdict,
            perimeter: o.statistics.perimeter_m,
        })
        .collect()
}

/// Write a table with a fixed header line, present even with no rows.
fn write_table<T: Serialize>(
    path: &Path,
    header: &[&str],
    rows: impl IntoIterator<Item = T>,
) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(|e| LakeError::table(path, e))?;

    writer
        .write_record(header)
        .map_err(|e| LakeError::table(path, e))?;
    for row in rows {
        writer
            .serialize(row)
            .map_err(|e| LakeError::table(path, e))?;
    }
    writer.flush()?;

    Ok(())
}

/// Write every vertex of every polygon as `Polygon,Latitude,Longitude`.
pub fn write_polygon_rows(path: &Path, polygons: &PolygonCollection) -> Result<()> {
    write_table(path, &POLYGON_HEADER, polygons.to_rows())
}

pub fn write_results(path: &Path, outcomes: &[PolygonOutcome]) -> Result<()> {
    write_table(path, &RESULTS_HEADER, result_rows(outcomes))
}

pub fn write_detections(path: &Path, report: &ValidationReport) -> Result<()> {
    write_table(
        path,
        &DETECTION_HEADER,
        report.records.iter().map(|r| r.to_row()),
    )
}

/// `lakes.csv` in `dir` becomes `dir/lakes_results.csv`.
pub fn results_path(dir: &Path, source: &Path) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "source".to_string());
    dir.join(format!("{}_results.csv", stem))
}

/// Companion vertex table for a results file: `x_results.csv` becomes
/// `x_results_vertices.csv`.
pub fn vertices_path(results: &Path) -> PathBuf {
    let stem = results
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    results.with_file_name(format!("{}_vertices.csv", stem))
}

/// Write the results table and the surviving passing polygons for one source.
///
/// # Returns
/// * The results path and the vertices path
pub fn write_source_report(dir: &Path, report: &SourceReport) -> Result<(PathBuf, PathBuf)> {
    std::fs::create_dir_all(dir)?;

    let results = results_path(dir, &report.source);
    write_results(&results, &report.outcomes)?;

    let vertices = vertices_path(&results);
    write_polygon_rows(&vertices, &report.surviving)?;

    Ok((results, vertices))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{AnalysisSettings, analyze_collection, cross_validate};
    use crate::domain::{Marker, Polygon, Vertex};
    use crate::ingest::read_polygon_rows;
    use std::fs;
    use tempfile::tempdir;

    fn square(id: usize, lat: f64, lon: f64, size: f64) -> Polygon {
        Polygon::new(
            id,
            vec![
                Vertex::new(lat, lon),
                Vertex::new(lat + size, lon),
                Vertex::new(lat + size, lon + size),
                Vertex::new(lat, lon + size),
                Vertex::new(lat, lon),
            ],
        )
    }

    #[test]
    fn test_polygon_rows_written_back_readable() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("polygons.csv");
        let polygons = PolygonCollection::from_polygons(vec![
            square(0, 61.0, -150.0, 0.01),
            square(1, 62.0, -149.0, 0.02),
        ]);

        write_polygon_rows(&path, &polygons).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("Polygon,Latitude,Longitude\n"));
        assert_eq!(read_polygon_rows(&path).unwrap(), polygons.to_rows());
    }

    #[test]
    fn test_empty_table_keeps_header() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        write_polygon_rows(&path, &PolygonCollection::new()).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "Polygon,Latitude,Longitude\n");
    }

    #[test]
    fn test_results_labels() {
        let dir = tempdir().unwrap();
        let polygons = PolygonCollection::from_polygons(vec![
            square(0, 61.0, -150.0, 0.02),
            square(1, 62.0, -149.0, 0.001),
        ]);
        // Sides of the big square are ~2.2 km and ~1.1 km; its diagonal ~2.5 km
        let settings = AnalysisSettings {
            target_m: 2300.0,
            ..Default::default()
        };
        let report = analyze_collection(Path::new("lakes.csv"), &polygons, &settings).unwrap();

        let (results, vertices) = write_source_report(dir.path(), &report).unwrap();
        assert_eq!(results, dir.path().join("lakes_results.csv"));
        assert_eq!(vertices, dir.path().join("lakes_results_vertices.csv"));

        let text = fs::read_to_string(&results).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Polygon,Latitude,Longitude,Result,Perimeter");
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("0,") && lines[1].contains(",Passes,"));
        assert!(lines[2].starts_with("1,") && lines[2].contains(",Fails,"));
        assert!(vertices.exists());
    }

    #[test]
    fn test_detections_table() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("detected.csv");
        let polygons = PolygonCollection::from_polygons(vec![square(0, 61.0, -150.0, 0.1)]);
        let report = cross_validate(
            vec![
                Marker::new(61.05, -149.95, "Hood"),
                Marker::new(60.0, -149.0, "Elsewhere"),
            ],
            &polygons,
        );

        write_detections(&path, &report).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(
            text,
            "Lat,Long,LakeName,detected\n61.05,-149.95,Hood,true\n60.0,-149.0,Elsewhere,false\n"
        );
    }

    #[test]
    fn test_vertices_path() {
        assert_eq!(
            vertices_path(Path::new("out/run_results.csv")),
            PathBuf::from("out/run_results_vertices.csv")
        );
    }
}
