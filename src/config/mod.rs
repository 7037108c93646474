use serde::Deserialize;
use std::path::PathBuf;

use crate::analysis::InputFormat;
use crate::domain::{Polygon, Vertex};
use crate::geometry::MetricKind;

/// Minimum straight run for a floatplane, in meters
pub const DEFAULT_TARGET_METERS: f64 = 500.0;

fn default_target_meters() -> f64 {
    DEFAULT_TARGET_METERS
}
fn default_include_low_resolution() -> bool {
    true
}
fn default_verbose() -> bool {
    false
}

/// Settings read from `lakescan.toml`. Every key is optional.
#[derive(Debug, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub sources: Vec<PathBuf>,
    #[serde(default = "default_target_meters")]
    pub target_meters: f64,
    #[serde(default)]
    pub metric: MetricKind,
    #[serde(default)]
    pub input_format: InputFormat,
    #[serde(default)]
    pub max_polygons: Option<usize>,
    #[serde(default)]
    pub geometry_column: Option<String>,
    #[serde(default)]
    pub strict: bool,
    #[serde(default = "default_include_low_resolution")]
    pub include_low_resolution: bool,
    #[serde(default)]
    pub simplify_meters: Option<f64>,
    #[serde(default)]
    pub results_dir: Option<PathBuf>,
    #[serde(default)]
    pub export_passing: Option<PathBuf>,
    #[serde(default)]
    pub markers: Option<PathBuf>,
    #[serde(default)]
    pub detected_output: Option<PathBuf>,
    #[serde(default)]
    pub summary_json: Option<PathBuf>,
    /// Region of interest as `[lat, lon]` corners
    #[serde(default)]
    pub roi: Option<Vec<[f64; 2]>>,
    #[serde(default = "default_verbose")]
    pub verbose: bool,
    #[serde(default)]
    pub visualize: bool,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            sources: Vec::new(),
            target_meters: default_target_meters(),
            metric: MetricKind::default(),
            input_format: InputFormat::default(),
            max_polygons: None,
            geometry_column: None,
            strict: false,
            include_low_resolution: default_include_low_resolution(),
            simplify_meters: None,
            results_dir: None,
            export_passing: None,
            markers: None,
            detected_output: None,
            summary_json: None,
            roi: None,
            verbose: default_verbose(),
            visualize: false,
        }
    }
}

impl FileConfig {
    pub fn load() -> Option<Self> {
        let config_paths = get_config_paths();

        for path in config_paths {
            if path.exists()
                && let Ok(contents) = std::fs::read_to_string(&path)
            {
                match toml::from_str(&contents) {
                    Ok(config) => return Some(config),
                    Err(e) => {
                        eprintln!("Warning: Failed to parse config file {:?}: {}", path, e);
                    }
                }
            }
        }
        None
    }

    /// Region of interest as a polygon, closed if the corners are not.
    pub fn roi_polygon(&self) -> Option<Polygon> {
        let corners = self.roi.as_ref().filter(|c| !c.is_empty())?;
        let mut vertices: Vec<Vertex> = corners
            .iter()
            .map(|&[lat, lon]| Vertex::new(lat, lon))
            .collect();
        if vertices.first() != vertices.last() {
            vertices.push(vertices[0]);
        }
        Some(Polygon::new(0, vertices))
    }
}

fn get_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    paths.push(PathBuf::from("lakescan.toml"));
    paths.push(PathBuf::from(".lakescan.toml"));

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("lakescan").join("config.toml"));
        paths.push(config_dir.join("lakescan.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".lakescan.toml"));
        paths.push(home.join(".config").join("lakescan").join("config.toml"));
    }

    paths
}
