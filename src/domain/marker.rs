use super::Vertex;
use serde::{Deserialize, Serialize};

/// A known landable lake from the ground-truth table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Marker {
    #[serde(rename = "Lat")]
    pub lat: f64,
    #[serde(rename = "Long")]
    pub lon: f64,
    #[serde(rename = "LakeName", default)]
    pub label: String,
    /// 1 for floatplane facilities, 0 for runways. Absent means "assume yes".
    #[serde(default)]
    pub floatplanes: Option<u8>,
}

impl Marker {
    pub fn new(lat: f64, lon: f64, label: impl Into<String>) -> Self {
        Self {
            lat,
            lon,
            label: label.into(),
            floatplanes: None,
        }
    }

    pub fn position(&self) -> Vertex {
        Vertex::new(self.lat, self.lon)
    }

    pub fn serves_floatplanes(&self) -> bool {
        self.floatplanes.is_none_or(|flag| flag == 1)
    }
}

/// A marker together with whether any surviving polygon contains it.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionRecord {
    marker: Marker,
    detected: bool,
    polygon: Option<usize>,
}

impl DetectionRecord {
    pub fn new(marker: Marker) -> Self {
        Self {
            marker,
            detected: false,
            polygon: None,
        }
    }

    pub fn marker(&self) -> &Marker {
        &self.marker
    }

    pub fn detected(&self) -> bool {
        self.detected
    }

    /// ID of the first polygon found to contain the marker
    pub fn polygon(&self) -> Option<usize> {
        self.polygon
    }

    /// Record the first containing polygon. Later calls are ignored so the
    /// flag flips at most once.
    pub fn mark_detected(&mut self, polygon_id: usize) {
        if self.detected {
            return;
        }
        self.detected = true;
        self.polygon = Some(polygon_id);
    }

    /// Row for the detection output table.
    pub fn to_row(&self) -> DetectionRow {
        DetectionRow {
            lat: self.marker.lat,
            lon: self.marker.lon,
            label: self.marker.label.clone(),
            detected: self.detected,
        }
    }
}

/// `Lat,Long,LakeName,detected` output row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectionRow {
    #[serde(rename = "Lat")]
    pub lat: f64,
    #[serde(rename = "Long")]
    pub lon: f64,
    #[serde(rename = "LakeName")]
    pub label: String,
    pub detected: bool,
}
