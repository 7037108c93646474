use crate::domain::{DetectionRecord, Marker, Polygon, PolygonCollection};
use serde::Serialize;

/// Outcome of matching ground-truth markers against detected polygons.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub records: Vec<DetectionRecord>,
}

impl ValidationReport {
    pub fn considered(&self) -> usize {
        self.records.len()
    }

    pub fn detected(&self) -> usize {
        self.records.iter().filter(|r| r.detected()).count()
    }

    /// Percentage of considered markers that were detected; `None` when no
    /// marker was considered.
    pub fn detection_rate(&self) -> Option<f64> {
        if self.records.is_empty() {
            return None;
        }
        Some(100.0 * self.detected() as f64 / self.considered() as f64)
    }

    pub fn tally(&self) -> ValidationTally {
        ValidationTally {
            considered: self.considered(),
            detected: self.detected(),
            detection_rate: self.detection_rate(),
        }
    }
}

/// Plain counts for summaries
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ValidationTally {
    pub considered: usize,
    pub detected: usize,
    pub detection_rate: Option<f64>,
}

/// Mark each marker detected if any polygon contains it.
///
/// Polygons are scanned in discovery order and the scan for a marker stops
/// at the first hit; overlapping polygons are not flagged.
pub fn cross_validate(
    markers: impl IntoIterator<Item = Marker>,
    polygons: &PolygonCollection,
) -> ValidationReport {
    let records = markers
        .into_iter()
        .map(|marker| {
            let position = marker.position();
            let mut record = DetectionRecord::new(marker);
            if let Some(hit) = polygons.iter().find(|p| p.contains(position)) {
                record.mark_detected(hit.id());
            }
            record
        })
        .collect();

    ValidationReport { records }
}

/// Keep markers that serve floatplanes and, when a region of interest is
/// given, lie inside it.
pub fn filter_markers(markers: Vec<Marker>, roi: Option<&Polygon>) -> Vec<Marker> {
    markers
        .into_iter()
        .filter(|m| m.serves_floatplanes())
        .filter(|m| roi.is_none_or(|r| r.contains(m.position())))
        .collect()
}
