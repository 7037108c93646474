use crate::domain::{Polygon, Vertex};
use crate::error::{LakeError, MalformedReason, Result};
use regex::Regex;
use std::sync::LazyLock;

static NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-?\d+(?:\.\d+)?").expect("number pattern compiles"));

/// Pull every signed decimal out of a geometry text field, left to right.
///
/// Exponents are not recognized; `1e-5` yields `1` and `-5`, which matches
/// how the exporting tool's text has always been read.
pub fn extract_numbers(text: &str) -> Vec<f64> {
    NUMBER
        .find_iter(text)
        .filter_map(|m| m.as_str().parse().ok())
        .collect()
}

/// Like [`extract_numbers`] but an empty result is an error for `row`.
pub fn extract_row_numbers(text: &str, row: usize) -> Result<Vec<f64>> {
    let numbers = extract_numbers(text);
    if numbers.is_empty() {
        return Err(LakeError::MalformedStream {
            row: Some(row),
            reason: MalformedReason::NoNumbers,
        });
    }
    Ok(numbers)
}

/// Streaming ring reconstruction from (longitude, latitude) pairs.
///
/// Keeps one open ring. A pair equal to the ring's first point closes it:
/// the closing point is appended, the ring is emitted with the next ID and
/// the buffer starts over. Nothing is emitted until a ring closes.
#[derive(Debug, Default)]
pub struct RingExtractor {
    open: Vec<Vertex>,
    next_id: usize,
}

impl RingExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one (x, y) = (longitude, latitude) pair.
    ///
    /// # Returns
    /// * `Some(polygon)` when this pair closed the open ring
    pub fn push_pair(&mut self, lon: f64, lat: f64) -> Option<Polygon> {
        let vertex = Vertex::from_lon_lat(lon, lat);
        match self.open.first() {
            Some(&first) if first == vertex => {
                self.open.push(vertex);
                let id = self.next_id;
                self.next_id += 1;
                Some(Polygon::new(id, std::mem::take(&mut self.open)))
            }
            _ => {
                self.open.push(vertex);
                None
            }
        }
    }

    /// Number of rings emitted so far
    pub fn emitted(&self) -> usize {
        self.next_id
    }

    /// Vertices of the ring still waiting for its closing point
    pub fn pending(&self) -> &[Vertex] {
        &self.open
    }
}

/// Split a flat coordinate stream into closed rings.
///
/// An odd-length stream fails before any ring is produced. A trailing ring
/// that never closes is dropped with a warning.
pub fn extract_rings(numbers: &[f64]) -> Result<Vec<Polygon>> {
    if numbers.len() % 2 != 0 {
        return Err(LakeError::MalformedStream {
            row: None,
            reason: MalformedReason::OddLength { len: numbers.len() },
        });
    }

    let mut extractor = RingExtractor::new();
    let rings: Vec<Polygon> = numbers
        .chunks_exact(2)
        .filter_map(|pair| extractor.push_pair(pair[0], pair[1]))
        .collect();

    if !extractor.pending().is_empty() {
        tracing::warn!(
            vertices = extractor.pending().len(),
            "coordinate stream ended inside an unclosed ring; dropping it"
        );
    }

    Ok(rings)
}
