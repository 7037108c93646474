//! Naive floatplane landability search.
//!
//! A polygon passes when two of its vertices are at least the target length
//! apart. Whether the straight line between them actually stays on the
//! water is NOT checked, so thin concave outlines (an S-shaped lake) can pass
//! without having a usable run.
//!
//! # Pruning
//! Every edge is at most `longest_edge` long, so two vertices fewer than
//! `floor(target / longest_edge)` steps apart along the vertex list are
//! assumed unable to reach the target and are skipped. Index distance is
//! measured linearly, not around the ring: a pair with a small index gap is
//! skipped even when the way round through index 0 is long, and neighbours
//! across the seam are still measured.

use crate::domain::{Diagonal, LandabilityVerdict, Polygon, Vertex};
use crate::error::{DegenerateReason, LakeError, Result};
use crate::geometry::{DistanceMetric, EdgeLengthProfile, Metric, MetricKind};
use serde::Serialize;
use std::io::Write;

/// Decides landability for polygons against a fixed target length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LandabilityAnalyzer {
    target_m: f64,
    metric: MetricKind,
}

impl LandabilityAnalyzer {
    /// # Arguments
    /// * `target_m` - Required straight-line run in meters
    /// * `metric` - Distance strategy, anchored per polygon at its first vertex
    pub fn new(target_m: f64, metric: MetricKind) -> Result<Self> {
        if !target_m.is_finite() || target_m < 0.0 {
            return Err(LakeError::InvalidTarget(target_m));
        }
        Ok(Self { target_m, metric })
    }

    pub fn target_m(&self) -> f64 {
        self.target_m
    }

    pub fn metric(&self) -> MetricKind {
        self.metric
    }

    /// Verdict for one polygon, stopping at the first qualifying diagonal.
    pub fn evaluate(&self, polygon: &Polygon) -> Result<LandabilityVerdict> {
        let metric = self.prepare(polygon)?;
        search(polygon, self.target_m, &metric, None)
    }

    /// Verdict plus the full grid of evaluated pairs, for manual inspection.
    ///
    /// Every pair outside the pruning window is measured and each row of the
    /// grid is written to `sink` as soon as it is finished; only counters
    /// are kept. The verdict is the same as [`evaluate`](Self::evaluate)
    /// would return.
    pub fn evaluate_traced(
        &self,
        polygon: &Polygon,
        sink: &mut dyn Write,
    ) -> Result<(LandabilityVerdict, TraceSummary)> {
        let metric = self.prepare(polygon)?;
        let mut trace = SearchTrace::new(sink, polygon.len());
        let verdict = search(polygon, self.target_m, &metric, Some(&mut trace))?;
        Ok((verdict, trace.summary()))
    }

    fn prepare(&self, polygon: &Polygon) -> Result<Metric> {
        polygon.ensure_enough_vertices()?;
        Ok(self.metric.anchored_at(polygon.vertices()[0]))
    }
}

/// `floor(target / longest_edge)`, or a degenerate-polygon error when the
/// longest edge is zero or not a number.
pub fn min_index_offset(polygon_id: usize, target_m: f64, longest_edge_m: f64) -> Result<usize> {
    if !(longest_edge_m.is_finite() && longest_edge_m > 0.0) {
        return Err(LakeError::DegeneratePolygon {
            id: polygon_id,
            reason: DegenerateReason::ZeroLengthEdges {
                longest: longest_edge_m,
            },
        });
    }
    // Float to usize saturates, so an absurd ratio just prunes everything
    Ok((target_m / longest_edge_m).floor() as usize)
}

/// Core search with an explicit metric.
///
/// With a `trace`, short-circuiting is disabled and every pair's outcome is
/// streamed to the trace's sink; the first qualifying pair in row-major
/// order is still the one returned.
pub fn search<M: DistanceMetric>(
    polygon: &Polygon,
    target_m: f64,
    metric: &M,
    mut trace: Option<&mut SearchTrace<'_>>,
) -> Result<LandabilityVerdict> {
    polygon.ensure_enough_vertices()?;
    let vertices = polygon.vertices();

    let profile = EdgeLengthProfile::compute(vertices, metric);
    let offset = min_index_offset(polygon.id(), target_m, profile.longest())?;

    tracing::debug!(
        polygon = polygon.id(),
        longest_edge_m = profile.longest(),
        min_index_offset = offset,
        "pruning bound"
    );

    if let Some(t) = trace.as_deref_mut() {
        t.begin(offset)?;
    }

    if offset == 0 {
        return Ok(LandabilityVerdict::PassesLowResolution);
    }

    let n = vertices.len();
    let mut found: Option<Diagonal> = None;

    for i in 0..n {
        // Pairs with i >= j - offset are pruned, i.e. only j > i + offset survive
        let first_j = i.saturating_add(offset).saturating_add(1);

        match trace.as_deref_mut() {
            None => {
                for j in first_j..n {
                    if let Some(d) = qualifies(vertices, i, j, target_m, metric) {
                        return Ok(LandabilityVerdict::Passes(d));
                    }
                }
            }
            Some(t) => {
                for j in 0..n {
                    if j < first_j {
                        t.record(PairOutcome::Pruned)?;
                        continue;
                    }
                    match qualifies(vertices, i, j, target_m, metric) {
                        Some(d) => {
                            t.record(PairOutcome::Qualifies)?;
                            found.get_or_insert(d);
                        }
                        None => t.record(PairOutcome::TooShort)?,
                    }
                }
                t.end_row()?;
            }
        }
    }

    Ok(match found {
        Some(d) => LandabilityVerdict::Passes(d),
        None => LandabilityVerdict::Fails,
    })
}

fn qualifies<M: DistanceMetric>(
    vertices: &[Vertex],
    i: usize,
    j: usize,
    target_m: f64,
    metric: &M,
) -> Option<Diagonal> {
    let length_m = metric.distance(vertices[i], vertices[j]);
    (length_m >= target_m).then_some(Diagonal {
        from: i,
        to: j,
        length_m,
    })
}

/// What happened to one (i, j) pair during a traced search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairOutcome {
    /// Inside the pruning window, never measured
    Pruned,
    TooShort,
    Qualifies,
}

impl PairOutcome {
    /// `~` pruned, `0` too short, `1` qualifying
    pub fn symbol(self) -> char {
        match self {
            PairOutcome::Pruned => '~',
            PairOutcome::TooShort => '0',
            PairOutcome::Qualifies => '1',
        }
    }
}

/// Streams the pair grid of a traced search, one text row per `i`.
///
/// Output is `min_index_offset: k` followed, unless `k` is 0, by n rows of
/// space-separated symbols (see [`PairOutcome::symbol`]). Nothing of the
/// grid is kept beyond the counters in [`TraceSummary`].
pub struct SearchTrace<'w> {
    sink: &'w mut dyn Write,
    summary: TraceSummary,
}

impl<'w> SearchTrace<'w> {
    pub fn new(sink: &'w mut dyn Write, vertex_count: usize) -> Self {
        Self {
            sink,
            summary: TraceSummary {
                vertex_count,
                ..Default::default()
            },
        }
    }

    fn begin(&mut self, offset: usize) -> Result<()> {
        self.summary.min_index_offset = Some(offset);
        writeln!(self.sink, "min_index_offset: {}", offset)?;
        Ok(())
    }

    fn record(&mut self, outcome: PairOutcome) -> Result<()> {
        match outcome {
            PairOutcome::Pruned => {}
            PairOutcome::TooShort => self.summary.evaluated += 1,
            PairOutcome::Qualifies => {
                self.summary.evaluated += 1;
                self.summary.qualifying += 1;
            }
        }
        write!(self.sink, " {}", outcome.symbol())?;
        Ok(())
    }

    fn end_row(&mut self) -> Result<()> {
        writeln!(self.sink)?;
        Ok(())
    }

    pub fn summary(&self) -> TraceSummary {
        self.summary
    }
}

/// Counters left over from a traced search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TraceSummary {
    pub vertex_count: usize,
    /// Offset the search used; `None` if it stopped before computing one
    pub min_index_offset: Option<usize>,
    /// Pairs that were actually measured
    pub evaluated: usize,
    pub qualifying: usize,
}
