//! Per-source and batch driver.
//!
//! Each source goes through:
//! 1. Load polygons (raw export or processed vertex table)
//! 2. Optionally simplify heavily sampled outlines
//! 3. Landability verdict and statistics per polygon
//! 4. Passing polygons renumbered from 0, region boundary dropped
//!
//! A source that fails to load is recorded and skipped; a polygon that is
//! degenerate is recorded and skipped. Neither stops the batch.

use super::landability::{LandabilityAnalyzer, TraceSummary};
use super::outlier::remove_most_common_id;
use super::timing::Timings;
use crate::domain::{LandabilityVerdict, Polygon, PolygonCollection};
use crate::error::{DegenerateReason, LakeError, Result};
use crate::geometry::{EdgeLengthProfile, MetricKind, PolygonStatistics, simplify_polygon};
use crate::ingest::LoadOptions;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Layout of the polygon input files
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum InputFormat {
    /// Export with a free-text geometry column
    #[default]
    Raw,
    /// Processed Polygon,Latitude,Longitude table
    Vertices,
}

/// Everything that controls one analysis run
#[derive(Debug, Clone)]
pub struct AnalysisSettings {
    pub target_m: f64,
    pub metric: MetricKind,
    pub input_format: InputFormat,
    pub load: LoadOptions,
    /// Count `Passes*` polygons as detections
    pub include_low_resolution: bool,
    /// Drop the most heavily sampled passing polygon (the region boundary)
    pub remove_outlier: bool,
    /// RDP tolerance in meters applied before analysis
    pub simplify_m: Option<f64>,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            target_m: 500.0,
            metric: MetricKind::default(),
            input_format: InputFormat::default(),
            load: LoadOptions::default(),
            include_low_resolution: true,
            remove_outlier: true,
            simplify_m: None,
        }
    }
}

impl AnalysisSettings {
    fn counts_as_detection(&self, verdict: &LandabilityVerdict) -> bool {
        match verdict {
            LandabilityVerdict::Passes(_) => true,
            LandabilityVerdict::PassesLowResolution => self.include_low_resolution,
            LandabilityVerdict::Fails => false,
        }
    }
}

/// Verdict and statistics for one analyzed polygon
#[derive(Debug, Clone)]
pub struct PolygonOutcome {
    pub polygon_id: usize,
    pub verdict: LandabilityVerdict,
    pub statistics: PolygonStatistics,
    /// Counters of the pair grid, when the search was traced
    pub trace: Option<TraceSummary>,
}

/// A polygon that could not be analyzed
#[derive(Debug)]
pub struct RejectedPolygon {
    pub polygon_id: usize,
    pub error: LakeError,
}

/// Tallies for one source
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SourceCounts {
    pub total: usize,
    pub passed: usize,
    pub low_resolution: usize,
    pub failed: usize,
    pub rejected: usize,
}

impl SourceCounts {
    /// Share of analyzed polygons that did not fail, `Passes*` included
    pub fn percent_passed(&self) -> Option<f64> {
        let analyzed = self.passed + self.low_resolution + self.failed;
        if analyzed == 0 {
            return None;
        }
        Some(100.0 * (self.passed + self.low_resolution) as f64 / analyzed as f64)
    }
}

/// Everything learned from one source file
#[derive(Debug)]
pub struct SourceReport {
    pub source: PathBuf,
    pub outcomes: Vec<PolygonOutcome>,
    pub rejected: Vec<RejectedPolygon>,
    /// Passing polygons, renumbered from 0, before outlier removal
    pub passing: PolygonCollection,
    /// Passing polygons after outlier removal
    pub surviving: PolygonCollection,
    pub removed_outlier: Option<usize>,
}

impl SourceReport {
    pub fn counts(&self) -> SourceCounts {
        let mut counts = SourceCounts {
            total: self.outcomes.len() + self.rejected.len(),
            rejected: self.rejected.len(),
            ..Default::default()
        };
        for outcome in &self.outcomes {
            match outcome.verdict {
                LandabilityVerdict::Passes(_) => counts.passed += 1,
                LandabilityVerdict::PassesLowResolution => counts.low_resolution += 1,
                LandabilityVerdict::Fails => counts.failed += 1,
            }
        }
        counts
    }
}

/// Analyze one polygon: verdict, then statistics with the same metric.
///
/// With `trace_out`, the pair grid is written there row by row, between a
/// `polygon <id>` line and a `verdict: <label>` line.
pub fn analyze_polygon(
    polygon: &Polygon,
    analyzer: &LandabilityAnalyzer,
    trace_out: Option<&mut (dyn Write + '_)>,
) -> Result<PolygonOutcome> {
    let (verdict, trace) = match trace_out {
        Some(out) => {
            writeln!(out, "polygon {}", polygon.id())?;
            let (verdict, summary) = analyzer.evaluate_traced(polygon, out)?;
            writeln!(out, "verdict: {}", verdict)?;
            (verdict, Some(summary))
        }
        None => (analyzer.evaluate(polygon)?, None),
    };

    let metric = analyzer.metric().anchored_at(polygon.vertices()[0]);
    let profile = EdgeLengthProfile::compute(polygon.vertices(), &metric);
    let statistics = PolygonStatistics::from_profile(polygon, &profile).ok_or_else(|| {
        LakeError::DegeneratePolygon {
            id: polygon.id(),
            reason: DegenerateReason::TooFewVertices {
                distinct: polygon.distinct_vertex_count(),
            },
        }
    })?;

    Ok(PolygonOutcome {
        polygon_id: polygon.id(),
        verdict,
        statistics,
        trace,
    })
}

/// Load one source according to the settings' input format.
pub fn load_source(path: &Path, settings: &AnalysisSettings) -> Result<PolygonCollection> {
    match settings.input_format {
        InputFormat::Raw => PolygonCollection::load_with(path, &settings.load),
        InputFormat::Vertices => PolygonCollection::load_vertices(path, settings.load.max_count),
    }
}

/// Analyze an already loaded collection.
pub fn analyze_collection(
    source: &Path,
    collection: &PolygonCollection,
    settings: &AnalysisSettings,
) -> Result<SourceReport> {
    analyze_collection_traced(source, collection, settings, None)
}

/// [`analyze_collection`], streaming every polygon's pair grid to `trace_out`.
pub fn analyze_collection_traced(
    source: &Path,
    collection: &PolygonCollection,
    settings: &AnalysisSettings,
    mut trace_out: Option<&mut (dyn Write + '_)>,
) -> Result<SourceReport> {
    let analyzer = LandabilityAnalyzer::new(settings.target_m, settings.metric)?;

    let mut outcomes = Vec::new();
    let mut rejected = Vec::new();
    let mut passing = Vec::new();

    for polygon in collection {
        let polygon = match settings.simplify_m {
            Some(epsilon) => simplify_polygon(polygon, epsilon),
            None => polygon.clone(),
        };

        match analyze_polygon(&polygon, &analyzer, trace_out.as_deref_mut()) {
            Ok(outcome) => {
                if settings.counts_as_detection(&outcome.verdict) {
                    passing.push(polygon.renumbered(passing.len()));
                }
                outcomes.push(outcome);
            }
            Err(error) => {
                tracing::warn!(
                    source = %source.display(),
                    polygon = polygon.id(),
                    "skipping polygon: {}",
                    error
                );
                rejected.push(RejectedPolygon {
                    polygon_id: polygon.id(),
                    error,
                });
            }
        }
    }

    let passing = PolygonCollection::from_polygons(passing);
    let (surviving, removed_outlier) = if settings.remove_outlier {
        let (rows, removed) = remove_most_common_id(passing.to_rows());
        (PolygonCollection::from_rows(&rows, None), removed)
    } else {
        (passing.clone(), None)
    };

    if let Some(id) = removed_outlier {
        tracing::info!(source = %source.display(), polygon = id, "removed region boundary polygon");
    }

    Ok(SourceReport {
        source: source.to_path_buf(),
        outcomes,
        rejected,
        passing,
        surviving,
        removed_outlier,
    })
}

/// Load and analyze one source, optionally streaming pair grids to `trace_out`.
pub fn analyze_source(
    path: &Path,
    settings: &AnalysisSettings,
    timings: &Timings,
    trace_out: Option<&mut (dyn Write + '_)>,
) -> Result<SourceReport> {
    let _watch = timings.start(format!("analyze {}", path.display()));
    let collection = load_source(path, settings)?;
    analyze_collection_traced(path, &collection, settings, trace_out)
}

/// A source that could not be analyzed at all
#[derive(Debug)]
pub struct SourceFailure {
    pub source: PathBuf,
    pub error: LakeError,
}

/// Results over many sources
#[derive(Debug, Default)]
pub struct BatchReport {
    pub sources: Vec<SourceReport>,
    pub failures: Vec<SourceFailure>,
    /// Surviving polygons of every source under unique sequential IDs
    pub surviving: PolygonCollection,
}

impl BatchReport {
    pub fn counts(&self) -> SourceCounts {
        self.sources
            .iter()
            .map(SourceReport::counts)
            .fold(SourceCounts::default(), |acc, c| SourceCounts {
                total: acc.total + c.total,
                passed: acc.passed + c.passed,
                low_resolution: acc.low_resolution + c.low_resolution,
                failed: acc.failed + c.failed,
                rejected: acc.rejected + c.rejected,
            })
    }
}

/// Analyze every source, continuing past sources that fail.
pub fn run_batch(paths: &[PathBuf], settings: &AnalysisSettings, timings: &Timings) -> BatchReport {
    run_batch_traced(paths, settings, timings, None)
}

/// [`run_batch`], streaming every polygon's pair grid to `trace_out` as it
/// is searched.
pub fn run_batch_traced(
    paths: &[PathBuf],
    settings: &AnalysisSettings,
    timings: &Timings,
    mut trace_out: Option<&mut (dyn Write + '_)>,
) -> BatchReport {
    let mut batch = BatchReport::default();

    for path in paths {
        if let Some(out) = trace_out.as_deref_mut()
            && let Err(e) = writeln!(out, "source {}", path.display())
        {
            tracing::warn!("trace output failed: {}", e);
        }

        match analyze_source(path, settings, timings, trace_out.as_deref_mut()) {
            Ok(report) => {
                batch.surviving.extend_renumbered(&report.surviving);
                batch.sources.push(report);
            }
            Err(error) => {
                tracing::warn!(source = %path.display(), "skipping source: {}", error);
                batch.failures.push(SourceFailure {
                    source: path.clone(),
                    error,
                });
            }
        }
    }

    batch
}
