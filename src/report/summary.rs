use crate::analysis::{
    AnalysisSettings, BatchReport, SourceCounts, Timing, ValidationReport, ValidationTally,
};
use crate::error::Result;
use crate::geometry::MetricKind;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize)]
pub struct SourceSummary {
    pub source: PathBuf,
    #[serde(flatten)]
    pub counts: SourceCounts,
    pub percent_passed: Option<f64>,
    pub removed_outlier: Option<usize>,
    pub surviving: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct FailureSummary {
    pub source: PathBuf,
    pub error: String,
}

/// Machine-readable record of one run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub target_meters: f64,
    pub metric: MetricKind,
    pub sources: Vec<SourceSummary>,
    pub failures: Vec<FailureSummary>,
    pub totals: SourceCounts,
    pub surviving_polygons: usize,
    pub validation: Option<ValidationTally>,
    pub timings: Vec<Timing>,
}

impl RunSummary {
    pub fn new(
        settings: &AnalysisSettings,
        batch: &BatchReport,
        validation: Option<&ValidationReport>,
        timings: Vec<Timing>,
    ) -> Self {
        let sources = batch
            .sources
            .iter()
            .map(|report| {
                let counts = report.counts();
                SourceSummary {
                    source: report.source.clone(),
                    counts,
                    percent_passed: counts.percent_passed(),
                    removed_outlier: report.removed_outlier,
                    surviving: report.surviving.len(),
                }
            })
            .collect();

        let failures = batch
            .failures
            .iter()
            .map(|f| FailureSummary {
                source: f.source.clone(),
                error: f.error.to_string(),
            })
            .collect();

        Self {
            target_meters: settings.target_m,
            metric: settings.metric,
            sources,
            failures,
            totals: batch.counts(),
            surviving_polygons: batch.surviving.len(),
            validation: validation.map(ValidationReport::tally),
            timings,
        }
    }
}

/// Write the summary as pretty-printed JSON.
pub fn write_summary_json(path: &Path, summary: &RunSummary) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, summary).map_err(std::io::Error::from)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}
