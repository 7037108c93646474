//! Output tables and run summaries.

pub mod summary;
pub mod tables;

pub use summary::{FailureSummary, RunSummary, SourceSummary, write_summary_json};
pub use tables::{
    ResultRow, result_rows, results_path, vertices_path, write_detections, write_polygon_rows,
    write_results, write_source_report,
};
