pub mod landability;
pub mod outlier;
pub mod pipeline;
pub mod timing;
pub mod validate;

pub use landability::{
    LandabilityAnalyzer, PairOutcome, SearchTrace, TraceSummary, min_index_offset, search,
};
pub use outlier::{most_common_id, remove_most_common_id};
pub use pipeline::{
    AnalysisSettings, BatchReport, InputFormat, PolygonOutcome, RejectedPolygon, SourceCounts,
    SourceFailure, SourceReport, analyze_collection, analyze_collection_traced, analyze_polygon,
    analyze_source, load_source, run_batch, run_batch_traced,
};
pub use timing::{Stopwatch, Timing, Timings};
pub use validate::{ValidationReport, ValidationTally, cross_validate, filter_markers};
