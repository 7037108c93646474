use anyhow::{Context, Result, bail};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;

use lakescan::analysis::{
    AnalysisSettings, BatchReport, InputFormat, Timings, ValidationReport, cross_validate,
    filter_markers, run_batch, run_batch_traced,
};
use lakescan::config::{DEFAULT_TARGET_METERS, FileConfig};
use lakescan::geometry::MetricKind;
use lakescan::ingest::{DEFAULT_GEOMETRY_COLUMN, LoadOptions, read_markers};
use lakescan::report::{
    RunSummary, write_detections, write_polygon_rows, write_source_report, write_summary_json,
};

/// Screen lake outline polygons for floatplane-landable straight runs
///
/// Examples:
///   # Analyze a raw Earth Engine export with the default 500 m target
///   lakescan lakes_export.csv
///
///   # Several exports, great-circle distances, results per source
///   lakescan north.csv south.csv --metric great-circle --results-dir out
///
///   # Re-analyze processed vertex tables and check against known bases
///   lakescan --input-format vertices polygons.csv --markers seaplane_bases.csv
///
///   # Inspect the search grid of the first few polygons
///   lakescan lakes_export.csv --max-polygons 3 --visualize
#[derive(Parser, Debug)]
#[command(name = "lakescan")]
#[command(version, about, long_about = None)]
struct Args {
    /// Polygon source CSV files (optional if listed in the config file)
    sources: Vec<PathBuf>,

    /// Path to config file (optional, auto-searches lakescan.toml if not provided)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Required straight run in meters [default: 500]
    #[arg(short = 't', long)]
    target_meters: Option<f64>,

    /// Distance metric [default: local-planar]
    #[arg(short = 'm', long)]
    metric: Option<MetricKind>,

    /// Input layout: raw geometry export or processed vertex table [default: raw]
    #[arg(long)]
    input_format: Option<InputFormat>,

    /// Analyze at most this many polygons per source
    #[arg(short = 'n', long)]
    max_polygons: Option<usize>,

    /// Geometry column of raw exports [default: .geo]
    #[arg(long)]
    geometry_column: Option<String>,

    /// Fail a source on rows without coordinates instead of skipping them
    #[arg(long)]
    strict: bool,

    /// Do not count polygons with edges longer than the target (Passes*) as detections
    #[arg(long)]
    exclude_low_resolution: bool,

    /// Keep the region boundary polygon instead of dropping the most sampled passing polygon
    #[arg(long)]
    keep_outlier: bool,

    /// Simplify outlines with this tolerance in meters before analysis
    #[arg(long)]
    simplify: Option<f64>,

    /// Directory for per-source results and passing-polygon tables
    #[arg(short = 'o', long)]
    results_dir: Option<PathBuf>,

    /// Write the merged passing polygons of all sources to this CSV
    #[arg(long)]
    export_passing: Option<PathBuf>,

    /// Ground-truth marker CSV (Lat, Long, LakeName[, floatplanes])
    #[arg(long)]
    markers: Option<PathBuf>,

    /// Where to write the marker detection table (needs a markers path)
    #[arg(long)]
    detected_output: Option<PathBuf>,

    /// Write a JSON summary of the run
    #[arg(long)]
    summary_json: Option<PathBuf>,

    /// Print the pruning offset and pair grid of every polygon
    #[arg(long)]
    visualize: bool,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let total_start = Instant::now();

    let file_config = if let Some(ref config_path) = args.config {
        if config_path.exists() {
            let contents = std::fs::read_to_string(config_path)
                .context(format!("Failed to read config file: {:?}", config_path))?;
            Some(toml::from_str(&contents).context("Failed to parse config file")?)
        } else {
            bail!("Config file not found: {:?}", config_path);
        }
    } else {
        FileConfig::load()
    };
    let file_config: FileConfig = file_config.unwrap_or_default();

    let verbose = args.verbose || file_config.verbose;
    init_tracing(verbose);

    let sources = if args.sources.is_empty() {
        file_config.sources.clone()
    } else {
        args.sources.clone()
    };
    if sources.is_empty() {
        bail!("No polygon sources given. Pass CSV paths or list `sources` in lakescan.toml");
    }

    let target_m = args.target_meters.unwrap_or(file_config.target_meters);
    let geometry_column = args
        .geometry_column
        .clone()
        .or_else(|| file_config.geometry_column.clone())
        .unwrap_or_else(|| DEFAULT_GEOMETRY_COLUMN.to_string());
    let markers_path = args.markers.clone().or_else(|| file_config.markers.clone());
    let detected_output = args
        .detected_output
        .clone()
        .or_else(|| file_config.detected_output.clone());
    let results_dir = args.results_dir.clone().or_else(|| file_config.results_dir.clone());
    let export_passing = args
        .export_passing
        .clone()
        .or_else(|| file_config.export_passing.clone());
    let summary_json = args
        .summary_json
        .clone()
        .or_else(|| file_config.summary_json.clone());

    let settings = AnalysisSettings {
        target_m,
        metric: args.metric.unwrap_or(file_config.metric),
        input_format: args.input_format.unwrap_or(file_config.input_format),
        load: LoadOptions::default()
            .with_max_count(args.max_polygons.or(file_config.max_polygons))
            .with_geometry_column(geometry_column)
            .with_strict(args.strict || file_config.strict),
        include_low_resolution: !args.exclude_low_resolution && file_config.include_low_resolution,
        remove_outlier: !args.keep_outlier,
        simplify_m: args.simplify.or(file_config.simplify_meters),
    };
    let visualize = args.visualize || file_config.visualize;

    if !target_m.is_finite() || target_m < 0.0 {
        bail!("Target length must be a non-negative number of meters, got {}", target_m);
    }

    println!("lakescan - Floatplane Lake Screening");
    println!("====================================");
    println!();

    if verbose {
        println!("Configuration:");
        println!("  Sources: {}", sources.len());
        println!("  Target: {}m", settings.target_m);
        if (settings.target_m - DEFAULT_TARGET_METERS).abs() > f64::EPSILON {
            println!("    (default is {}m)", DEFAULT_TARGET_METERS);
        }
        println!("  Metric: {:?}", settings.metric);
        println!("  Input format: {:?}", settings.input_format);
        if settings.input_format == InputFormat::Raw {
            println!("  Geometry column: {}", settings.load.geometry_column);
        }
        if let Some(max) = settings.load.max_count {
            println!("  Max polygons per source: {}", max);
        }
        println!("  Strict rows: {}", settings.load.strict);
        println!(
            "  Passes* counted: {}",
            if settings.include_low_resolution { "yes" } else { "no" }
        );
        if let Some(eps) = settings.simplify_m {
            println!("  Simplify tolerance: {}m", eps);
        }
        if let Some(ref m) = markers_path {
            println!("  Markers: {}", m.display());
        }
        println!();
    }

    let timings = Timings::new();

    let start = Instant::now();
    let batch = if visualize {
        // Grids go straight to stdout while each polygon is searched
        let mut out = BufWriter::new(std::io::stdout().lock());
        let batch = run_batch_traced(&sources, &settings, &timings, Some(&mut out));
        out.flush().context("Failed to write search grids")?;
        batch
    } else {
        let spinner = create_spinner("Analyzing polygon sources...");
        let batch = run_batch(&sources, &settings, &timings);
        spinner.finish_and_clear();
        batch
    };
    println!(
        "Analyzed {} polygons from {} sources [{:.1}s]",
        batch.counts().total,
        batch.sources.len(),
        start.elapsed().as_secs_f32()
    );

    if batch.sources.is_empty() {
        for failure in &batch.failures {
            eprintln!("  {}: {}", failure.source.display(), failure.error);
        }
        bail!("No source could be analyzed");
    }

    print_source_table(&batch, verbose);

    if let Some(ref dir) = results_dir {
        let spinner = create_spinner("Writing results tables...");
        let start = Instant::now();
        for report in &batch.sources {
            write_source_report(dir, report).with_context(|| {
                format!("Failed to write results for {}", report.source.display())
            })?;
        }
        spinner.finish_with_message(format!(
            "Wrote {} results tables to {} [{:.1}s]",
            batch.sources.len(),
            dir.display(),
            start.elapsed().as_secs_f32()
        ));
    }

    if let Some(ref path) = export_passing {
        write_polygon_rows(path, &batch.surviving)
            .context("Failed to write passing polygon table")?;
        println!(
            "Exported {} passing polygons to {}",
            batch.surviving.len(),
            path.display()
        );
    }

    if detected_output.is_some() && markers_path.is_none() {
        tracing::warn!("detected_output is set but no markers table was given; skipping it");
    }

    let validation = if let Some(ref path) = markers_path {
        let spinner = create_spinner("Validating against markers...");
        let start = Instant::now();
        let markers = read_markers(path).context("Failed to read marker table")?;
        let read = markers.len();
        let roi = file_config.roi_polygon();
        let markers = filter_markers(markers, roi.as_ref());
        let report = cross_validate(markers, &batch.surviving);
        spinner.finish_with_message(format!(
            "Checked {} of {} markers [{:.1}s]",
            report.considered(),
            read,
            start.elapsed().as_secs_f32()
        ));
        print_validation(&report);

        if let Some(ref out) = detected_output {
            write_detections(out, &report).context("Failed to write detection table")?;
            println!("Detection table: {}", out.display());
        }
        Some(report)
    } else {
        None
    };

    if let Some(ref path) = summary_json {
        let summary = RunSummary::new(&settings, &batch, validation.as_ref(), timings.entries());
        write_summary_json(path, &summary).context("Failed to write summary JSON")?;
        println!("Summary: {}", path.display());
    }

    println!();
    println!(
        "Done! Total time: {:.1}s",
        total_start.elapsed().as_secs_f32()
    );

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn print_source_table(batch: &BatchReport, verbose: bool) {
    println!();
    println!("Results");
    println!("=======");
    for report in &batch.sources {
        let counts = report.counts();
        println!("{}", report.source.display());
        println!(
            "  {} polygons: {} pass, {} pass*, {} fail, {} rejected",
            counts.total, counts.passed, counts.low_resolution, counts.failed, counts.rejected
        );
        if let Some(pct) = counts.percent_passed() {
            println!("  {:.1}% passed", pct);
        }
        if let Some(id) = report.removed_outlier {
            println!("  Dropped region boundary (passing polygon {})", id);
        }

        if verbose {
            for outcome in &report.outcomes {
                let stats = &outcome.statistics;
                println!(
                    "    #{:<5} {:<7} ({:.5}, {:.5}) {} vertices, perimeter {:.0}m, edges {:.1}-{:.1}m",
                    outcome.polygon_id,
                    outcome.verdict.label(),
                    stats.centroid.lat,
                    stats.centroid.lon,
                    stats.vertex_count,
                    stats.perimeter_m,
                    stats.edge_min_m,
                    stats.edge_max_m
                );
            }
            for rejected in &report.rejected {
                println!("    #{:<5} skipped: {}", rejected.polygon_id, rejected.error);
            }
        }
    }

    for failure in &batch.failures {
        println!("{}", failure.source.display());
        println!("  failed: {}", failure.error);
    }

    println!();
    println!("Passing polygons kept: {}", batch.surviving.len());
}

fn print_validation(report: &ValidationReport) {
    match report.detection_rate() {
        Some(rate) => println!(
            "  Detected {} of {} floatplane markers ({:.1}%)",
            report.detected(),
            report.considered(),
            rate
        ),
        None => println!("  No floatplane markers inside the region of interest"),
    }
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    pb
}
