//! CLI entry point: unpack the dataset, integrate it and print the analysis.

use anyhow::Result;
use clap::{Parser, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;
use tmdb_etl::views::{self, DecadeTypeCounts, GenreShare, YearCounts};
use tmdb_etl::{CsvIntegrator, EtlConfig, ExtractionReport, FragmentOrder, echo_report, unpack_archive};
use tracing::{info, warn};

/// CLI-compatible fragment order enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliFragmentOrder {
    /// Process fragments sorted by file name
    Lexical,
    /// Process fragments in directory listing order
    Listing,
}

impl From<CliFragmentOrder> for FragmentOrder {
    fn from(cli: CliFragmentOrder) -> Self {
        match cli {
            CliFragmentOrder::Lexical => FragmentOrder::Lexical,
            CliFragmentOrder::Listing => FragmentOrder::Listing,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    version,
    about = "TV-series dataset extraction and analysis",
    long_about = "Unpacks the TMDB series archive, integrates its CSV files three ways \
                  and prints the derived views, filters and chart data.\n\n\
                  EXAMPLES:\n  \
                  # Default layout (data/TMDB.zip, reports in docs/)\n  \
                  tmdb-etl\n\n  \
                  # Chart data as JSON\n  \
                  tmdb-etl --json | jq .genre_share"
)]
struct Args {
    /// Directory holding the archive and the extracted CSV files
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Archive to unpack (defaults to <data-dir>/TMDB.zip)
    #[arg(long)]
    archive: Option<PathBuf>,

    /// Directory holding the text reports
    #[arg(long, default_value = "docs")]
    reports_dir: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,

    /// Order in which CSV fragments are processed
    #[arg(long, value_enum, default_value = "lexical")]
    order: CliFragmentOrder,

    /// Print chart data and timings as JSON instead of the text walkthrough
    ///
    /// Disables all logging so stdout only holds the JSON document.
    #[arg(long)]
    json: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Elapsed seconds of the three integration routines.
#[derive(Debug, Serialize)]
struct Timings {
    merge_table: f64,
    rows_by_key: f64,
    columns_by_name: f64,
}

/// Everything `--json` prints.
#[derive(Debug, Serialize)]
struct JsonSummary {
    extraction: Option<ExtractionReport>,
    timings: Timings,
    rows: usize,
    columns: usize,
    series_per_year: Option<YearCounts>,
    series_per_decade_and_type: Option<DecadeTypeCounts>,
    genre_share: Option<GenreShare>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    let mut builder = EtlConfig::builder()
        .data_dir(&args.data_dir)
        .reports_dir(&args.reports_dir)
        .fragment_order(args.order.into());
    if let Some(ref archive) = args.archive {
        builder = builder.archive_path(archive);
    }
    let config = builder.build()?;

    if args.json {
        return run_json(&config);
    }
    run(&config)
}

fn banner(title: &str) {
    println!("\n{}", "=".repeat(80));
    println!("{title}");
    println!("{}", "=".repeat(80));
}

/// Text walkthrough of the whole analysis.
///
/// Uses `println!` for the results; diagnostics go through `tracing`.
fn run(config: &EtlConfig) -> Result<()> {
    banner("ARCHIVE EXTRACTION");
    if let Some(report) = unpack_archive(&config.archive_path) {
        println!(
            "Extracted {} files from {} into {}",
            report.files_extracted,
            report.archive.display(),
            report.destination.display()
        );
    }

    banner("CSV INTEGRATION");
    let integrator = CsvIntegrator::new(config.load.clone());
    let merged = integrator.merge_table(&config.data_dir);
    println!("Merged table built in {} seconds", merged.elapsed_secs());
    let rows = integrator.rows_by_key(&config.data_dir);
    println!(
        "Row-keyed map ({} keys) built in {} seconds",
        rows.value.len(),
        rows.elapsed_secs()
    );
    let columns = integrator.columns_by_name(&config.data_dir);
    println!(
        "Column-keyed map ({} columns) built in {} seconds",
        columns.value.len(),
        columns.elapsed_secs()
    );

    let report_paths = config.report_paths();
    if let Some(path) = report_paths.first() {
        banner("READING COMPARISON");
        print_report(path);
    }

    let df = views::add_time_on_air(merged.into_value());

    banner(&format!("TOP {} BY TIME ON AIR", config.top_n));
    match views::longest_running(&df, config.top_n) {
        Ok(top) => println!("{top}"),
        Err(e) => warn!("Cannot rank by time on air: {}", e),
    }

    banner(&format!("FIRST {} POSTER LINKS", config.preview_len));
    match views::poster_lookup(&df) {
        Ok(lookup) => {
            for (name, links) in views::preview(&lookup, config.preview_len) {
                println!("{name}: {links}");
            }
        }
        Err(e) => warn!("Cannot build poster lookup: {}", e),
    }

    banner("ENGLISH MYSTERY OR CRIME SERIES");
    match views::english_mystery_or_crime(&df) {
        Ok(names) => {
            for name in &names {
                println!("  {name}");
            }
            println!("({} series)", names.len());
        }
        Err(e) => warn!("Cannot filter by overview: {}", e),
    }

    banner(&format!("CANCELLED SERIES STARTED IN {}", config.cancelled_year));
    match views::cancelled_in_year(&df, config.cancelled_year, config.listing_limit) {
        Ok(names) => println!("{names:?}"),
        Err(e) => warn!("Cannot filter cancelled series: {}", e),
    }

    banner("JAPANESE-LANGUAGE SERIES");
    match views::japanese_series(&df, config.listing_limit) {
        Ok(japanese) => println!("{japanese}"),
        Err(e) => warn!("Cannot filter by language: {}", e),
    }

    banner("SERIES PER START YEAR");
    match views::series_per_year(&df) {
        Ok(years) => {
            for (year, count) in &years.counts {
                println!("  {year}: {count}");
            }
        }
        Err(e) => warn!("Cannot count series per year: {}", e),
    }

    banner(&format!("SERIES PER DECADE AND TYPE SINCE {}", config.decade_start));
    match views::series_per_decade_and_type(&df, config.decade_start) {
        Ok(counts) => {
            println!("{:<8} {}", "Decade", counts.types.join(" | "));
            for (decade, row) in &counts.decades {
                let cells: Vec<String> = counts
                    .types
                    .iter()
                    .map(|t| row.get(t).copied().unwrap_or(0).to_string())
                    .collect();
                println!("{:<8} {}", decade, cells.join(" | "));
            }
        }
        Err(e) => warn!("Cannot count series per decade: {}", e),
    }

    banner("GENRE SHARE");
    match views::genre_share(&df, config.genre_other_threshold) {
        Ok(share) => {
            for slice in &share.slices {
                println!("  {:<24} {:>5.1}%", slice.genre, slice.percent);
            }
        }
        Err(e) => warn!("Cannot compute genre share: {}", e),
    }

    if let Some(path) = report_paths.get(1) {
        banner("CONCLUSIONS");
        print_report(path);
    }

    info!("Analysis finished");
    Ok(())
}

fn print_report(path: &std::path::Path) {
    match echo_report(path) {
        Some(text) => println!("{text}"),
        None => println!("Report not available: {}", path.display()),
    }
}

/// Chart data and timings as one JSON document on stdout.
fn run_json(config: &EtlConfig) -> Result<()> {
    let extraction = unpack_archive(&config.archive_path);

    let integrator = CsvIntegrator::new(config.load.clone());
    let merged = integrator.merge_table(&config.data_dir);
    let rows = integrator.rows_by_key(&config.data_dir);
    let columns = integrator.columns_by_name(&config.data_dir);

    let timings = Timings {
        merge_table: merged.elapsed_secs(),
        rows_by_key: rows.elapsed_secs(),
        columns_by_name: columns.elapsed_secs(),
    };
    let df = merged.into_value();

    let summary = JsonSummary {
        extraction,
        timings,
        rows: df.height(),
        columns: df.width(),
        series_per_year: views::series_per_year(&df).ok(),
        series_per_decade_and_type: views::series_per_decade_and_type(&df, config.decade_start)
            .ok(),
        genre_share: views::genre_share(&df, config.genre_other_threshold).ok(),
    };

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
