//! rsid-lens CLI - RSID authorship analysis for `.docx` files.
//!
//! # Usage
//!
//! ```bash
//! # Analyze and write rsid_report.html (+ bar chart and heatmap) to the working directory
//! rsid-lens essay.docx
//!
//! # Choose outputs and tighten the bulk threshold
//! rsid-lens essay.docx --report out/essay.html --csv out/essay.csv --median-multiple 5
//!
//! # Read thresholds from a config file
//! rsid-lens essay.docx --config rsid-lens.toml -v
//! ```

mod config;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use rsid_lens::{
    AnalysisOptions, DEFAULT_CHART_FILE, DEFAULT_HEATMAP_FILE, DEFAULT_REPORT_FILE, ReportOutputs,
    RsidError, Stage, analyze_path, write_reports,
};
use tracing_subscriber::EnvFilter;

/// Infer typing vs. bulk insertion from the revision save identifiers in a .docx file.
#[derive(Parser)]
#[command(name = "rsid-lens", version, about)]
struct Cli {
    /// Path to the .docx document
    document: PathBuf,

    /// HTML report destination
    #[arg(long)]
    report: Option<PathBuf>,

    /// Bar chart PNG destination (defaults to a file next to the report)
    #[arg(long)]
    chart: Option<PathBuf>,

    /// Heatmap PNG destination (defaults to a file next to the report)
    #[arg(long)]
    heatmap: Option<PathBuf>,

    /// Skip the bar chart and the heatmap
    #[arg(long)]
    no_chart: bool,

    /// Also write statistics as CSV
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Also write statistics as JSON
    #[arg(long)]
    json: Option<PathBuf>,

    /// Container member to analyze
    #[arg(long)]
    part: Option<String>,

    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Bulk threshold as a multiple of the median per-identifier word count
    #[arg(long)]
    median_multiple: Option<f64>,

    /// Largest run count still treated as a single insertion
    #[arg(long)]
    max_bulk_runs: Option<usize>,

    /// Minimum tagged identifiers before classifying
    #[arg(long)]
    min_identifiers: Option<usize>,

    /// Do not print the statistics table to stdout
    #[arg(short, long)]
    quiet: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn exit_code(stage: Option<Stage>) -> u8 {
    match stage {
        Some(Stage::Extract) => 2,
        Some(Stage::Parse) => 3,
        Some(Stage::Config) => 4,
        Some(Stage::Render) => 5,
        Some(Stage::Io) | None => 1,
    }
}

fn resolve(cli: &Cli) -> Result<(AnalysisOptions, ReportOutputs)> {
    let file = match &cli.config {
        Some(path) => config::load(path)?,
        None => config::FileConfig::default(),
    };

    let mut options = AnalysisOptions::default();
    if let Some(part) = file.part {
        options.part = part;
    }
    if let Some(classifier) = file.classifier {
        options.classifier = classifier;
    }
    if let Some(part) = &cli.part {
        options.part.clone_from(part);
    }
    if let Some(multiple) = cli.median_multiple {
        options.classifier.median_multiple = multiple;
    }
    if let Some(runs) = cli.max_bulk_runs {
        options.classifier.max_bulk_run_count = runs;
    }
    if let Some(count) = cli.min_identifiers {
        options.classifier.min_identifiers = count;
    }

    let report = cli
        .report
        .clone()
        .or(file.output.report)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_REPORT_FILE));
    let charts = !cli.no_chart && cfg!(feature = "chart");
    let chart = charts.then(|| {
        cli.chart
            .clone()
            .or(file.output.chart)
            .unwrap_or_else(|| report.with_file_name(DEFAULT_CHART_FILE))
    });
    let heatmap = charts.then(|| {
        cli.heatmap
            .clone()
            .or(file.output.heatmap)
            .unwrap_or_else(|| report.with_file_name(DEFAULT_HEATMAP_FILE))
    });
    let outputs = ReportOutputs {
        html: Some(report),
        chart,
        heatmap,
        csv: cli.csv.clone().or(file.output.csv),
        json: cli.json.clone().or(file.output.json),
    };
    Ok((options, outputs))
}

fn run(cli: &Cli) -> Result<()> {
    let (options, outputs) = resolve(cli)?;
    let analysis = analyze_path(&cli.document, &options)?;

    let title = cli
        .document
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| cli.document.display().to_string());
    let written = write_reports(&title, &analysis, &outputs)?;

    if !cli.quiet {
        let stats = analysis.statistics();
        println!(
            "{:<12} {:>8} {:>6} {:>6}  verdict",
            "rsid", "words", "runs", "block"
        );
        for row in &stats.rows {
            println!(
                "{:<12} {:>8} {:>6} {:>6}  {}",
                row.identifier,
                row.word_count,
                row.run_count,
                row.max_contiguous_span,
                row.verdict.label()
            );
        }
        for advisory in &stats.advisories {
            println!("note: {advisory}");
        }
        for path in &written.paths {
            println!("wrote {}", path.display());
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let stage = err.downcast_ref::<RsidError>().map(RsidError::stage);
            match stage {
                Some(stage) => eprintln!("error [{}]: {err:#}", stage.label()),
                None => eprintln!("error: {err:#}"),
            }
            ExitCode::from(exit_code(stage))
        }
    }
}
