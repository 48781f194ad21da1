use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use whosaid_eval::{EvalReport, EvalReportRepository, Evaluator, WindowConfig};
use whosaid_metrics::{DerMetric, JerMetric};
use whosaid_rttm::parse_rttm_file;
use whosaid_storage::Database;

#[derive(Args)]
pub struct EvalArgs {
    /// Ground-truth RTTM file
    #[arg(long)]
    reference: PathBuf,

    /// System-output RTTM file
    #[arg(long)]
    hypothesis: PathBuf,

    /// Recording identifier (defaults to the reference file name)
    #[arg(long)]
    uri: Option<String>,

    /// Cumulative window growth per point, in seconds
    #[arg(long, default_value_t = 30.0)]
    window_secs: f64,

    /// Window advancement per scoring round, in seconds
    #[arg(long, default_value_t = 15.0)]
    step_secs: f64,

    /// Which metrics to compute
    #[arg(long, value_enum, default_value = "all")]
    metric: MetricChoice,

    /// Write the JSON report to this file
    #[arg(long)]
    output: Option<PathBuf>,

    /// Persist the report into this SQLite database
    #[arg(long)]
    db: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MetricChoice {
    Der,
    Jer,
    All,
}

pub fn run(args: EvalArgs) -> Result<()> {
    let reference = parse_rttm_file(&args.reference)
        .with_context(|| format!("loading reference {}", args.reference.display()))?;
    let hypothesis = parse_rttm_file(&args.hypothesis)
        .with_context(|| format!("loading hypothesis {}", args.hypothesis.display()))?;

    let config = WindowConfig::from_secs(args.window_secs, args.step_secs)?;
    let mut evaluator = Evaluator::new(config)?;
    if matches!(args.metric, MetricChoice::Der | MetricChoice::All) {
        evaluator = evaluator.with_metric(Box::new(DerMetric::new()));
    }
    if matches!(args.metric, MetricChoice::Jer | MetricChoice::All) {
        evaluator = evaluator.with_metric(Box::new(JerMetric::new()));
    }

    let uri = args
        .uri
        .unwrap_or_else(|| super::uri_from_path(&args.reference));
    let report = evaluator.evaluate(&uri, &reference, &hypothesis)?;
    print_report(&report);

    if let Some(path) = &args.output {
        let file = File::create(path)
            .with_context(|| format!("creating report file {}", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), &report)?;
        println!("report written to {}", path.display());
    }
    if let Some(path) = &args.db {
        let db = Database::open(path)
            .with_context(|| format!("opening database {}", path.display()))?;
        db.save(&report)?;
        println!("report {} saved to {}", report.id, path.display());
    }
    Ok(())
}

fn print_report(report: &EvalReport) {
    println!(
        "{} (window {:.0}s, step {:.0}s)",
        report.uri,
        report.window.window_ms as f64 / 1000.0,
        report.window.step_ms as f64 / 1000.0,
    );

    for curve in &report.curves {
        println!("\n{} curve:", curve.metric);
        if curve.points.is_empty() {
            println!("  (no scorable windows)");
        }
        for point in &curve.points {
            println!("  {:6.1}%  ->  {:6.2}%", point.coverage_pct, point.error_pct);
        }
        if let Some(overall) = curve.overall_pct {
            println!("  overall: {overall:.2}%");
        }
    }

    if let Some(der) = &report.der {
        let pct = |ms: u64| ms as f64 / der.total_ms as f64 * 100.0;
        println!(
            "\nDER breakdown: missed {:.2}%  false alarm {:.2}%  confusion {:.2}%",
            pct(der.missed_ms),
            pct(der.false_alarm_ms),
            pct(der.confusion_ms),
        );
    }
}
