use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use whosaid_eval::EvalReportRepository;
use whosaid_storage::Database;

#[derive(Args)]
pub struct ReportsArgs {
    /// SQLite database holding evaluation reports
    #[arg(long)]
    db: PathBuf,

    /// Only show reports for this recording
    #[arg(long)]
    uri: Option<String>,

    /// Maximum number of reports to show
    #[arg(long, default_value_t = 20)]
    limit: usize,
}

pub fn run(args: ReportsArgs) -> Result<()> {
    let db = Database::open(&args.db)
        .with_context(|| format!("opening database {}", args.db.display()))?;

    let reports = match &args.uri {
        Some(uri) => db.list_by_uri(uri)?,
        None => db.list()?,
    };

    if reports.is_empty() {
        println!("no reports");
        return Ok(());
    }
    for report in reports.iter().take(args.limit) {
        let der = report
            .curves
            .iter()
            .find(|c| c.metric == "der")
            .and_then(|c| c.overall_pct)
            .map(|pct| format!("{pct:.2}%"))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{}  {}  {}  DER {}",
            report.id,
            report.created_at.format("%Y-%m-%d %H:%M:%S"),
            report.uri,
            der,
        );
    }
    Ok(())
}
