use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use whosaid_rttm::transcript::{annotation_from_transcript, parse_transcript_file, transcript_uri};
use whosaid_rttm::write_rttm_file;

#[derive(Args)]
pub struct ConvertArgs {
    /// Transcript JSON file
    #[arg(long)]
    transcript: PathBuf,

    /// RTTM file to write
    #[arg(long)]
    output: PathBuf,

    /// Recording identifier (defaults to the transcript's episode id)
    #[arg(long)]
    uri: Option<String>,
}

pub fn run(args: ConvertArgs) -> Result<()> {
    let doc = parse_transcript_file(&args.transcript)
        .with_context(|| format!("loading transcript {}", args.transcript.display()))?;
    let annotation = annotation_from_transcript(&doc)?;

    let uri = args
        .uri
        .or_else(|| transcript_uri(&doc))
        .unwrap_or_else(|| super::uri_from_path(&args.transcript));

    write_rttm_file(&args.output, &uri, &annotation)?;
    println!(
        "{}: {} turns, {} speakers -> {}",
        uri,
        annotation.len(),
        annotation.labels().len(),
        args.output.display(),
    );
    Ok(())
}
