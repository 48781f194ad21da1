use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use whosaid_rttm::{ms_to_secs, parse_rttm_file};

#[derive(Args)]
pub struct SpeakersArgs {
    /// RTTM file to inspect
    rttm: PathBuf,
}

pub fn run(args: SpeakersArgs) -> Result<()> {
    let annotation = parse_rttm_file(&args.rttm)
        .with_context(|| format!("loading {}", args.rttm.display()))?;

    for speaker in annotation.labels() {
        let speech_secs = ms_to_secs(annotation.label_timeline(speaker).duration_ms());
        println!("{speaker}\t{speech_secs:.2}s");
    }
    println!(
        "{} speakers, {:.2}s of speech",
        annotation.labels().len(),
        ms_to_secs(annotation.speech_ms()),
    );
    Ok(())
}
