use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "whosaid", version, about = "Speaker-diarization evaluation toolkit")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Command {
    /// Score a hypothesis RTTM against a reference RTTM
    Eval(commands::eval::EvalArgs),
    /// Convert a transcript JSON file into a reference RTTM
    Convert(commands::convert::ConvertArgs),
    /// List the speakers of an RTTM file with their speech time
    Speakers(commands::speakers::SpeakersArgs),
    /// List evaluation reports stored in a database
    Reports(commands::reports::ReportsArgs),
}

fn init_tracing(verbose: u8) {
    let default_filter = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Eval(args) => commands::eval::run(args),
        Command::Convert(args) => commands::convert::run(args),
        Command::Speakers(args) => commands::speakers::run(args),
        Command::Reports(args) => commands::reports::run(args),
    }
}
