use clap::Parser;
use metronome::{Runtime, RuntimeError, Snapshot, TimerConfig};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Run a sequence of named countdown intervals.
#[derive(Parser, Debug)]
#[command(name = "metronome", version, about)]
struct Args {
    /// Timer configuration (.toml or .json); the two-interval demo run if omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the tick period in milliseconds
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Print every transition as a JSON snapshot
    #[arg(long)]
    json: bool,
}

fn print_snapshot(snapshot: &Snapshot, json: bool) {
    if json {
        match serde_json::to_string(snapshot) {
            Ok(line) => println!("{line}"),
            Err(e) => eprintln!("failed to encode snapshot: {e}"),
        }
        return;
    }

    match &snapshot.current {
        Some(current) => println!(
            "{} {}/{} [{} {}/{}]",
            snapshot.state,
            snapshot.elapsed,
            snapshot.total_duration,
            current.name,
            current.elapsed,
            current.duration
        ),
        None => println!(
            "{} {}/{}",
            snapshot.state, snapshot.elapsed, snapshot.total_duration
        ),
    }
}

async fn run(args: Args) -> Result<(), RuntimeError> {
    let mut config = match &args.config {
        Some(path) => TimerConfig::load(path)?,
        None => TimerConfig::default(),
    };
    if let Some(ms) = args.tick_ms {
        config.tick_period_ms = ms;
    }

    let (mut runtime, handle) = Runtime::new(&config)?;
    let json = args.json;
    runtime.subscribe(move |snapshot| print_snapshot(snapshot, json));

    handle.start()?;
    runtime.run().await?;
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("metronome=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(Args::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
