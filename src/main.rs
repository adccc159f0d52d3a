//! gesture-recorder: replay a keypoint capture through the recorder.

use anyhow::{Context, Result};
use clap::Parser;
use gesture_recorder::config::AppConfig;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "gesture-recorder",
    version,
    about = "Replay hand keypoints and record on a held open-hand gesture"
)]
struct Cli {
    /// JSON-lines file with one keypoint frame per line
    frames: PathBuf,

    /// Config file (JSON); defaults apply when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Order id to start recording under before the first frame
    #[arg(long)]
    order_id: Option<String>,

    /// Pace frames by their timestamps instead of replaying at full speed
    #[arg(long)]
    realtime: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load_or_default(cli.config.as_deref())
        .context("failed to load config")?;
    gesture_recorder::init_tracing(&config.log_filter);

    let summary = gesture_recorder::run_replay(
        config,
        &cli.frames,
        cli.order_id.as_deref(),
        cli.realtime,
    )
    .await
    .with_context(|| format!("replay of {:?} failed", cli.frames))?;

    println!(
        "{} frames, {} gestures, {} unreadable",
        summary.frames, summary.fires, summary.skipped
    );
    Ok(())
}
