//! Squats - Main entry point
//!
//! Replays a recorded keypoint stream through an exercise form session,
//! logging the feedback a live user would have heard and printing the
//! session report as JSON.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use squats_rules::{compare_to_reference, deviation_messages, Exercise, DEFAULT_REFERENCE_THRESHOLD};
use squats_session::{
    AudioCueMap, AudioCueSink, FramePipeline, SessionConfig, SessionReport, StopSignal,
};

mod cues;
mod plot;
mod replay;

use cues::{LoggedPlayer, ReplaySink};
use plot::JsonPlotSink;
use replay::RecordedPoses;

/// Command-line arguments for squats
#[derive(Parser, Debug)]
#[command(name = "squats")]
#[command(about = "Exercise form feedback from recorded pose keypoints")]
#[command(version)]
struct Args {
    /// Exercise to evaluate (e.g. "squat", "push-ups", "Bench Press")
    #[arg(short, long, env = "SQUATS_EXERCISE", required_unless_present = "list_exercises")]
    exercise: Option<String>,

    /// Recorded keypoints, one JSON frame per line
    #[arg(short, long, required_unless_present = "list_exercises")]
    input: Option<PathBuf>,

    /// Configuration file (TOML, YAML or JSON)
    #[arg(short, long, env = "SQUATS_CONFIG")]
    config: Option<String>,

    /// Write per-joint angle series to this JSON file
    #[arg(long)]
    plots: Option<PathBuf>,

    /// Reference recording to compare the input against
    #[arg(long)]
    reference: Option<PathBuf>,

    /// Per-axis tolerance for reference comparison
    #[arg(long, default_value_t = DEFAULT_REFERENCE_THRESHOLD)]
    reference_threshold: f64,

    /// JSON map from feedback message to audio clip; enables audio cues
    #[arg(long)]
    audio_map: Option<PathBuf>,

    /// Directory searched for clips missing from the audio map
    #[arg(long, default_value = "audio")]
    audio_dir: PathBuf,

    /// List supported exercises and exit
    #[arg(long)]
    list_exercises: bool,
}

#[derive(Serialize)]
struct Output {
    #[serde(flatten)]
    report: SessionReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    reference_deviations: Option<Vec<String>>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "squats=info,squats_session=info,squats_rules=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    if args.list_exercises {
        for exercise in Exercise::ALL {
            println!("{:<16} {}", exercise.name(), exercise.accepted_names().join(", "));
        }
        return Ok(());
    }

    let (Some(exercise), Some(input)) = (args.exercise.as_deref(), args.input.as_ref()) else {
        anyhow::bail!("--exercise and --input are required");
    };

    let config = match &args.config {
        Some(path) => SessionConfig::from_file(path),
        None => SessionConfig::from_env(),
    }
    .context("Failed to load configuration")?;

    let lines = replay::read_lines(input)
        .with_context(|| format!("Failed to read recording {}", input.display()))?;
    info!("Loaded {} frames from {}", lines.len(), input.display());

    let mut pipeline = FramePipeline::for_exercise(exercise, &config)
        .context("Failed to start session")?;

    let audio = match &args.audio_map {
        Some(path) => {
            let cues = AudioCueMap::load(path, &args.audio_dir)
                .with_context(|| format!("Failed to load audio map {}", path.display()))?;
            info!("Loaded {} audio cues", cues.len());
            Some(AudioCueSink::new(cues, LoggedPlayer::default()))
        }
        None => None,
    };

    let stop = StopSignal::new();
    let interrupt = tokio::spawn(shutdown_signal(stop.clone()));

    let (report, plots) = tokio::task::spawn_blocking(move || {
        let mut estimator = RecordedPoses;
        let mut sink = ReplaySink::new(audio);
        let mut plots = JsonPlotSink::new();
        let report = pipeline.run(&mut estimator, lines, &mut sink, &mut plots, &stop);
        (report, plots)
    })
    .await
    .context("Session task failed")?;
    interrupt.abort();

    if let Some(path) = &args.plots {
        plots
            .write(path)
            .with_context(|| format!("Failed to write plots to {}", path.display()))?;
        info!("Wrote {} joint series to {}", plots.len(), path.display());
    }

    let reference_deviations = match &args.reference {
        Some(path) => {
            let attempt = replay::load_frames(input)
                .with_context(|| format!("Failed to parse recording {}", input.display()))?;
            let reference = replay::load_frames(path)
                .with_context(|| format!("Failed to parse reference {}", path.display()))?;
            let deviations = compare_to_reference(&attempt, &reference, args.reference_threshold);
            let messages = deviation_messages(&deviations);
            for message in &messages {
                warn!("{}", message);
            }
            Some(messages)
        }
        None => None,
    };

    let output = Output {
        report,
        reference_deviations,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}

/// Set the stop flag on Ctrl+C
async fn shutdown_signal(stop: StopSignal) {
    match signal::ctrl_c().await {
        Ok(()) => {
            info!("Received Ctrl+C, finishing session");
            stop.stop();
        }
        Err(e) => warn!("Failed to install Ctrl+C handler: {}", e),
    }
}
