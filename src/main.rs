// Command-line runner: hand observations as JSON lines on stdin, frame results
// as JSON lines on stdout

use anyhow::Context;
use clap::Parser;
use handvol_lib::core::config::Config;
use handvol_lib::core::controller::GestureController;
use handvol_lib::core::performance_monitor::{PerformanceMonitor, PERFORMANCE_WINDOW};
use handvol_lib::core::session_report::prune_reports;
use handvol_lib::models::hand::HandObservation;
use handvol_lib::platform::{self, NullVolume, VolumeActuator};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{info, warn};

const REPORT_RETENTION_DAYS: u32 = 7;

#[derive(Parser, Debug)]
#[command(name = "handvol", about = "Hand gesture volume controller")]
struct Cli {
    /// Config file (default: ~/.hand_gesture_volume/config.json)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Recognize and map, but never touch the system volume
    #[arg(long)]
    dry_run: bool,

    /// Debug-level logging
    #[arg(long)]
    debug: bool,

    /// Override the configured frame width in pixels
    #[arg(long)]
    frame_width: Option<u32>,

    /// Override the configured frame height in pixels
    #[arg(long)]
    frame_height: Option<u32>,

    /// Where session reports are written (default: <data dir>/reports)
    #[arg(long)]
    report_dir: Option<PathBuf>,

    /// Seconds between performance summaries in the log
    #[arg(long, default_value_t = 10)]
    report_interval_secs: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("Failed to load configuration")?;

    if let Some(width) = cli.frame_width {
        config.frame.width = width;
    }
    if let Some(height) = cli.frame_height {
        config.frame.height = height;
    }
    config.validate().context("Invalid configuration")?;

    let level = if cli.debug || config.debug_mode { "debug" } else { "info" };
    // stdout carries frame output, so logs go to stderr
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("handvol={level},handvol_lib={level}").into()),
        )
        .init();

    info!("Hand gesture volume controller starting");

    let actuator: Box<dyn VolumeActuator> = if cli.dry_run {
        info!("Dry run: system volume will not be changed");
        Box::new(NullVolume::new())
    } else {
        platform::get_volume_actuator().context("No volume control available on this platform")?
    };

    let monitor = Arc::new(PerformanceMonitor::new(PERFORMANCE_WINDOW)?);
    let mut controller = GestureController::new(&config, actuator, monitor.clone())?;

    let reporter = {
        let monitor = monitor.clone();
        let period = Duration::from_secs(cli.report_interval_secs.max(1));
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            // First tick fires immediately
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let s = monitor.summary();
                info!(
                    "FPS: {:.1} | frame {:.2} ms | gesture {:.2} ms | volume {:.2} ms | {} frames",
                    s.fps, s.frame_time_ms, s.gesture_time_ms, s.volume_time_ms, s.total_frames
                );
            }
        })
    };

    let mut stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();
    let result = run_frames(&mut controller, &mut stdin, &mut stdout).await;

    reporter.abort();

    let summary = monitor.summary();
    info!(
        "Processed {} frames at {:.1} FPS, {} volume changes, {} actuator failures",
        summary.total_frames,
        summary.fps,
        controller.volume_changes(),
        controller.actuator_failures()
    );

    if config.enable_statistics {
        let dir = match cli.report_dir {
            Some(dir) => Ok(dir),
            None => platform::get_data_directory().map(|d| d.join("reports")),
        };
        match dir {
            Ok(dir) => save_session_report(&controller, &dir),
            Err(e) => warn!("Failed to locate report directory: {}", e),
        }
    }

    result
}

/// Feed every line of `input` through the controller, writing one JSON result
/// per frame. Output written before a failing line is flushed either way.
async fn run_frames<R, W>(
    controller: &mut GestureController,
    input: R,
    output: &mut W,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    let mut line_no = 0u64;

    let result: anyhow::Result<()> = async {
        while let Some(line) = lines.next_line().await? {
            line_no += 1;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let observation: Option<HandObservation> = serde_json::from_str(line)
                .with_context(|| format!("Malformed observation on line {}", line_no))?;
            let frame = controller
                .process_frame(observation.as_ref())
                .with_context(|| format!("Rejected observation on line {}", line_no))?;

            let mut json = serde_json::to_string(&frame)?;
            json.push('\n');
            output.write_all(json.as_bytes()).await?;
        }
        Ok(())
    }
    .await;

    let flushed = output.flush().await.context("Failed to flush frame output");
    result.and(flushed)
}

/// A report that cannot be written is logged, never allowed to replace the run's own outcome
fn save_session_report(controller: &GestureController, dir: &Path) {
    if let Err(e) = controller.session_report().save_to(dir) {
        warn!("Failed to save session report to {}: {}", dir.display(), e);
        return;
    }
    match prune_reports(dir, REPORT_RETENTION_DAYS) {
        Ok(0) => {}
        Ok(n) => info!("Removed {} old session reports", n),
        Err(e) => warn!("Failed to prune session reports: {}", e),
    }
}
