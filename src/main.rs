//! hand-pointer - replay recorded hand poses through a tracking session
//!
//! Entry point for the binary.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use hand_pointer::config::{Config, LoggingConfig};
use hand_pointer::host::{
    load_trace, LogClickSink, LogIndicatorSurface, ReplayEstimator, ReplayRuntime,
    StaticVideoSource,
};
use hand_pointer::tracking::{IntervalFrameClock, SessionHost, TrackingSession};
use hand_pointer::utils::format_user_error;

/// Command-line arguments for hand-pointer
#[derive(Parser, Debug)]
#[command(name = "hand-pointer")]
#[command(version, about = "Hand-gesture pointer control", long_about = None)]
pub struct Args {
    /// Recorded pose trace (JSON Lines, one array of hands per frame)
    #[arg(short, long)]
    pub trace: PathBuf,

    /// Configuration file path
    #[arg(short, long, env = "HAND_POINTER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Mirror the video horizontally
    #[arg(long, overrides_with = "no_mirror")]
    pub mirror: bool,

    /// Do not mirror the video
    #[arg(long)]
    pub no_mirror: bool,

    /// Simulate this many failed runtime loads before succeeding
    #[arg(long, default_value = "0")]
    pub fail_injections: u32,

    /// Verbose logging (can be specified multiple times)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Log format (json|pretty|compact)
    #[arg(long, default_value = "pretty")]
    pub log_format: String,

    /// Write daily log files to this directory (in addition to stdout)
    #[arg(long)]
    pub log_dir: Option<PathBuf>,
}

impl Args {
    fn mirror_override(&self) -> Option<bool> {
        match (self.mirror, self.no_mirror) {
            (true, _) => Some(true),
            (false, true) => Some(false),
            (false, false) => None,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = match Config::load_or_default(args.config.as_deref()) {
        Ok(config) => config.with_overrides(args.mirror_override(), args.log_dir.clone()),
        Err(e) => {
            eprintln!("{}", format_user_error(&e));
            return Err(e);
        }
    };

    let _log_guard = init_logging(&args, &config.logging)?;

    info!("════════════════════════════════════════════════════════");
    info!("  hand-pointer v{}", env!("CARGO_PKG_VERSION"));
    info!("  Built: {} {}", env!("BUILD_DATE"), env!("BUILD_TIME"));
    info!("  Commit: {}", env!("GIT_HASH"));
    info!("  Profile: {}", if cfg!(debug_assertions) { "debug" } else { "release" });
    info!("════════════════════════════════════════════════════════");

    tracing::debug!("Config: {:?}", config);

    if let Err(e) = run(&args, &config).await {
        eprintln!("{}", format_user_error(&e));
        return Err(e);
    }

    Ok(())
}

async fn run(args: &Args, config: &Config) -> Result<()> {
    let estimator = Arc::new(ReplayEstimator::new(load_trace(&args.trace)?));
    let geometry = config.video.geometry();
    let clock = Arc::new(IntervalFrameClock::new(config.tracking.frame_rate));
    let frame_period = clock.period();

    let host = SessionHost {
        runtime: Arc::new(ReplayRuntime::new(estimator.clone(), args.fail_injections)),
        video: Arc::new(StaticVideoSource::new(geometry)),
        surface: Arc::new(LogIndicatorSurface),
        clicks: Arc::new(LogClickSink::new(geometry.render)),
        clock,
    };

    let session = TrackingSession::new(host, config.session_config());
    session.start().await?;

    tokio::select! {
        _ = estimator.wait_drained() => {
            // Let the loop finish the last frame
            tokio::time::sleep(frame_period * 2).await;
            info!("Trace replay complete");
        }
        result = tokio::signal::ctrl_c() => {
            result?;
            info!("Interrupted");
        }
    }

    session.stop();

    let stats = session.stats();
    info!(
        "Detection rate: {:.1}% over {} frames",
        stats.detection_rate() * 100.0,
        stats.frames
    );
    println!("{}", serde_json::to_string_pretty(&stats)?);

    Ok(())
}

fn init_logging(args: &Args, logging: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let log_level = match args.verbose {
        0 => logging.level.to_lowercase(),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    };

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!(
            "{name}={level},warn",
            name = env!("CARGO_CRATE_NAME"),
            level = log_level
        ))
    });

    let stdout_layer = match args.log_format.as_str() {
        "json" => tracing_subscriber::fmt::layer().json().boxed(),
        "compact" => tracing_subscriber::fmt::layer().compact().boxed(),
        _ => tracing_subscriber::fmt::layer().pretty().boxed(),
    };

    let (file_layer, guard) = match &logging.log_dir {
        Some(log_dir) => {
            std::fs::create_dir_all(log_dir)?;
            let file_appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix(env!("CARGO_PKG_NAME"))
                .filename_suffix("log")
                .build(log_dir)?;
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

            let layer = match args.log_format.as_str() {
                "json" => tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(non_blocking)
                    .with_ansi(false)
                    .boxed(),
                _ => tracing_subscriber::fmt::layer()
                    .with_writer(non_blocking)
                    .with_ansi(false)
                    .boxed(),
            };
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    if let Some(log_dir) = &logging.log_dir {
        info!("Logging to directory: {}", log_dir.display());
    }

    Ok(guard)
}
