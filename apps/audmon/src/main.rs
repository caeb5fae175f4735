mod config;
mod signal;

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Context;
use audmon_audio::{list_input_devices, CaptureBackend, CaptureStream, CpalBackend};
use audmon_meter::LevelMeter;
use audmon_ui::{update_queue, MeterApp, UpdateSender, DEFAULT_QUEUE_CAPACITY};
use clap::{ArgAction, Parser};
use tokio::runtime::Handle;
use tracing::{error, info, instrument, warn};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

use crate::config::{AppConfig, ConfigOverrides};

#[derive(Parser, Debug)]
#[command(
    name = "audmon",
    version,
    about = "Monitor audio input levels in the terminal",
    long_about = None,
    disable_help_flag = true,
    disable_version_flag = true
)]
struct Cli {
    /// Orient the monitor horizontally
    #[arg(short = 'h', long)]
    horizontal: bool,
    /// Input device to monitor (see --list-devices)
    #[arg(short, long)]
    device: Option<String>,
    /// YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Append log records to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
    /// Print the names of available input devices and exit
    #[arg(long)]
    list_devices: bool,
    /// Print version information
    #[arg(short = 'v', long, action = ArgAction::Version)]
    version: Option<bool>,
    /// Print help
    #[arg(long, action = ArgAction::Help)]
    help: Option<bool>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    config.apply(ConfigOverrides {
        horizontal: cli.horizontal,
        device: cli.device,
        log_file: cli.log_file,
    });
    init_logging(config.log_file.as_deref())?;

    if cli.list_devices {
        for name in list_input_devices()? {
            println!("{name}");
        }
        return Ok(());
    }

    run(config).await
}

fn init_logging(log_file: Option<&Path>) -> anyhow::Result<()> {
    // The meter owns the terminal, so records only go to a file when asked.
    let writer = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("open log file {:?}", path))?;
            BoxMakeWriter::new(Mutex::new(file))
        }
        None => BoxMakeWriter::new(std::io::sink),
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_ansi(false)
        .with_writer(writer)
        .init();
    Ok(())
}

#[instrument(skip_all)]
async fn run(config: AppConfig) -> anyhow::Result<()> {
    let (updates, update_rx) = update_queue(DEFAULT_QUEUE_CAPACITY);
    let app = MeterApp::new(&config.display, update_rx, config.capture.period())
        .context("set up meter display")?;
    let ui_stop = app.stop_handle();

    let mut capture = open_metered_capture(&CpalBackend, &config, updates, Handle::current())?;
    capture.start().context("start audio capture device")?;

    let mut ui_task = tokio::task::spawn_blocking(move || app.run());
    info!("monitoring audio input");

    let ui_result = tokio::select! {
        _ = signal::shutdown_signal() => {
            info!("termination signal received");
            None
        }
        joined = &mut ui_task => Some(joined),
    };

    // Audio goes first so no late callback reaches a UI that is shutting down.
    if let Err(err) = capture.stop() {
        warn!(%err, "failed to stop audio capture");
    }
    drop(capture);

    ui_stop.request_stop();
    let ui_result = match ui_result {
        Some(joined) => joined,
        None => ui_task.await,
    };
    match ui_result {
        Ok(Ok(())) => info!("meter closed"),
        // Treated as a clean stop: the process still exits 0.
        Ok(Err(err)) => error!(%err, "meter ui closed unsuccessfully"),
        Err(err) => error!(%err, "meter ui task failed"),
    }
    Ok(())
}

/// Opens capture on `backend` with every period run through a [`LevelMeter`]
/// and queued for the UI.
fn open_metered_capture(
    backend: &dyn CaptureBackend,
    config: &AppConfig,
    mut updates: UpdateSender,
    runtime: Handle,
) -> anyhow::Result<Box<dyn CaptureStream>> {
    let mut meter = LevelMeter::new(&config.meter, runtime).context("set up level meter")?;
    backend
        .open_capture(
            &config.capture,
            Box::new(move |samples: &[u8]| {
                updates.submit(meter.process(samples));
            }),
        )
        .context("initialize audio capture device")
}
