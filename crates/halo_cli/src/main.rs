//! Halo CLI
//!
//! Headless tools for the Halo loader: simulate a loader frame by frame,
//! validate configuration files and generate a default one.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use halo_core::{RecordingContext, Size};
use halo_loader::{LoaderConfig, LoaderRuntime};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod report;

use report::FrameRecord;

/// Upper bound on frames spent waiting for a stop to settle
const MAX_SETTLE_FRAMES: u32 = 10_000;

#[derive(Parser)]
#[command(name = "halo")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Halo loader tools", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a loader headlessly and print one JSON line per frame
    Simulate {
        /// Loader configuration (TOML); defaults are used when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Number of frames to run after starting
        #[arg(short, long, default_value = "60")]
        frames: u32,

        /// Simulated frame duration in milliseconds
        #[arg(long, default_value = "16")]
        frame_ms: f32,

        /// Request a stop on this frame, then run until the loader settles
        #[arg(long)]
        stop_after: Option<u32>,

        /// Viewport width
        #[arg(long, default_value = "400")]
        width: f32,

        /// Viewport height
        #[arg(long, default_value = "800")]
        height: f32,
    },

    /// Validate a loader configuration file
    Check {
        /// Configuration file
        #[arg(default_value = "halo.toml")]
        path: PathBuf,
    },

    /// Write a configuration file with every default spelled out
    Init {
        /// Output path, or stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Commands::Simulate {
            config,
            frames,
            frame_ms,
            stop_after,
            width,
            height,
        } => cmd_simulate(
            config.as_deref(),
            frames,
            frame_ms,
            stop_after,
            Size::new(width, height),
        ),

        Commands::Check { path } => cmd_check(&path),

        Commands::Init { output, force } => cmd_init(output.as_deref(), force),
    }
}

fn load_config(path: Option<&Path>) -> Result<LoaderConfig> {
    match path {
        Some(path) => LoaderConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Ok(LoaderConfig::default()),
    }
}

fn cmd_simulate(
    config: Option<&Path>,
    frames: u32,
    frame_ms: f32,
    stop_after: Option<u32>,
    viewport: Size,
) -> Result<()> {
    if !(frame_ms.is_finite() && frame_ms > 0.0) {
        anyhow::bail!("--frame-ms must be a positive number, got {}", frame_ms);
    }
    if let Some(stop) = stop_after {
        if stop == 0 || stop > frames {
            anyhow::bail!("--stop-after must be within 1..={}, got {}", frames, stop);
        }
    }

    let config = load_config(config)?;
    let mut runtime =
        LoaderRuntime::new(&config, viewport).context("Failed to build the loader")?;
    let mut ctx = RecordingContext::new(viewport);

    info!(
        "Simulating {} frames of {}ms on a {}x{} viewport",
        frames, frame_ms, viewport.width, viewport.height
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();

    runtime.start_loading();
    for frame in 1..=frames {
        if stop_after == Some(frame) {
            runtime.stop_loading();
        }
        emit_frame(&mut out, &mut runtime, &mut ctx, frame_ms)?;
    }

    if stop_after.is_some() {
        let mut extra = 0;
        while runtime.is_animating() {
            if extra == MAX_SETTLE_FRAMES {
                warn!("Loader did not settle after {} extra frames", extra);
                break;
            }
            emit_frame(&mut out, &mut runtime, &mut ctx, frame_ms)?;
            extra += 1;
        }
        info!("Loader settled after {} extra frames", extra);
    }

    out.flush()?;
    Ok(())
}

fn emit_frame(
    out: &mut impl Write,
    runtime: &mut LoaderRuntime,
    ctx: &mut RecordingContext,
    frame_ms: f32,
) -> Result<()> {
    ctx.clear();
    let outcome = runtime.pump(frame_ms, ctx);
    let record = FrameRecord::capture(&outcome, runtime.loader(), ctx);
    serde_json::to_writer(&mut *out, &record)?;
    writeln!(out)?;
    Ok(())
}

fn cmd_check(path: &Path) -> Result<()> {
    let config = LoaderConfig::load(path)
        .with_context(|| format!("Invalid loader config {}", path.display()))?;

    info!("{} is valid", path.display());
    info!(
        "  rotation_speed = {}, stroke_width = {}, spans = {}..{}",
        config.rotation_speed, config.stroke_width, config.min_span, config.max_span
    );
    if config.rotation_speed >= config.max_span {
        warn!("rotation_speed >= max_span: the arcs will never shrink");
    }
    Ok(())
}

fn cmd_init(output: Option<&Path>, force: bool) -> Result<()> {
    let content = LoaderConfig::default().to_toml()?;

    match output {
        Some(path) => {
            if path.exists() && !force {
                anyhow::bail!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                );
            }
            fs::write(path, content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote default config to {}", path.display());
        }
        None => print!("{}", content),
    }
    Ok(())
}
