//! Unfold CLI
//!
//! Inspect the landing page layout and replay scroll sessions headlessly.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use unfold_cli::content::caption;
use unfold_cli::{LandingPage, Replay, ReplayOptions, UnfoldConfig, CONFIG_FILE};

#[derive(Parser)]
#[command(name = "unfold")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Scroll reveal and parallax replay for Unfold", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scroll through the page and report reveals, progress and parallax
    Simulate {
        /// Config file
        #[arg(short, long, default_value = CONFIG_FILE)]
        config: PathBuf,

        /// Print the sampled frames as JSON
        #[arg(long)]
        json: bool,

        /// Include every block's style in sampled frames
        #[arg(long)]
        detailed: bool,

        /// Stop after this many frames
        #[arg(long)]
        frames: Option<u64>,

        /// Override the viewport width
        #[arg(long)]
        width: Option<f32>,
    },

    /// Print the revealable blocks for the configured viewport
    Layout {
        /// Config file
        #[arg(short, long, default_value = CONFIG_FILE)]
        config: PathBuf,

        /// Print as JSON
        #[arg(long)]
        json: bool,

        /// Override the viewport width
        #[arg(long)]
        width: Option<f32>,
    },

    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Show motion constants
    Info,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging; stdout is reserved for reports
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Commands::Simulate {
            config,
            json,
            detailed,
            frames,
            width,
        } => cmd_simulate(&config, json, detailed, frames, width),

        Commands::Layout {
            config,
            json,
            width,
        } => cmd_layout(&config, json, width),

        Commands::Init { force } => cmd_init(force),

        Commands::Info => cmd_info(),
    }
}

fn load_config(path: &Path, width: Option<f32>) -> Result<UnfoldConfig> {
    let mut config = UnfoldConfig::load_or_default(path)?;
    if let Some(width) = width {
        if !(width > 0.0) {
            anyhow::bail!("--width must be positive, got {}", width);
        }
        config.viewport.width = width;
    }
    Ok(config)
}

fn cmd_simulate(
    path: &Path,
    json: bool,
    detailed: bool,
    frames: Option<u64>,
    width: Option<f32>,
) -> Result<()> {
    let config = load_config(path, width)?;
    let replay = Replay::new(config);
    let report = replay.run(ReplayOptions {
        max_frames: frames,
        detailed,
    })?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Frames: {}", report.total_frames);
    println!("Final progress: {:.3}", report.final_progress);
    println!();
    println!("{:<28} {:<6} {:>6} {:>10}", "block", "dir", "delay", "revealed");
    for record in &report.reveals {
        let at = record
            .revealed_at_ms
            .map(|ms| format!("{ms}ms"))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<28} {:<6} {:>6} {:>10}",
            record.label,
            format!("{:?}", record.direction).to_lowercase(),
            record.delay_ms,
            at
        );
    }

    let hidden = report
        .reveals
        .iter()
        .filter(|r| r.revealed_at_ms.is_none())
        .count();
    if hidden > 0 {
        warn!("{} blocks were never revealed", hidden);
    }

    Ok(())
}

fn cmd_layout(path: &Path, json: bool, width: Option<f32>) -> Result<()> {
    let config = load_config(path, width)?;
    let layout = LandingPage::layout(config.viewport.size());

    if json {
        println!("{}", serde_json::to_string_pretty(&layout)?);
        return Ok(());
    }

    println!(
        "Viewport {}x{}, document {:.0}px",
        layout.viewport.width, layout.viewport.height, layout.document_height
    );
    println!();
    for block in &layout.blocks {
        let mut line = format!(
            "{:<28} y={:<7.0} h={:<6.0} {:?} +{}ms",
            block.label,
            block.rect.y(),
            block.rect.height(),
            block.direction,
            block.delay_ms
        );
        if block.parallax {
            line.push_str(" parallax");
        }
        if let Some(caption) = caption(&block.label) {
            line.push_str(&format!("  \"{caption}\""));
        }
        println!("{line}");
    }

    Ok(())
}

fn cmd_init(force: bool) -> Result<()> {
    let path = Path::new(CONFIG_FILE);
    if path.exists() && !force {
        anyhow::bail!("{} already exists (use --force to overwrite)", CONFIG_FILE);
    }

    fs::write(path, UnfoldConfig::default().to_toml()?)?;
    info!("Wrote {}", CONFIG_FILE);

    Ok(())
}

fn cmd_info() -> Result<()> {
    let spring = unfold_animation::SpringConfig::progress_bar();

    println!("Unfold Scroll Motion");
    println!("====================");
    println!();
    println!("Version: {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Reveal:");
    println!("  - threshold: {}", unfold_motion::REVEAL_THRESHOLD);
    println!("  - root margin: 0px 0px -50px 0px");
    println!(
        "  - transition: {}ms ease-out, {}px offset",
        unfold_animation::REVEAL_DURATION.as_millis(),
        unfold_motion::REVEAL_OFFSET
    );
    println!();
    println!("Page progress spring:");
    println!("  - stiffness: {}", spring.stiffness);
    println!("  - damping: {}", spring.damping);
    println!("  - rest delta: {}", spring.rest_delta);
    println!();
    let (low, high) = unfold_motion::PARALLAX_RANGE;
    println!("Parallax: {}% to {}% of element height", low, high);

    Ok(())
}
