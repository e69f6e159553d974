//! Main entry point for the memory-garden viewer

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use memory_garden::{Garden, SamplerConfig};

#[derive(Parser)]
#[command(name = "memory-garden")]
#[command(about = "Dissolve a photograph into an animated particle field", long_about = None)]
#[command(version)]
struct Cli {
    /// Image to show at startup (PNG or JPEG), defaults to the last one shown;
    /// drop files on the window to switch
    image: Option<PathBuf>,

    /// Settings file (particle configuration and last image), created on first change
    #[arg(short, long, default_value = "garden-particles.json")]
    config: PathBuf,

    /// Maximum sampling width in pixels
    #[arg(long, default_value_t = 300, value_parser = clap::value_parser!(u32).range(1..))]
    max_width: u32,

    /// Verbosity level (can be repeated for more detail)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let mut garden = Garden::new()
        .with_config_path(cli.config)
        .with_sampler(SamplerConfig::default().with_max_width(cli.max_width));
    if let Some(image) = cli.image {
        garden = garden.with_image(image);
    }

    garden.run().context("garden stopped")
}
