use anyhow::{Context, Result};
use clap::Parser;

use sprite_assets::cli::Cli;
use sprite_assets::native::SdlBackend;
use sprite_assets::{config, logging};

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Logger goes in before config loading so its warnings are reported
    logging::init().context("Failed to install logger")?;

    // Config file first, then CLI overrides
    let options = config::load_config(cli.config.as_deref())?;
    let options = cli.merge_into_options(options)?;
    logging::set_level(options.log_level);

    let output = options
        .output
        .clone()
        .context("No output file; pass --output or set 'output' in the config file")?;

    let asset = options.asset();
    log::info!(
        "Rendering {} {} at {}x{}",
        asset.color,
        asset.shape.name(),
        options.sprite_size,
        options.sprite_size
    );

    let backend = SdlBackend::new();
    let surface = asset.render(&backend, &options.surface_spec())?;
    surface.save_bmp(&output)?;

    log::info!("Wrote {}", output.display());
    Ok(())
}
