use std::sync::Arc;

use anyhow::Result;
use arc_swap::ArcSwap;
use clap::Parser;
use gc_core::config::Settings;

pub mod cli;
pub mod export;
pub mod hotreload;
pub mod still;
#[cfg(feature = "video")]
pub mod terminal;

use cli::SourceArg;
use export::Exports;

fn main() -> Result<()> {
    // 1. CLI
    let cli = cli::Cli::parse();

    // 2. Logging
    env_logger::Builder::new()
        .filter_level(cli.log_level.parse().unwrap_or(log::LevelFilter::Warn))
        .init();

    // 3. Source
    let source = cli.validate_source()?;

    // 4. Config, then CLI overrides
    let overrides = cli.overrides();
    let mut settings = resolve_config(&cli)?;
    overrides.apply(&mut settings);

    let exports = Exports {
        text: cli.export_text.clone(),
        image: cli.export_image.clone(),
    };

    match source {
        SourceArg::Image(path) => still::run(path, &settings, &exports),
        SourceArg::Video(path) => {
            let settings = Arc::new(ArcSwap::from_pointee(settings));
            // 5. Hot reload, only if there is a file to watch
            let _watcher = if cli.config.exists() {
                hotreload::spawn_config_watcher(&cli.config, &settings, overrides)
                    .inspect_err(|e| log::warn!("Config hot reload unavailable: {e:#}"))
                    .ok()
            } else {
                None
            };
            play(&path, settings, &exports)
        }
    }
}

#[cfg(feature = "video")]
fn play(path: &std::path::Path, settings: Arc<ArcSwap<Settings>>, exports: &Exports) -> Result<()> {
    terminal::run(path, settings, exports)
}

#[cfg(not(feature = "video"))]
fn play(_path: &std::path::Path, _settings: Arc<ArcSwap<Settings>>, _exports: &Exports) -> Result<()> {
    anyhow::bail!("Built without video support. Rebuild with --features video.")
}

/// Config file if present, defaults otherwise.
fn resolve_config(cli: &cli::Cli) -> Result<Settings> {
    if cli.config.exists() {
        gc_core::config::load_config(&cli.config)
    } else {
        log::warn!(
            "Config not found: {}. Using defaults.",
            cli.config.display()
        );
        Ok(Settings::default())
    }
}
