use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use arc_swap::ArcSwap;
use gc_core::config::Settings;
use notify::{Event, EventKind, RecursiveMode, Watcher};

use crate::cli::Overrides;

/// Watch the config file and store every successful reload into `settings`,
/// with the command-line overrides reapplied. Display inversion is a live
/// toggle and keeps its current value across reloads.
///
/// The returned watcher must stay alive for as long as reloads are wanted.
///
/// # Errors
/// Returns an error if the watcher cannot be created or the path cannot be watched.
pub fn spawn_config_watcher(
    config_path: &Path,
    settings: &Arc<ArcSwap<Settings>>,
    overrides: Overrides,
) -> Result<impl Watcher + use<>> {
    let settings = Arc::clone(settings);
    let path = config_path.to_path_buf();

    let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
        if let Ok(event) = res
            && matches!(event.kind, EventKind::Modify(_))
        {
            reload(&path, &settings, overrides);
        }
    })?;

    watcher.watch(config_path, RecursiveMode::NonRecursive)?;
    Ok(watcher)
}

/// Load `path` and publish it. A bad file keeps the previous settings.
fn reload(path: &Path, settings: &ArcSwap<Settings>, overrides: Overrides) {
    match gc_core::config::load_config(path) {
        Ok(mut next) => {
            overrides.apply(&mut next);
            settings.rcu(|current| Settings {
                invert_display: current.invert_display,
                ..next.clone()
            });
            log::info!("Config reloaded from {}", path.display());
        }
        Err(e) => log::warn!("Config reload failed: {e:#}"),
    }
}
