//! Generate the newsletter page

use anyhow::Result;
use notify::{RecursiveMode, Watcher};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

use crate::generator::{Generator, PageState};
use crate::Site;

/// Load the configured source and write the page.
///
/// A source that cannot be loaded still produces a page showing the failure
/// message; with `strict` the command then fails as well.
pub async fn run(site: &Site, strict: bool) -> Result<()> {
    let start = Instant::now();
    let state = load_state(site).await;

    match &state {
        PageState::Ready(entries) => {
            let degraded = entries.iter().filter(|e| e.is_degraded()).count();
            tracing::info!(
                "Loaded {} newsletters ({} could not be loaded)",
                entries.len(),
                degraded
            );
        }
        other => tracing::info!("Newsletter page state: {}", other.name()),
    }

    let generator = Generator::new(site)?;
    let path = generator.generate(&state)?;
    tracing::info!(
        "Generated {} in {:.2}s",
        path.display(),
        start.elapsed().as_secs_f64()
    );

    if strict && state.is_terminal_failure() {
        anyhow::bail!("Newsletter source failed: page shows \"{}\"", state.message().unwrap_or_default());
    }

    Ok(())
}

/// Resolve the page state from the configured source
pub async fn load_state(site: &Site) -> PageState {
    let result = match site.source().await {
        Ok(source) => source.entries().await,
        Err(e) => Err(e),
    };
    if let Err(e) = &result {
        tracing::error!("Newsletter initialization failed: {}", e);
    }
    PageState::from_result(result)
}

/// Paths whose changes trigger a rebuild
pub fn watched_paths(site: &Site) -> Vec<PathBuf> {
    let mut paths = vec![
        site.base_dir.join("_config.yml"),
        site.content_dir(),
        site.manifest_path(),
        site.base_dir.join(&site.config.static_posts),
    ];
    paths.retain(|p| p.exists());
    paths.dedup();
    paths
}

/// Watch for file changes and regenerate
pub async fn watch(site: &Site) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();

    let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
        if let Ok(event) = res {
            let _ = tx.send(event);
        }
    })?;

    for path in watched_paths(site) {
        let mode = if path.is_dir() {
            RecursiveMode::Recursive
        } else {
            RecursiveMode::NonRecursive
        };
        watcher.watch(&path, mode)?;
        tracing::debug!("Watching: {:?}", path);
    }

    tracing::info!("Watching for changes. Press Ctrl+C to stop.");

    let mut last_rebuild = Instant::now();
    while let Some(_event) = rx.recv().await {
        // Debounce bursts of events from a single save
        if last_rebuild.elapsed() < Duration::from_millis(500) {
            continue;
        }
        tracing::info!("File changed, regenerating...");
        if let Err(e) = run(site, false).await {
            tracing::error!("Generation failed: {}", e);
        }
        last_rebuild = Instant::now();
    }

    Ok(())
}
