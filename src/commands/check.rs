//! Validate the collection

use anyhow::Result;
use notify::{EventKind, RecursiveMode, Watcher};
use std::fmt::Write as _;
use std::path::Path;
use std::time::Duration;

use crate::content::{EntryError, LoadReport};
use crate::Site;

/// Quiet period before a burst of file events triggers a re-check
const DEBOUNCE: Duration = Duration::from_millis(500);

/// Validate every document and print the outcome
///
/// Returns `false` when at least one document failed.
pub fn run(site: &Site) -> Result<bool> {
    let start = std::time::Instant::now();
    let report = site.load()?;

    print!("{}", format_report(&report, &site.base_dir));

    let duration = start.elapsed();
    tracing::info!("Checked in {:.2}s", duration.as_secs_f64());

    Ok(report.is_ok())
}

/// Human-readable summary of a load, one block per failing document
pub fn format_report(report: &LoadReport, base_dir: &Path) -> String {
    let mut out = String::new();

    for failure in &report.failures {
        let path = failure.path.strip_prefix(base_dir).unwrap_or(&failure.path);
        let _ = writeln!(out, "✗ {}", path.display());
        match &failure.error {
            EntryError::Validation(err) => {
                for issue in &err.issues {
                    let _ = writeln!(out, "    {}", issue);
                }
            }
            other => {
                let _ = writeln!(out, "    {}", other);
            }
        }
    }

    if report.is_ok() {
        let _ = writeln!(
            out,
            "✓ {} entries valid in '{}'",
            report.entries.len(),
            report.name
        );
    } else {
        let _ = writeln!(
            out,
            "{} of {} documents in '{}' failed validation",
            report.failures.len(),
            report.failures.len() + report.entries.len(),
            report.name
        );
    }

    out
}

/// Re-run the check whenever the collection or its config changes
pub async fn watch(site: &Site) -> Result<()> {
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();

    let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
        if let Ok(event) = res {
            if !matches!(event.kind, EventKind::Access(_)) {
                let _ = tx.send(event);
            }
        }
    })?;

    if site.collection_dir.exists() {
        watcher.watch(&site.collection_dir, RecursiveMode::Recursive)?;
    } else {
        tracing::warn!(
            "Collection directory {:?} does not exist, watching {:?}",
            site.collection_dir,
            site.base_dir
        );
        watcher.watch(&site.base_dir, RecursiveMode::Recursive)?;
    }

    if let Some(config_path) = &site.config_path {
        watcher.watch(config_path, RecursiveMode::NonRecursive)?;
    }

    tracing::info!("Watching for changes. Press Ctrl+C to stop.");

    loop {
        tokio::select! {
            event = rx.recv() => {
                if event.is_none() {
                    break;
                }
                tokio::time::sleep(DEBOUNCE).await;
                while rx.try_recv().is_ok() {}

                tracing::info!("File changed, re-checking...");
                match reload(site) {
                    Ok(current) => {
                        if let Err(e) = run(&current) {
                            tracing::error!("Check failed: {}", e);
                        }
                    }
                    Err(e) => tracing::error!("Failed to reload config: {}", e),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Stopping watch");
                break;
            }
        }
    }

    Ok(())
}

/// Pick up config edits between runs
fn reload(site: &Site) -> Result<Site> {
    match &site.config_path {
        Some(path) => Site::from_config_file(&site.base_dir, path),
        None => Ok(site.clone()),
    }
}
