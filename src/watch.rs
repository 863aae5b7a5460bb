//! Re-export whenever a watched file changes.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum WatchError {
    #[error("{0}")]
    Notify(#[from] notify::Error),
    #[error("watcher channel closed")]
    Disconnected,
}

/// Watch `paths` and call `rebuild` with the changed file each time one is
/// modified. Rebuild failures are logged and watching continues.
///
/// Blocks until the watcher fails.
pub fn watch_inputs<F, E>(paths: &[PathBuf], mut rebuild: F) -> Result<(), WatchError>
where
    F: FnMut(&Path) -> Result<(), E>,
    E: std::fmt::Display,
{
    let (tx, rx) = mpsc::channel();
    let mut watcher = RecommendedWatcher::new(
        move |res| {
            let _ = tx.send(res);
        },
        Config::default(),
    )?;

    let mut tracked = HashSet::new();
    for path in paths {
        let watch_path = canonicalize(path);
        watcher.watch(&watch_path, RecursiveMode::NonRecursive)?;
        info!(path = %watch_path.display(), "watching");
        tracked.insert(watch_path);
    }

    loop {
        let event = rx.recv().map_err(|_| WatchError::Disconnected)?;
        match event {
            Ok(Event {
                kind: EventKind::Modify(_) | EventKind::Create(_),
                paths,
                ..
            }) => {
                let mut changed: Vec<PathBuf> = paths
                    .iter()
                    .map(|p| canonicalize(p))
                    .filter(|p| tracked.contains(p))
                    .collect();
                changed.dedup();

                for path in changed {
                    match rebuild(&path) {
                        Ok(()) => info!(path = %path.display(), "rebuilt"),
                        Err(err) => warn!(path = %path.display(), "rebuild failed: {err}"),
                    }
                }
            }
            Ok(_) => {}
            Err(err) => return Err(WatchError::Notify(err)),
        }
    }
}

fn canonicalize(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
