use crate::{load, schema::MonitorConfig};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Editors tend to emit several events per save; wait this long for quiet.
const DEBOUNCE: Duration = Duration::from_millis(250);

/// Watches the config file and delivers a freshly parsed [`MonitorConfig`]
/// after every change.
///
/// The parent directory is watched rather than the file itself so that
/// save-by-rename (vim, most IDEs) keeps working. Files that fail to parse
/// are logged and skipped; the previous configuration stays in effect.
pub struct ConfigWatcher {
    path: PathBuf,
}

impl ConfigWatcher {
    /// Spawn a filesystem watcher for `path`.
    /// Returns the watcher handle and a receiver of reloaded configurations.
    pub fn spawn(path: impl AsRef<Path>) -> (Self, mpsc::Receiver<MonitorConfig>) {
        let (tx, rx) = mpsc::channel(1);
        let path = path.as_ref().to_path_buf();
        let watcher = Self { path: path.clone() };

        tokio::spawn(watch_loop(path, tx));

        (watcher, rx)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Whether `event` touched `target` in a way worth reloading for.
fn is_relevant(event: &Event, target: &Path) -> bool {
    matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_))
        && event.paths.iter().any(|p| p.file_name() == target.file_name())
}

async fn watch_loop(path: PathBuf, tx: mpsc::Sender<MonitorConfig>) {
    let Some(dir) = path.parent().map(Path::to_path_buf) else {
        error!("Config path '{}' has no parent directory", path.display());
        return;
    };

    let (raw_tx, mut raw_rx) = mpsc::channel::<notify::Result<Event>>(16);

    let mut watcher = match RecommendedWatcher::new(
        move |res| {
            let _ = raw_tx.blocking_send(res);
        },
        Config::default(),
    ) {
        Ok(w) => w,
        Err(e) => {
            error!("Failed to create filesystem watcher: {e}");
            return;
        }
    };

    if let Err(e) = watcher.watch(&dir, RecursiveMode::NonRecursive) {
        warn!("Config reload disabled, cannot watch '{}': {e}", dir.display());
        return;
    }

    info!("Watching config file: {}", path.display());

    while let Some(event) = raw_rx.recv().await {
        match event {
            Ok(e) if is_relevant(&e, &path) => {}
            Ok(_) => continue,
            Err(e) => {
                warn!("Watcher error: {e}");
                continue;
            }
        }

        // Swallow the rest of the burst.
        while let Ok(Some(_)) = tokio::time::timeout(DEBOUNCE, raw_rx.recv()).await {}

        match load(&path) {
            Ok(cfg) => {
                debug!("Config file changed, reloaded");
                if tx.send(cfg).await.is_err() {
                    break; // receiver dropped
                }
            }
            Err(e) => warn!("Ignoring config change: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, ModifyKind};

    #[test]
    fn relevant_only_for_target_file() {
        let target = Path::new("/tmp/ecomon/ecomon.toml");
        let hit = Event::new(EventKind::Modify(ModifyKind::Any))
            .add_path(PathBuf::from("/tmp/ecomon/ecomon.toml"));
        let other = Event::new(EventKind::Create(CreateKind::File))
            .add_path(PathBuf::from("/tmp/ecomon/ecomon.toml.swp"));
        let removed = Event::new(EventKind::Remove(notify::event::RemoveKind::File))
            .add_path(PathBuf::from("/tmp/ecomon/ecomon.toml"));

        assert!(is_relevant(&hit, target));
        assert!(!is_relevant(&other, target));
        assert!(!is_relevant(&removed, target));
    }
}
