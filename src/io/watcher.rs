use std::ffi::OsString;
use std::path::Path;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use crate::io::store::ChangeEvent;

/// A file system watcher for a single bookmark file.
///
/// Watches the file's directory (so atomic rename-into-place is seen) and
/// forwards events touching the file name to `on_change`.
pub struct StoreWatcher {
    _watcher: RecommendedWatcher,
}

impl StoreWatcher {
    /// Start watching `file`. `on_change` runs on the watcher's thread.
    pub fn start<F>(file: &Path, on_change: F) -> Result<Self, notify::Error>
    where
        F: Fn(ChangeEvent) + Send + 'static,
    {
        let dir = match file.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => std::path::PathBuf::from("."),
        };
        let file_name: OsString = file
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();

        let mut watcher = RecommendedWatcher::new(
            move |result: Result<Event, notify::Error>| {
                let event = match result {
                    Ok(e) => e,
                    Err(e) => {
                        tracing::warn!("bookmark watcher error: {}", e);
                        return;
                    }
                };

                let change = match event.kind {
                    EventKind::Create(_) => ChangeEvent::Created,
                    EventKind::Modify(_) => ChangeEvent::Changed,
                    EventKind::Remove(_) => ChangeEvent::Removed,
                    _ => return,
                };

                let touches_file = event
                    .paths
                    .iter()
                    .any(|p| p.file_name() == Some(file_name.as_os_str()));
                if touches_file {
                    tracing::debug!(?change, "bookmark file changed on disk");
                    on_change(change);
                }
            },
            Config::default(),
        )?;

        watcher.watch(&dir, RecursiveMode::NonRecursive)?;
        Ok(StoreWatcher { _watcher: watcher })
    }
}
