//! Hot reload — watches the event document and swaps it into the store
//! whenever it changes.
//!
//! The parent directory is watched rather than the file itself so that
//! editors which save by rename (write temp file, move over the original)
//! keep triggering reloads. Change notifications are forwarded from the
//! `notify` callback thread over a bounded channel; a full channel already
//! means a reload is pending, so extra notifications are dropped. The reload
//! task waits for [`SETTLE`] and drains the channel before reading, which
//! collapses the burst of events a single save produces into one reload.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use evq_core::EventStore;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::{Result, SourceError};
use crate::loader::reload_from;

/// Quiet period between the first change notification and the reload.
pub const SETTLE: Duration = Duration::from_millis(50);

/// Keeps a document under watch for as long as it is alive.
pub struct DocumentWatcher {
    path: PathBuf,
    _watcher: RecommendedWatcher,
    task: JoinHandle<()>,
}

impl DocumentWatcher {
    /// Start watching `path`, reloading `store` on every change. Must be
    /// called from within a tokio runtime.
    pub fn spawn(path: impl Into<PathBuf>, store: Arc<EventStore>) -> Result<Self> {
        let path = path.into();
        let watched_dir = path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let file_name = path.file_name().map(|name| name.to_os_string());

        let (tx, rx) = mpsc::channel::<()>(1);
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            match res {
                Ok(event) if is_relevant(&event, file_name.as_deref()) => {
                    let _ = tx.try_send(());
                }
                Ok(_) => {}
                Err(e) => tracing::warn!(error = %e, "source: watch error"),
            }
        })
        .map_err(|source| SourceError::Watch {
            path: path.clone(),
            source,
        })?;

        watcher
            .watch(&watched_dir, RecursiveMode::NonRecursive)
            .map_err(|source| SourceError::Watch {
                path: path.clone(),
                source,
            })?;
        tracing::info!(path = %path.display(), "source: watching for changes");

        let task = tokio::spawn(reload_loop(path.clone(), store, rx));
        Ok(Self {
            path,
            _watcher: watcher,
            task,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for DocumentWatcher {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn reload_loop(path: PathBuf, store: Arc<EventStore>, mut rx: mpsc::Receiver<()>) {
    while rx.recv().await.is_some() {
        tokio::time::sleep(SETTLE).await;
        while rx.try_recv().is_ok() {}

        // Reading and normalizing the whole document is blocking work.
        let (doc, target) = (path.clone(), Arc::clone(&store));
        match tokio::task::spawn_blocking(move || reload_from(&doc, &target)).await {
            Ok(Ok(set)) => tracing::info!(
                path = %path.display(),
                events = set.len(),
                generation = set.generation(),
                "source: reloaded"
            ),
            Ok(Err(e)) => tracing::warn!(
                error = %e,
                "source: reload failed, keeping previous working set"
            ),
            Err(e) => tracing::error!(error = %e, "source: reload task failed"),
        }
    }
}

/// Whether a filesystem event concerns the watched document.
pub fn is_relevant(event: &Event, file_name: Option<&std::ffi::OsStr>) -> bool {
    if !matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_)) {
        return false;
    }
    match file_name {
        Some(name) => event.paths.iter().any(|p| p.file_name() == Some(name)),
        None => true,
    }
}
