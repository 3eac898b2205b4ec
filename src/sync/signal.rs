use std::ffi::OsString;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::{mpsc, oneshot};

/// How long to wait without any other trigger before re-fetching anyway.
pub const IDLE_TIMEOUT: Duration = Duration::from_secs(120);

/// Which trigger ended a wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wake {
    HeadChanged,
    Requested,
    IdleTimeout,
}

type Slot = Arc<Mutex<Option<oneshot::Sender<()>>>>;

/// Handle the UI uses to say "the data may have changed now".
#[derive(Clone)]
pub struct RefreshTrigger {
    slot: Slot,
}

impl RefreshTrigger {
    /// Wakes the pending wait. Between waits this does nothing and returns `false`.
    pub fn fire(&self) -> bool {
        let sender = match self.slot.lock() {
            Ok(mut slot) => slot.take(),
            Err(_) => None,
        };
        match sender {
            Some(tx) => tx.send(()).is_ok(),
            None => false,
        }
    }
}

/// Clears the trigger slot however the wait ends, including when it is dropped.
struct SlotGuard(Slot);

impl Drop for SlotGuard {
    fn drop(&mut self) {
        if let Ok(mut slot) = self.0.lock() {
            slot.take();
        }
    }
}

/// Merges head-file changes, manual refresh requests and an idle timer into a
/// single wake-up per call.
pub struct ChangeSource {
    head_path: PathBuf,
    idle: Duration,
    slot: Slot,
}

impl ChangeSource {
    pub fn new(head_path: impl Into<PathBuf>, idle: Duration) -> Self {
        Self {
            head_path: head_path.into(),
            idle,
            slot: Arc::new(Mutex::new(None)),
        }
    }

    pub fn trigger(&self) -> RefreshTrigger {
        RefreshTrigger {
            slot: self.slot.clone(),
        }
    }

    /// Starts a wait. The refresh slot and head watcher are armed before this
    /// returns, so a `fire()` made before the future is first polled still
    /// counts. The future resolves on the first trigger; the watcher, timer
    /// and slot of the losing triggers are released with it, also when the
    /// future is dropped unfinished.
    pub fn wait(&mut self) -> impl Future<Output = Wake> {
        let (tx, rx) = oneshot::channel();
        if let Ok(mut slot) = self.slot.lock() {
            *slot = Some(tx);
        }
        let guard = SlotGuard(self.slot.clone());

        let (fs_tx, mut fs_rx) = mpsc::unbounded_channel();
        let watcher = match watch_head(&self.head_path, fs_tx) {
            Ok(watcher) => Some(watcher),
            Err(e) => {
                tracing::warn!(path = %self.head_path.display(), error = %e, "head watch failed");
                None
            }
        };
        let idle = self.idle;

        async move {
            let _guard = guard;
            let wake = tokio::select! {
                Some(()) = fs_rx.recv(), if watcher.is_some() => Wake::HeadChanged,
                Ok(()) = rx => Wake::Requested,
                _ = tokio::time::sleep(idle) => Wake::IdleTimeout,
            };

            drop(watcher);
            tracing::debug!(?wake, "change signal");
            wake
        }
    }
}

/// Watch the directory holding the head file so that git's write-then-rename
/// counts as a change. Only events naming the head file are forwarded.
fn watch_head(
    head_path: &Path,
    tx: mpsc::UnboundedSender<()>,
) -> notify::Result<RecommendedWatcher> {
    let file_name: OsString = head_path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("HEAD"));
    let dir = match head_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
        let Ok(event) = res else { return };
        if !matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_)) {
            return;
        }
        if event
            .paths
            .iter()
            .any(|p| p.file_name() == Some(file_name.as_os_str()))
        {
            let _ = tx.send(());
        }
    })?;
    watcher.watch(&dir, RecursiveMode::NonRecursive)?;
    Ok(watcher)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn head_in(dir: &Path) -> PathBuf {
        let path = dir.join("HEAD");
        std::fs::write(&path, "ref: refs/heads/main\n").unwrap();
        path
    }

    #[tokio::test]
    async fn requested_wake_wins_and_clears_slot() {
        let dir = tempfile::tempdir().unwrap();
        let mut source = ChangeSource::new(head_in(dir.path()), IDLE_TIMEOUT);
        let trigger = source.trigger();

        let (wake, fired) = tokio::time::timeout(Duration::from_secs(5), async {
            tokio::join!(source.wait(), async {
                tokio::task::yield_now().await;
                trigger.fire()
            })
        })
        .await
        .unwrap();

        assert_eq!(wake, Wake::Requested);
        assert!(fired);
        // Slot is discarded once the wait returns.
        assert!(!trigger.fire());
    }

    #[tokio::test]
    async fn fire_before_first_poll_is_not_lost() {
        let dir = tempfile::tempdir().unwrap();
        let mut source = ChangeSource::new(head_in(dir.path()), IDLE_TIMEOUT);
        let trigger = source.trigger();

        let wait = source.wait();
        assert!(trigger.fire());
        let wake = tokio::time::timeout(Duration::from_secs(5), wait)
            .await
            .unwrap();
        assert_eq!(wake, Wake::Requested);
    }

    #[tokio::test]
    async fn unpolled_wait_releases_slot_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let mut source = ChangeSource::new(head_in(dir.path()), IDLE_TIMEOUT);
        let trigger = source.trigger();

        drop(source.wait());
        assert!(!trigger.fire());
    }

    #[tokio::test]
    async fn fire_between_waits_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let mut source = ChangeSource::new(head_in(dir.path()), Duration::from_millis(50));
        let trigger = source.trigger();

        assert!(!trigger.fire());
        assert_eq!(source.wait().await, Wake::IdleTimeout);
    }

    #[tokio::test]
    async fn idle_timeout_wakes() {
        let dir = tempfile::tempdir().unwrap();
        let mut source = ChangeSource::new(head_in(dir.path()), Duration::from_millis(20));
        assert_eq!(source.wait().await, Wake::IdleTimeout);
    }

    #[tokio::test]
    async fn head_write_wakes() {
        let dir = tempfile::tempdir().unwrap();
        let head = head_in(dir.path());
        let mut source = ChangeSource::new(head.clone(), Duration::from_secs(10));

        let (wake, _) = tokio::join!(source.wait(), async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            std::fs::write(&head, "ref: refs/heads/bug-12345678\n").unwrap();
        });

        assert_eq!(wake, Wake::HeadChanged);
    }

    #[tokio::test]
    async fn unrelated_files_do_not_wake() {
        let dir = tempfile::tempdir().unwrap();
        let head = head_in(dir.path());
        let mut source = ChangeSource::new(head, Duration::from_millis(400));
        let other = dir.path().join("ORIG_HEAD");

        let (wake, _) = tokio::join!(source.wait(), async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            std::fs::write(&other, "deadbeef\n").unwrap();
        });

        assert_eq!(wake, Wake::IdleTimeout);
    }

    #[tokio::test]
    async fn dropped_wait_releases_slot() {
        let dir = tempfile::tempdir().unwrap();
        let mut source = ChangeSource::new(head_in(dir.path()), IDLE_TIMEOUT);
        let trigger = source.trigger();

        let res = tokio::time::timeout(Duration::from_millis(20), source.wait()).await;
        assert!(res.is_err());
        assert!(!trigger.fire());
    }

    #[tokio::test]
    async fn missing_directory_still_times_out() {
        let dir = tempfile::tempdir().unwrap();
        let head = dir.path().join("nope").join("HEAD");
        let mut source = ChangeSource::new(head, Duration::from_millis(20));
        assert_eq!(source.wait().await, Wake::IdleTimeout);
    }
}
