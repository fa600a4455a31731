//! Debounced auto-backup.
//!
//! Every catalog mutation calls [`AutoBackup::schedule`]. Only one timer is
//! ever pending: scheduling again aborts it and starts a fresh delay, so a
//! burst of edits produces a single snapshot once the catalog has been quiet
//! for the configured delay.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use tabli::libs::auto_backup::AutoBackup;
//!
//! # async fn demo() {
//! let auto_backup = Arc::new(AutoBackup::new(Duration::from_millis(2000), Arc::new(|| Ok(()))));
//! auto_backup.schedule();
//! auto_backup.schedule(); // restarts the delay
//! auto_backup.flush(); // runs the pending job now
//! # }
//! ```

use crate::db::db::Db;
use crate::libs::backup::{export_document, write_backup};
use crate::libs::config::AutoBackupConfig;
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

pub const DEFAULT_DELAY: Duration = Duration::from_millis(2000);

/// Work performed when the delay expires.
pub type BackupJob = Arc<dyn Fn() -> anyhow::Result<()> + Send + Sync>;

struct Pending {
    handle: JoinHandle<()>,
    /// Cleared by whichever side runs or drops the job first.
    armed: Arc<AtomicBool>,
}

pub struct AutoBackup {
    delay: Duration,
    job: BackupJob,
    pending: Mutex<Option<Pending>>,
}

impl AutoBackup {
    pub fn new(delay: Duration, job: BackupJob) -> Self {
        Self {
            delay,
            job,
            pending: Mutex::new(None),
        }
    }

    /// Builds the scheduler described by the config, or `None` when
    /// auto-backup is disabled.
    pub fn from_config(config: &AutoBackupConfig, db_path: PathBuf, file_prefix: &str) -> Option<Arc<Self>> {
        if !config.enabled {
            return None;
        }
        let job = snapshot_job(db_path, config.directory.clone(), file_prefix.to_string());
        Some(Arc::new(Self::new(Duration::from_millis(config.delay_ms), job)))
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// (Re)starts the quiescence timer. Without a tokio runtime this is a no-op.
    pub fn schedule(&self) {
        let Ok(runtime) = Handle::try_current() else {
            tracing::debug!("no async runtime, auto-backup not scheduled");
            return;
        };

        let mut pending = self.pending.lock();
        if let Some(previous) = pending.take() {
            previous.armed.store(false, Ordering::SeqCst);
            previous.handle.abort();
        }

        let armed = Arc::new(AtomicBool::new(true));
        let task_armed = Arc::clone(&armed);
        let job = Arc::clone(&self.job);
        let delay = self.delay;
        let handle = runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            if task_armed.swap(false, Ordering::SeqCst) {
                // the job does blocking sqlite and file I/O
                if let Err(e) = tokio::task::spawn_blocking(move || run_job(&job)).await {
                    tracing::warn!(error = %e, "auto-backup task did not complete");
                }
            }
        });

        *pending = Some(Pending { handle, armed });
    }

    /// Runs a pending job right away. Returns whether one was pending.
    pub fn flush(&self) -> bool {
        let Some(pending) = self.pending.lock().take() else {
            return false;
        };
        pending.handle.abort();
        if pending.armed.swap(false, Ordering::SeqCst) {
            run_job(&self.job);
            true
        } else {
            false
        }
    }

    /// Drops a pending job without running it.
    pub fn cancel(&self) {
        if let Some(pending) = self.pending.lock().take() {
            pending.armed.store(false, Ordering::SeqCst);
            pending.handle.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .lock()
            .as_ref()
            .is_some_and(|pending| pending.armed.load(Ordering::SeqCst))
    }
}

fn run_job(job: &BackupJob) {
    match job() {
        Ok(()) => tracing::info!("auto-backup completed"),
        Err(e) => tracing::warn!(error = %e, "auto-backup failed"),
    }
}

/// Snapshots the database at `db_path`. With a sink directory the snapshot is
/// also written there as a timestamped file; either way the "last backup"
/// marker is refreshed.
pub fn snapshot_job(db_path: PathBuf, sink_dir: Option<PathBuf>, file_prefix: String) -> BackupJob {
    Arc::new(move || {
        let db = Db::open(&db_path)?;
        match &sink_dir {
            Some(dir) => {
                write_backup(&db.conn, dir, &file_prefix)?;
            }
            None => {
                export_document(&db.conn)?;
            }
        }
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn counting() -> (Arc<AtomicUsize>, BackupJob) {
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&runs);
        let job: BackupJob = Arc::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });
        (runs, job)
    }

    #[test]
    fn test_schedule_without_runtime_is_noop() {
        let (runs, job) = counting();
        let auto_backup = AutoBackup::new(DEFAULT_DELAY, job);
        auto_backup.schedule();
        assert!(!auto_backup.is_pending());
        assert!(!auto_backup.flush());
        assert_eq!(runs.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_drops_pending_job() {
        let (runs, job) = counting();
        let auto_backup = AutoBackup::new(DEFAULT_DELAY, job);
        auto_backup.schedule();
        assert!(auto_backup.is_pending());
        auto_backup.cancel();
        tokio::time::sleep(DEFAULT_DELAY * 2).await;
        assert_eq!(runs.load(Ordering::SeqCst), 0);
    }
}
