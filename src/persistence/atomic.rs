//! Atomic whole-file writes and lock files for the file container

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use super::errors::{StorageError, StorageResult};

/// Poll interval while waiting for a held lock
const LOCK_POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Age after which a lock file is assumed to be left over by a dead holder.
/// Locks are only held for one read-modify-write cycle.
pub const STALE_LOCK_AGE: Duration = Duration::from_secs(30);

/// Replace `target` with `content` using the write-temp-rename pattern.
///
/// Readers see either the old or the new file, never a partial write.
pub async fn write_atomic(target: &Path, content: &[u8]) -> StorageResult<()> {
    let temp_path = temp_path_for(target)?;

    let result = async {
        let mut file = fs::File::create(&temp_path).await?;
        file.write_all(content).await?;
        file.sync_all().await?;
        fs::rename(&temp_path, target).await
    }
    .await;

    if let Err(e) = result {
        let _ = fs::remove_file(&temp_path).await;
        return Err(StorageError::Io(e));
    }

    Ok(())
}

fn temp_path_for(target: &Path) -> StorageResult<PathBuf> {
    let filename = target.file_name().ok_or_else(|| {
        StorageError::configuration(format!("Path has no filename: {}", target.display()))
    })?;
    let parent = target.parent().unwrap_or_else(|| Path::new("."));

    Ok(parent.join(format!(
        "{}.tmp.{}",
        filename.to_string_lossy(),
        Uuid::new_v4()
    )))
}

/// Exclusive lock on a data file, held as `<file>.lock`.
///
/// The lock file is removed when the guard drops, so every exit path of the
/// holder releases it. A holder that dies without dropping the guard leaves
/// the file behind; waiters reclaim it once it is older than
/// [`STALE_LOCK_AGE`]. Reclaiming is best effort: two waiters reclaiming the
/// same stale file at once can both end up holding the lock.
#[derive(Debug)]
pub struct FileLock {
    lock_file: PathBuf,
}

impl FileLock {
    /// Try to acquire the lock without waiting.
    pub fn try_acquire(target_path: &Path) -> StorageResult<Option<FileLock>> {
        let lock_path = Self::lock_path(target_path);

        // create_new fails if another holder already created the file
        match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&lock_path)
        {
            Ok(mut file) => {
                use std::io::Write;
                let _ = file.write_all(std::process::id().to_string().as_bytes());
                Ok(Some(FileLock {
                    lock_file: lock_path,
                }))
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => Ok(None),
            Err(e) => Err(StorageError::Io(e)),
        }
    }

    /// Wait for the lock, giving up after `timeout`.
    pub async fn acquire(target_path: &Path, timeout: Duration) -> StorageResult<FileLock> {
        Self::acquire_reclaiming(target_path, timeout, STALE_LOCK_AGE).await
    }

    /// Like [`FileLock::acquire`], treating lock files older than
    /// `stale_after` as abandoned.
    pub async fn acquire_reclaiming(
        target_path: &Path,
        timeout: Duration,
        stale_after: Duration,
    ) -> StorageResult<FileLock> {
        let start = Instant::now();

        loop {
            if let Some(lock) = Self::try_acquire(target_path)? {
                return Ok(lock);
            }

            if Self::reclaim_stale(target_path, stale_after).await {
                continue;
            }

            if start.elapsed() >= timeout {
                return Err(StorageError::unavailable(format!(
                    "Failed to acquire lock on {} within {:?}",
                    target_path.display(),
                    timeout
                )));
            }

            tracing::debug!(path = %target_path.display(), "waiting for file lock");
            tokio::time::sleep(LOCK_POLL_INTERVAL).await;
        }
    }

    /// Remove the lock file if it was last modified more than `stale_after`
    /// ago. Returns whether it was removed.
    async fn reclaim_stale(target_path: &Path, stale_after: Duration) -> bool {
        let lock_path = Self::lock_path(target_path);
        let age = match fs::metadata(&lock_path).await.and_then(|m| m.modified()) {
            Ok(modified) => modified.elapsed().unwrap_or_default(),
            Err(_) => return false,
        };
        if age < stale_after {
            return false;
        }

        let holder = fs::read_to_string(&lock_path).await.unwrap_or_default();
        tracing::warn!(
            path = %lock_path.display(),
            holder = holder.trim(),
            age_secs = age.as_secs(),
            "reclaiming stale lock file"
        );
        fs::remove_file(&lock_path).await.is_ok()
    }

    /// Path of the lock file guarding `target_path`
    pub fn lock_path(target_path: &Path) -> PathBuf {
        let parent = target_path.parent().unwrap_or_else(|| Path::new("."));
        let filename = target_path.file_name().unwrap_or_default();
        parent.join(format!("{}.lock", filename.to_string_lossy()))
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.lock_file);
    }
}
