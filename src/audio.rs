use std::path::{Path, PathBuf};
use std::sync::{Arc, Weak};
use std::time::Duration;

use anyhow::Result;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::Serialize;
use tempfile::TempPath;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Reference to a synthesized clip owned by an [`AudioStore`]
#[derive(Debug, Clone, Serialize)]
pub struct AudioHandle {
    pub id: Uuid,
    pub path: PathBuf,
    pub created_at: DateTime<Utc>,
}

/// A file reserved for synthesis but not yet registered. Dropping it deletes
/// the file, so a failed synthesis leaves nothing behind.
#[derive(Debug)]
pub struct PendingClip {
    id: Uuid,
    path: TempPath,
}

impl PendingClip {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[derive(Debug)]
struct StoredClip {
    path: TempPath,
    created_at: DateTime<Utc>,
}

type ClipMap = DashMap<Uuid, StoredClip>;

/// Owner of the temporary audio files produced per request.
///
/// Every clip is deleted when it is released, when it outlives `ttl`, or
/// when the last clone of the store is dropped.
#[derive(Debug, Clone)]
pub struct AudioStore {
    dir: PathBuf,
    ttl: chrono::Duration,
    clips: Arc<ClipMap>,
}

impl AudioStore {
    pub fn new(dir: impl Into<PathBuf>, ttl: Duration) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        let ttl = chrono::Duration::from_std(ttl).unwrap_or_else(|_| chrono::Duration::days(365));
        Ok(Self {
            dir,
            ttl,
            clips: Arc::new(DashMap::new()),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn allocate(&self) -> Result<PendingClip> {
        let path = tempfile::Builder::new()
            .prefix("speech-")
            .suffix(".wav")
            .tempfile_in(&self.dir)?
            .into_temp_path();
        Ok(PendingClip {
            id: Uuid::new_v4(),
            path,
        })
    }

    pub fn commit(&self, pending: PendingClip) -> AudioHandle {
        let created_at = Utc::now();
        let handle = AudioHandle {
            id: pending.id,
            path: pending.path.to_path_buf(),
            created_at,
        };
        self.clips.insert(
            pending.id,
            StoredClip {
                path: pending.path,
                created_at,
            },
        );
        debug!("Stored audio clip {} at {}", handle.id, handle.path.display());
        handle
    }

    pub fn path(&self, id: &Uuid) -> Option<PathBuf> {
        self.clips.get(id).map(|clip| clip.path.to_path_buf())
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    /// Delete a clip now. Returns false if it was unknown or already gone.
    pub fn release(&self, id: &Uuid) -> bool {
        match self.clips.remove(id) {
            Some((id, clip)) => {
                delete_clip(id, clip);
                true
            }
            None => false,
        }
    }

    /// Delete every clip
    pub fn clear(&self) -> usize {
        let ids: Vec<Uuid> = self.clips.iter().map(|entry| *entry.key()).collect();
        ids.iter().filter(|id| self.release(id)).count()
    }

    /// Periodically delete expired clips. The task ends once every clone of
    /// the store has been dropped.
    pub fn spawn_sweeper(&self, every: Duration) -> JoinHandle<()> {
        let clips: Weak<ClipMap> = Arc::downgrade(&self.clips);
        let ttl = self.ttl;
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let Some(clips) = clips.upgrade() else {
                    break;
                };
                let removed = sweep(&clips, ttl, Utc::now());
                if removed > 0 {
                    info!("Deleted {} expired audio clips", removed);
                }
            }
        })
    }
}

fn sweep(clips: &ClipMap, ttl: chrono::Duration, now: DateTime<Utc>) -> usize {
    let expired: Vec<Uuid> = clips
        .iter()
        .filter(|entry| now - entry.created_at >= ttl)
        .map(|entry| *entry.key())
        .collect();

    expired
        .into_iter()
        .filter_map(|id| clips.remove(&id))
        .map(|(id, clip)| delete_clip(id, clip))
        .count()
}

fn delete_clip(id: Uuid, clip: StoredClip) {
    let path = clip.path.to_path_buf();
    match clip.path.close() {
        Ok(()) => debug!("Removed audio clip {} ({})", id, path.display()),
        Err(e) => warn!("Failed to remove audio clip {}: {}", path.display(), e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(dir: &Path) -> AudioStore {
        AudioStore::new(dir.join("audio"), Duration::from_secs(600)).unwrap()
    }

    #[test]
    fn allocate_creates_wav_in_store_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store(tmp.path());
        let pending = store.allocate().unwrap();

        assert!(pending.path().exists());
        assert!(pending.path().starts_with(store.dir()));
        assert_eq!(pending.path().extension().unwrap(), "wav");
    }

    #[test]
    fn dropping_pending_clip_deletes_file() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store(tmp.path());
        let pending = store.allocate().unwrap();
        let path = pending.path().to_path_buf();

        drop(pending);
        assert!(!path.exists());
        assert!(store.is_empty());
    }

    #[test]
    fn committed_clip_is_addressable_until_released() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store(tmp.path());
        let handle = store.commit(store.allocate().unwrap());

        assert_eq!(store.path(&handle.id), Some(handle.path.clone()));
        assert!(handle.path.exists());

        assert!(store.release(&handle.id));
        assert!(!handle.path.exists());
        assert!(store.path(&handle.id).is_none());
        assert!(!store.release(&handle.id));
    }

    #[test]
    fn sweep_only_removes_expired_clips() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store(tmp.path());
        let handle = store.commit(store.allocate().unwrap());

        assert_eq!(sweep(&store.clips, store.ttl, handle.created_at + chrono::Duration::seconds(10)), 0);
        assert!(handle.path.exists());

        assert_eq!(sweep(&store.clips, store.ttl, handle.created_at + chrono::Duration::seconds(600)), 1);
        assert!(!handle.path.exists());
        assert!(store.is_empty());
    }

    #[test]
    fn dropping_store_deletes_remaining_clips() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store(tmp.path());
        let a = store.commit(store.allocate().unwrap());
        let b = store.commit(store.allocate().unwrap());

        let clone = store.clone();
        drop(store);
        assert!(a.path.exists());
        drop(clone);
        assert!(!a.path.exists());
        assert!(!b.path.exists());
    }

    #[test]
    fn clear_removes_everything() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store(tmp.path());
        store.commit(store.allocate().unwrap());
        store.commit(store.allocate().unwrap());

        assert_eq!(store.clear(), 2);
        assert_eq!(store.len(), 0);
    }

    #[tokio::test]
    async fn sweeper_stops_after_store_dropped() {
        let tmp = tempfile::tempdir().unwrap();
        let store = AudioStore::new(tmp.path(), Duration::ZERO).unwrap();
        let handle = store.commit(store.allocate().unwrap());
        let task = store.spawn_sweeper(Duration::from_millis(10));

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!handle.path.exists());

        drop(store);
        tokio::time::timeout(Duration::from_secs(2), task)
            .await
            .expect("sweeper exits")
            .unwrap();
    }
}
