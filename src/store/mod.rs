pub mod models;
mod snapshot;

pub use snapshot::Snapshot;

use std::io::ErrorKind;
use std::path::PathBuf;

use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::error::Error;

/// Single owner of the persisted state. All reads and writes go through this
/// type; mutations are write-through and the in-memory mirror is only updated
/// once the snapshot has been replaced on disk.
pub struct Store {
    path: PathBuf,
    state: Mutex<Snapshot>,
}

impl Store {
    /// Load the snapshot at `path`, starting empty if the file does not exist.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, Error> {
        let path = path.into();
        let state = match tokio::fs::read(&path).await {
            Ok(bytes) => {
                let snapshot: Snapshot = serde_json::from_slice(&bytes)?;
                info!(
                    users = snapshot.users.len(),
                    mutes = snapshot.mutes.len(),
                    "loaded snapshot from {}",
                    path.display()
                );
                snapshot
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("no snapshot at {}, starting empty", path.display());
                Snapshot::default()
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            path,
            state: Mutex::new(state),
        })
    }

    /// Apply `f` to the snapshot and persist the result. If the write fails
    /// the in-memory state is left untouched and the mutation is lost.
    pub async fn mutate<T>(&self, f: impl FnOnce(&mut Snapshot) -> T) -> Result<T, Error> {
        let mut guard = self.state.lock().await;
        let mut working = guard.clone();
        let out = f(&mut working);
        self.persist(&working).await?;
        *guard = working;
        Ok(out)
    }

    /// Read from the snapshot without persisting.
    pub async fn read<T>(&self, f: impl FnOnce(&Snapshot) -> T) -> T {
        let guard = self.state.lock().await;
        f(&guard)
    }

    /// Owned copy of the current state.
    pub async fn snapshot(&self) -> Snapshot {
        self.state.lock().await.clone()
    }

    /// Write to a sibling temp file, then rename over the target so readers
    /// never observe a torn snapshot.
    async fn persist(&self, snapshot: &Snapshot) -> Result<(), Error> {
        let bytes = serde_json::to_vec_pretty(snapshot)?;
        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, &bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        debug!(bytes = bytes.len(), "snapshot persisted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::models::{MuteRecord, UserId};
    use chrono::Utc;
    use tokio_test::assert_ok;

    #[tokio::test]
    async fn mutations_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");

        let store = Store::open(&path).await.unwrap();
        let now = Utc::now();
        let write = store
            .mutate(|snap| {
                snap.user_mut(UserId(7), now).daily_seconds = 120;
                snap.mutes.insert(
                    UserId(7),
                    MuteRecord {
                        moderator_id: UserId(1),
                        reason: "spam".into(),
                        duration_seconds: 600,
                        start_time: now,
                        unmute_time: now + chrono::Duration::seconds(600),
                    },
                );
            })
            .await;
        assert_ok!(write);

        let reopened = Store::open(&path).await.unwrap();
        let snap = reopened.snapshot().await;
        assert_eq!(snap.users[&UserId(7)].daily_seconds, 120);
        assert_eq!(snap.mutes[&UserId(7)].duration_seconds, 600);
    }

    #[tokio::test]
    async fn failed_persist_leaves_memory_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        // Parent directory does not exist, so every write fails.
        let path = dir.path().join("missing").join("data.json");

        let store = Store::open(&path).await.unwrap();
        let result = store
            .mutate(|snap| {
                snap.rdm_users.insert(UserId(5));
            })
            .await;

        assert!(result.is_err());
        assert!(!store.read(|s| s.rdm_users.contains(&UserId(5))).await);
    }

    #[tokio::test]
    async fn empty_file_path_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path().join("fresh.json")).await.unwrap();
        assert!(store.read(|s| s.users.is_empty()).await);
    }
}
