use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;

use crate::catalog::{MovieId, MovieSummary};
use crate::storage::{ChangeFeed, KeyValueStore, StorageError};

use super::set::FavoritesSet;

/// One context's view of the persisted favorites set.
pub struct FavoritesStore {
    storage: Arc<dyn KeyValueStore>,
    key: String,
    snapshot: watch::Sender<FavoritesSet>,
    /// Serializes read-modify-write cycles issued through this instance.
    rmw: Mutex<()>,
}

impl FavoritesStore {
    /// Create the store and load the current persisted set.
    pub fn new(storage: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        let (snapshot, _) = watch::channel(FavoritesSet::new());
        let store = Self {
            storage,
            key: key.into(),
            snapshot,
            rmw: Mutex::new(()),
        };
        store.refresh();
        store
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Membership against the in-memory snapshot.
    pub fn is_favorite(&self, id: MovieId) -> bool {
        self.snapshot.borrow().contains(id)
    }

    /// Snapshot contents in insertion order.
    pub fn list(&self) -> Vec<MovieSummary> {
        self.snapshot.borrow().movies().to_vec()
    }

    pub fn snapshot(&self) -> FavoritesSet {
        self.snapshot.borrow().clone()
    }

    /// Receive every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<FavoritesSet> {
        self.snapshot.subscribe()
    }

    /// Discard the snapshot and re-read the persisted set.
    pub fn refresh(&self) {
        let _guard = self.rmw.lock();
        let set = self.read_persisted();
        tracing::debug!(key = %self.key, count = set.len(), "Favorites refreshed");
        self.publish(set);
    }

    /// Flip membership of `movie` and persist the result.
    ///
    /// Always starts from the latest persisted value, not the snapshot, so a
    /// write made by another context since the last refresh is kept. Returns
    /// the new membership state. Only a failed write is an error; the
    /// snapshot is left untouched in that case.
    pub fn toggle(&self, movie: MovieSummary) -> Result<bool, StorageError> {
        let _guard = self.rmw.lock();
        let mut set = self.read_persisted();
        let id = movie.id;
        let member = set.toggle(movie);

        self.storage.set(&self.key, &set.to_json())?;
        tracing::info!(key = %self.key, movie_id = id, favorite = member, "Favorite toggled");
        self.publish(set);
        Ok(member)
    }

    pub(crate) fn change_feed(&self) -> ChangeFeed {
        self.storage.subscribe(&self.key)
    }

    fn read_persisted(&self) -> FavoritesSet {
        let Some(raw) = self.storage.get(&self.key) else {
            return FavoritesSet::new();
        };
        match FavoritesSet::parse(&self.key, &raw) {
            Ok(set) => set,
            Err(err) => {
                tracing::warn!(error = %err, "Ignoring stored favorites");
                FavoritesSet::new()
            }
        }
    }

    fn publish(&self, set: FavoritesSet) {
        self.snapshot.send_if_modified(|current| {
            if *current == set {
                return false;
            }
            *current = set;
            true
        });
    }
}
