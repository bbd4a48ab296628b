use std::sync::Arc;

use tokio::task::JoinHandle;

use super::store::FavoritesStore;

/// Background task that refreshes a [`FavoritesStore`] whenever another
/// context changes its key.
///
/// The subscription is taken before `spawn` returns, so no change made
/// after that point is missed. Dropping the handle stops the task.
pub struct FavoritesSync {
    handle: JoinHandle<()>,
}

impl FavoritesSync {
    /// Start listening. Must be called within a tokio runtime.
    pub fn spawn(store: Arc<FavoritesStore>) -> Self {
        let mut feed = store.change_feed();
        let handle = tokio::spawn(async move {
            while let Some(change) = feed.changed().await {
                tracing::debug!(
                    key = %change.key,
                    origin = %change.origin,
                    "Favorites changed in another context"
                );
                store.refresh();
            }
        });
        Self { handle }
    }

    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }
}

impl Drop for FavoritesSync {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
