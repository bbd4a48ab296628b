//! Favorites: a persisted, de-duplicated set of movies.
//!
//! [`FavoritesStore`] keeps an in-memory snapshot of the set held by a
//! [`KeyValueStore`](crate::storage::KeyValueStore) and publishes it to
//! subscribers. [`FavoritesSync`] re-reads the snapshot whenever another
//! context writes the key, giving eventual convergence across contexts.
//! Concurrent toggles in different contexts are last-writer-wins.

mod set;
mod store;
mod sync;

pub use set::FavoritesSet;
pub use store::FavoritesStore;
pub use sync::FavoritesSync;
