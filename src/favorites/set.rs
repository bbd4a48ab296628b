use serde_json::Value;

use crate::catalog::{MovieId, MovieSummary};
use crate::storage::StorageError;

/// Movies keyed by id, in insertion order. Never holds two equal ids.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FavoritesSet {
    movies: Vec<MovieSummary>,
}

impl FavoritesSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set, keeping the first occurrence of every id.
    pub fn from_movies(movies: impl IntoIterator<Item = MovieSummary>) -> Self {
        let mut set = Self::new();
        for movie in movies {
            if !set.contains(movie.id) {
                set.movies.push(movie);
            }
        }
        set
    }

    /// Decode a persisted value.
    ///
    /// The value must be a JSON array of objects. Anything else is reported
    /// as [`StorageError::Corrupt`]; callers treat that as an empty set.
    /// Objects that do not decode as a movie are skipped with a warning so
    /// the rest of the set survives.
    pub fn parse(key: &str, raw: &str) -> Result<Self, StorageError> {
        let corrupt = |reason: String| StorageError::Corrupt {
            key: key.to_string(),
            reason,
        };

        let value: Value = serde_json::from_str(raw).map_err(|e| corrupt(e.to_string()))?;
        let Value::Array(entries) = value else {
            return Err(corrupt("expected an array".to_string()));
        };

        let mut movies = Vec::with_capacity(entries.len());
        for (index, entry) in entries.into_iter().enumerate() {
            if !entry.is_object() {
                return Err(corrupt(format!("entry {} is not an object", index)));
            }
            match serde_json::from_value::<MovieSummary>(entry) {
                Ok(movie) => movies.push(movie),
                Err(e) => {
                    tracing::warn!(key = %key, index, error = %e, "Skipping undecodable favorite")
                }
            }
        }

        Ok(Self::from_movies(movies))
    }

    /// Serialize for persistence.
    pub fn to_json(&self) -> String {
        // A Vec of plain structs with string keys cannot fail to serialize.
        serde_json::to_string(&self.movies).unwrap_or_else(|_| "[]".to_string())
    }

    pub fn contains(&self, id: MovieId) -> bool {
        self.movies.iter().any(|m| m.id == id)
    }

    /// Remove `movie` if present, append it otherwise.
    ///
    /// Returns whether the movie is a member afterwards.
    pub fn toggle(&mut self, movie: MovieSummary) -> bool {
        if self.contains(movie.id) {
            self.movies.retain(|m| m.id != movie.id);
            false
        } else {
            self.movies.push(movie);
            true
        }
    }

    pub fn movies(&self) -> &[MovieSummary] {
        &self.movies
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }
}
