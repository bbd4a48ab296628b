use serde::{Deserialize, Serialize};

/// Stable catalog identifier of a movie.
pub type MovieId = u64;

/// The part of a movie shown in lists and kept in favorites.
///
/// Field names follow the catalog's JSON so a full result object decodes
/// directly; unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieSummary {
    pub id: MovieId,
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
}

impl MovieSummary {
    /// Release year, if the catalog supplied a date.
    pub fn release_year(&self) -> Option<&str> {
        self.release_date
            .as_deref()
            .and_then(|date| date.split('-').next())
            .filter(|year| !year.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: u64,
    pub name: String,
}

/// Full record for a single selected movie.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetails {
    #[serde(flatten)]
    pub summary: MovieSummary,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub homepage: Option<String>,
    #[serde(default)]
    pub genres: Vec<Genre>,
}

/// Build an image URL from a poster path.
///
/// Paths from the catalog start with `/`, but stored favorites written by
/// older clients may not; both forms produce a single separator.
pub fn poster_url(image_base: &str, poster_path: &str) -> String {
    format!(
        "{}/{}",
        image_base.trim_end_matches('/'),
        poster_path.trim_start_matches('/')
    )
}
