use chrono::{DateTime, Utc};

use crate::{
    error::{AppError, AppResult},
    models::{Movie, MovieId},
    services::{normalizer::normalize, providers::CatalogSource},
};

/// A catalog movie with its precomputed match keys
#[derive(Debug, Clone)]
pub(crate) struct CatalogEntry {
    pub movie: Movie,
    /// `normalize(title)`, used for exact resolution
    pub normalized_title: String,
    /// `title.to_lowercase()`, used for suggestions
    pub lowercase_title: String,
}

/// Read-only movie catalog, loaded once per process
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    loaded_at: DateTime<Utc>,
}

impl Catalog {
    /// Fetches the catalog from its source
    ///
    /// A failed fetch is `CatalogUnavailable`; an empty catalog is not an error.
    pub async fn initialize(source: &dyn CatalogSource) -> AppResult<Self> {
        let movies = source.fetch_movies().await.map_err(|e| {
            tracing::error!(error = %e, source = source.name(), "Catalog fetch failed");
            AppError::CatalogUnavailable(e.to_string())
        })?;

        let catalog = Self::from_movies(movies);

        if catalog.is_empty() {
            tracing::warn!(source = source.name(), "Catalog loaded but contains no movies");
        } else {
            tracing::info!(
                movies = catalog.len(),
                source = source.name(),
                "Catalog loaded"
            );
        }

        Ok(catalog)
    }

    /// Builds a catalog from movies already in hand, keeping their order
    pub fn from_movies(movies: Vec<Movie>) -> Self {
        let entries = movies
            .into_iter()
            .map(|movie| CatalogEntry {
                normalized_title: normalize(&movie.title),
                lowercase_title: movie.title.to_lowercase(),
                movie,
            })
            .collect();

        Self {
            entries,
            loaded_at: Utc::now(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    /// Looks up a movie by id
    pub fn get(&self, movie_id: &MovieId) -> Option<&Movie> {
        self.movies().find(|m| &m.movie_id == movie_id)
    }

    /// Movies in catalog order
    pub fn movies(&self) -> impl Iterator<Item = &Movie> {
        self.entries.iter().map(|e| &e.movie)
    }

    pub(crate) fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }
}
