use std::collections::HashSet;

use crate::{
    error::AppError,
    models::{Movie, MovieId, RatedEntry, Rating},
};

/// Reasons the ledger refuses an entry
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum LedgerError {
    #[error("movie {0} already rated")]
    AlreadyExists(MovieId),

    #[error("invalid rating {0}")]
    InvalidRating(f64),
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::AlreadyExists(id) => AppError::DuplicateEntry(id),
            LedgerError::InvalidRating(value) => AppError::InvalidRating(value.to_string()),
        }
    }
}

/// The user's rated movies, in the order they were added
///
/// Never holds two entries for the same movie id.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    entries: Vec<RatedEntry>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a rating for `movie`
    ///
    /// The duplicate check runs before rating validation.
    pub fn add(&mut self, movie: &Movie, rating: f64) -> Result<&RatedEntry, LedgerError> {
        if self.contains(&movie.movie_id) {
            return Err(LedgerError::AlreadyExists(movie.movie_id.clone()));
        }

        let rating = Rating::new(rating).ok_or(LedgerError::InvalidRating(rating))?;

        self.entries.push(RatedEntry {
            movie_id: movie.movie_id.clone(),
            rating,
        });

        tracing::debug!(
            movie_id = %movie.movie_id,
            rating = %rating,
            size = self.entries.len(),
            "Rating added"
        );

        Ok(&self.entries[self.entries.len() - 1])
    }

    /// Removes the entry for `movie_id`; absent ids are ignored
    ///
    /// Returns whether anything was removed.
    pub fn remove(&mut self, movie_id: &MovieId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| &e.movie_id != movie_id);
        let removed = self.entries.len() != before;

        if removed {
            tracing::debug!(movie_id = %movie_id, size = self.entries.len(), "Rating removed");
        }

        removed
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, movie_id: &MovieId) -> bool {
        self.entries.iter().any(|e| &e.movie_id == movie_id)
    }

    pub fn get(&self, movie_id: &MovieId) -> Option<&RatedEntry> {
        self.entries.iter().find(|e| &e.movie_id == movie_id)
    }

    /// Entries in insertion order
    pub fn entries(&self) -> &[RatedEntry] {
        &self.entries
    }

    pub fn movie_ids(&self) -> HashSet<MovieId> {
        self.entries.iter().map(|e| e.movie_id.clone()).collect()
    }
}
