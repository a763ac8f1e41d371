use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

use crate::error::{AppError, AppResult};

pub mod rating;

pub use rating::{Rating, MAX_RATING, MIN_RATING};

/// Opaque movie identifier as issued by the catalog
///
/// The backend sends ids as strings, but numeric ids are accepted too and
/// kept in their decimal string form so both compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "RawMovieId", into = "String")]
pub struct MovieId(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawMovieId {
    Text(String),
    Number(serde_json::Number),
}

impl From<RawMovieId> for MovieId {
    fn from(raw: RawMovieId) -> Self {
        match raw {
            RawMovieId::Text(id) => MovieId(id),
            RawMovieId::Number(id) => MovieId(id.to_string()),
        }
    }
}

impl From<MovieId> for String {
    fn from(id: MovieId) -> Self {
        id.0
    }
}

impl From<String> for MovieId {
    fn from(id: String) -> Self {
        MovieId(id)
    }
}

impl From<&str> for MovieId {
    fn from(id: &str) -> Self {
        MovieId(id.to_string())
    }
}

impl MovieId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for MovieId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A catalog movie. Only ever built by deserializing the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Movie {
    pub movie_id: MovieId,
    pub title: String,
    /// Pipe-separated genre list, e.g. `"Action|Sci-Fi"`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genres: Option<String>,
}

/// One (movie, rating) pair in the ledger
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RatedEntry {
    pub movie_id: MovieId,
    pub rating: Rating,
}

/// A ledger entry joined with its catalog movie
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RatedMovie {
    pub movie: Movie,
    pub rating: Rating,
}

// ============================================================================
// Predictor API Types
// ============================================================================

/// Request body for `POST /predict_custom`
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PredictRequest {
    pub rated_movies: Vec<RatedEntry>,
    pub target_movie_id: MovieId,
}

/// Raw response from `POST /predict_custom`
///
/// The backend answers either `{"predicted_rating": 3.87}` or `{"error": "..."}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PredictResponse {
    #[serde(default)]
    pub predicted_rating: Option<f64>,
    #[serde(default)]
    pub error: Option<String>,
}

impl PredictResponse {
    pub fn into_result(self) -> AppResult<f64> {
        match (self.predicted_rating, self.error) {
            (Some(rating), _) => Ok(rating),
            (None, Some(error)) => Err(AppError::RemoteError(error)),
            (None, None) => Err(AppError::RemoteError("unknown error".to_string())),
        }
    }
}

/// A successful prediction for a target movie
#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    pub movie: Movie,
    pub predicted_rating: f64,
    /// Number of rated movies the prediction was based on
    pub rated_count: usize,
    pub predicted_at: DateTime<Utc>,
}
