use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::{Movie, MovieId, Prediction, RatedMovie, Rating},
    services::{
        catalog::Catalog,
        ledger::Ledger,
        matcher,
        prediction::PredictionClient,
        providers::RatingPredictor,
    },
};

/// A rating as the user typed it: a JSON number or free text like `"4.5"`
///
/// Any other JSON value (including a missing field) lands in `Other` and is
/// refused as an invalid rating.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum RatingInput {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

impl Default for RatingInput {
    fn default() -> Self {
        RatingInput::Other(serde_json::Value::Null)
    }
}

impl RatingInput {
    fn value(&self) -> AppResult<f64> {
        match self {
            RatingInput::Number(value) => Ok(*value),
            RatingInput::Text(text) => Rating::parse(text)
                .map(Rating::value)
                .ok_or_else(|| AppError::InvalidRating(text.clone())),
            RatingInput::Other(value) => Err(AppError::InvalidRating(value.to_string())),
        }
    }
}

impl From<f64> for RatingInput {
    fn from(value: f64) -> Self {
        RatingInput::Number(value)
    }
}

/// One user's rating session
///
/// Owns the catalog, the ledger and the prediction client. Each method is
/// the handler for one user action: it validates raw input and either
/// applies it or returns the reason it was refused.
pub struct Session {
    catalog: Arc<Catalog>,
    ledger: RwLock<Ledger>,
    prediction: PredictionClient,
    suggestion_limit: usize,
}

impl Session {
    pub fn new(catalog: Catalog, prediction: PredictionClient, suggestion_limit: usize) -> Self {
        Self {
            catalog: Arc::new(catalog),
            ledger: RwLock::new(Ledger::new()),
            prediction,
            suggestion_limit,
        }
    }

    /// Wires a session from configuration
    pub fn from_config(
        catalog: Catalog,
        predictor: Arc<dyn RatingPredictor>,
        config: &Config,
    ) -> Self {
        let prediction =
            PredictionClient::new(predictor, config.min_ratings, config.request_timeout());
        Self::new(catalog, prediction, config.suggestion_limit)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Rates the movie whose title matches `title`
    ///
    /// Checks run in order: blank title, unknown title, already rated,
    /// invalid rating. A refused add leaves the ledger untouched.
    pub async fn add_rating(&self, title: &str, rating: RatingInput) -> AppResult<RatedMovie> {
        if title.trim().is_empty() {
            return Err(AppError::EmptyInput("title"));
        }

        let movie = matcher::resolve_exact(title, &self.catalog)
            .ok_or_else(|| AppError::MovieNotFound(title.to_string()))?;

        let mut ledger = self.ledger.write().await;
        if ledger.contains(&movie.movie_id) {
            return Err(AppError::DuplicateEntry(movie.movie_id.clone()));
        }

        let rating = ledger.add(movie, rating.value()?)?.rating;

        tracing::info!(
            movie_id = %movie.movie_id,
            title = %movie.title,
            rating = %rating,
            rated_count = ledger.len(),
            "Movie rated"
        );

        Ok(RatedMovie {
            movie: movie.clone(),
            rating,
        })
    }

    /// Forgets the rating for `movie_id`; unknown ids are ignored
    pub async fn remove_rating(&self, movie_id: &MovieId) -> bool {
        let removed = self.ledger.write().await.remove(movie_id);

        if removed {
            tracing::info!(movie_id = %movie_id, "Rating removed");
        }

        removed
    }

    /// Rated movies in the order they were added
    pub async fn rated_movies(&self) -> Vec<RatedMovie> {
        let ledger = self.ledger.read().await;

        ledger
            .entries()
            .iter()
            .filter_map(|entry| {
                self.catalog.get(&entry.movie_id).map(|movie| RatedMovie {
                    movie: movie.clone(),
                    rating: entry.rating,
                })
            })
            .collect()
    }

    pub async fn rated_count(&self) -> usize {
        self.ledger.read().await.len()
    }

    /// Autocomplete candidates for `query`, skipping movies already rated
    pub async fn suggestions(&self, query: &str) -> Vec<Movie> {
        let exclude = self.ledger.read().await.movie_ids();

        matcher::suggest(query, &self.catalog, &exclude, self.suggestion_limit)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Predicts the rating for the movie titled `target_title`
    ///
    /// The ledger is copied before the network call so ratings can still be
    /// edited while the predictor works.
    pub async fn predict(&self, target_title: &str) -> AppResult<Prediction> {
        if target_title.trim().is_empty() {
            return Err(AppError::EmptyInput("target title"));
        }

        let target = matcher::resolve_exact(target_title, &self.catalog)
            .ok_or_else(|| AppError::MovieNotFound(target_title.to_string()))?;

        let snapshot = self.ledger.read().await.entries().to_vec();

        self.prediction.predict(snapshot, target).await
    }

    /// Aborts a pending prediction, if any
    pub fn cancel_prediction(&self) {
        tracing::info!(busy = self.prediction.is_busy(), "Prediction cancel requested");
        self.prediction.cancel();
    }
}
