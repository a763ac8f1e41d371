/// Backend collaborator abstraction
///
/// The catalog and the rating predictor live behind a remote service. Each
/// concern gets its own trait so tests can stub one without the other; the
/// HTTP backend implements both.
use crate::{
    error::AppResult,
    models::{Movie, PredictRequest},
};

pub mod http_backend;

pub use http_backend::HttpBackend;

/// Source of the full movie catalog
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch every known movie, in the order the source lists them
    async fn fetch_movies(&self) -> AppResult<Vec<Movie>>;

    /// Source name for logging
    fn name(&self) -> &'static str;
}

/// Remote rating predictor
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RatingPredictor: Send + Sync {
    /// Estimate the rating of `request.target_movie_id` given the rated movies
    ///
    /// Implementations map "service answered with an error" to `RemoteError`
    /// and transport problems to `NetworkTimeout` / `NetworkFailure`.
    async fn predict(&self, request: &PredictRequest) -> AppResult<f64>;

    /// Predictor name for logging
    fn name(&self) -> &'static str;
}
