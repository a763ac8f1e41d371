/// HTTP backend provider
///
/// Talks to the rating backend:
/// 1. Catalog: `GET /movies` → `[{movie_id, title, genres}]`
/// 2. Prediction: `POST /predict_custom` → `{predicted_rating}` or `{error}`
///
/// The backend reports its own failures with a JSON `{error}` body and a
/// 4xx status, so the body is inspected before the status is.
use crate::{
    error::{AppError, AppResult},
    models::{Movie, PredictRequest, PredictResponse},
    services::providers::{CatalogSource, RatingPredictor},
};
use reqwest::Client as HttpClient;
use std::time::Duration;

#[derive(Clone)]
pub struct HttpBackend {
    http_client: HttpClient,
    api_url: String,
}

impl HttpBackend {
    /// Creates a backend client whose requests give up after `timeout`
    pub fn new(api_url: String, timeout: Duration) -> AppResult<Self> {
        let http_client = HttpClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            api_url: api_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_url, path)
    }
}

/// Turns a predictor reply into a rating
fn interpret_prediction(status: reqwest::StatusCode, body: &str) -> AppResult<f64> {
    match serde_json::from_str::<PredictResponse>(body) {
        Ok(parsed) if status.is_success() || parsed.error.is_some() => parsed.into_result(),
        Ok(_) => Err(AppError::RemoteError(format!(
            "Predictor returned status {}",
            status
        ))),
        Err(e) if status.is_success() => Err(AppError::RemoteError(format!(
            "Failed to parse predictor response: {}",
            e
        ))),
        Err(_) => Err(AppError::RemoteError(format!(
            "Predictor returned status {}: {}",
            status, body
        ))),
    }
}

#[async_trait::async_trait]
impl CatalogSource for HttpBackend {
    async fn fetch_movies(&self) -> AppResult<Vec<Movie>> {
        let url = self.url("movies");

        let response = self.http_client.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::RemoteError(format!(
                "Catalog endpoint returned status {}: {}",
                status, body
            )));
        }

        let movies: Vec<Movie> = response.json().await?;

        tracing::debug!(url = %url, movies = movies.len(), "Catalog fetched");

        Ok(movies)
    }

    fn name(&self) -> &'static str {
        "http_backend"
    }
}

#[async_trait::async_trait]
impl RatingPredictor for HttpBackend {
    async fn predict(&self, request: &PredictRequest) -> AppResult<f64> {
        let url = self.url("predict_custom");

        let response = self.http_client.post(&url).json(request).send().await?;

        let status = response.status();
        let body = response.text().await?;

        tracing::debug!(status = %status, response = %body, "Raw predictor response");

        interpret_prediction(status, &body)
    }

    fn name(&self) -> &'static str {
        "http_backend"
    }
}
