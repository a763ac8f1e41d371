use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::middleware::request_id::RequestId;
use crate::models::{Movie, MovieId, Prediction, RatedMovie};
use crate::services::RatingInput;

use super::extract::ApiJson;
use super::AppState;

// Request/Response types

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub catalog_size: usize,
    pub catalog_loaded_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct SuggestionQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Deserialize)]
pub struct AddRatingRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub rating: RatingInput,
}

#[derive(Debug, Serialize)]
pub struct RatedMovieResponse {
    pub movie_id: MovieId,
    pub title: String,
    pub rating: f64,
}

impl From<RatedMovie> for RatedMovieResponse {
    fn from(rated: RatedMovie) -> Self {
        Self {
            movie_id: rated.movie.movie_id,
            title: rated.movie.title,
            rating: rated.rating.value(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PredictRequestBody {
    #[serde(default)]
    pub target_title: String,
}

// Handlers

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let catalog = state.session.catalog();
    Json(HealthResponse {
        status: "healthy",
        catalog_size: catalog.len(),
        catalog_loaded_at: catalog.loaded_at(),
    })
}

/// Autocomplete suggestions for the search box
pub async fn suggestions(
    State(state): State<AppState>,
    Query(params): Query<SuggestionQuery>,
) -> Json<Vec<Movie>> {
    Json(state.session.suggestions(&params.q).await)
}

/// List rated movies in the order they were added
pub async fn list_ratings(State(state): State<AppState>) -> Json<Vec<RatedMovieResponse>> {
    let rated = state.session.rated_movies().await;
    Json(rated.into_iter().map(RatedMovieResponse::from).collect())
}

/// Rate a movie by title
pub async fn add_rating(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    ApiJson(request): ApiJson<AddRatingRequest>,
) -> AppResult<(StatusCode, Json<RatedMovieResponse>)> {
    tracing::debug!(request_id = %request_id, title = %request.title, "Adding rating");

    let rated = state
        .session
        .add_rating(&request.title, request.rating)
        .await?;

    Ok((StatusCode::CREATED, Json(rated.into())))
}

/// Remove a rating; removing an unrated movie is not an error
pub async fn remove_rating(
    State(state): State<AppState>,
    Path(movie_id): Path<String>,
) -> StatusCode {
    state.session.remove_rating(&MovieId::from(movie_id)).await;
    StatusCode::NO_CONTENT
}

/// Predict the rating of a target movie from the current ratings
pub async fn predict(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    ApiJson(request): ApiJson<PredictRequestBody>,
) -> AppResult<Json<Prediction>> {
    tracing::info!(
        request_id = %request_id,
        target_title = %request.target_title,
        "Processing prediction request"
    );

    let prediction = state.session.predict(&request.target_title).await?;

    Ok(Json(prediction))
}

/// Cancel the pending prediction, if any
pub async fn cancel_prediction(State(state): State<AppState>) -> StatusCode {
    state.session.cancel_prediction();
    StatusCode::NO_CONTENT
}
