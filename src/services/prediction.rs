use chrono::Utc;
use std::{sync::Arc, time::Duration, time::Instant};
use tokio::sync::{Notify, Semaphore};

use crate::{
    error::{AppError, AppResult},
    models::{Movie, PredictRequest, Prediction, RatedEntry},
    services::providers::RatingPredictor,
};

pub const DEFAULT_MIN_RATINGS: usize = 3;

/// Sends ledger snapshots to the remote predictor
///
/// At most one request is outstanding at a time. Each request is bounded by
/// `timeout` and can be aborted with [`PredictionClient::cancel`].
pub struct PredictionClient {
    predictor: Arc<dyn RatingPredictor>,
    min_ratings: usize,
    timeout: Duration,
    in_flight: Semaphore,
    cancel: Notify,
}

impl PredictionClient {
    pub fn new(predictor: Arc<dyn RatingPredictor>, min_ratings: usize, timeout: Duration) -> Self {
        Self {
            predictor,
            min_ratings,
            timeout,
            in_flight: Semaphore::new(1),
            cancel: Notify::new(),
        }
    }

    /// Checks the business rules a prediction must satisfy before going out
    pub fn validate(&self, entries: &[RatedEntry], target: &Movie) -> AppResult<()> {
        if entries.len() < self.min_ratings {
            return Err(AppError::InsufficientRatings {
                have: entries.len(),
                need: self.min_ratings,
            });
        }

        if entries.iter().any(|e| e.movie_id == target.movie_id) {
            return Err(AppError::DuplicateEntry(target.movie_id.clone()));
        }

        Ok(())
    }

    /// Predicts the user's rating for `target`
    ///
    /// Fails with `PredictionInFlight` if another prediction has not settled.
    pub async fn predict(&self, entries: Vec<RatedEntry>, target: &Movie) -> AppResult<Prediction> {
        self.validate(&entries, target)?;

        // Registered before the slot is taken so a cancel seen through
        // `is_busy` always reaches this request
        let cancelled = self.cancel.notified();
        tokio::pin!(cancelled);
        cancelled.as_mut().enable();

        let _permit = self
            .in_flight
            .try_acquire()
            .map_err(|_| AppError::PredictionInFlight)?;

        let rated_count = entries.len();
        let request = PredictRequest {
            rated_movies: entries,
            target_movie_id: target.movie_id.clone(),
        };

        tracing::info!(
            target_movie_id = %target.movie_id,
            rated_count,
            predictor = self.predictor.name(),
            "Requesting prediction"
        );

        let start = Instant::now();

        let outcome = tokio::select! {
            result = tokio::time::timeout(self.timeout, self.predictor.predict(&request)) => {
                result.unwrap_or(Err(AppError::NetworkTimeout))
            }
            _ = &mut cancelled => Err(AppError::PredictionCancelled),
        };

        let elapsed_ms = start.elapsed().as_millis() as u64;

        match outcome {
            Ok(predicted_rating) => {
                tracing::info!(
                    target_movie_id = %target.movie_id,
                    predicted_rating,
                    elapsed_ms,
                    "Prediction completed"
                );

                Ok(Prediction {
                    movie: target.clone(),
                    predicted_rating,
                    rated_count,
                    predicted_at: Utc::now(),
                })
            }
            Err(e) => {
                tracing::warn!(
                    target_movie_id = %target.movie_id,
                    error = %e,
                    elapsed_ms,
                    "Prediction failed"
                );
                Err(e)
            }
        }
    }

    /// Aborts the pending prediction, if any
    pub fn cancel(&self) {
        self.cancel.notify_waiters();
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.available_permits() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MovieId, Rating};
    use crate::services::providers::MockRatingPredictor;

    fn movie(id: &str) -> Movie {
        Movie {
            movie_id: MovieId::from(id),
            title: format!("Movie {}", id),
            genres: None,
        }
    }

    fn entries(ids: &[&str]) -> Vec<RatedEntry> {
        ids.iter()
            .map(|id| RatedEntry {
                movie_id: MovieId::from(*id),
                rating: Rating::new(4.0).unwrap(),
            })
            .collect()
    }

    fn client(predictor: MockRatingPredictor) -> PredictionClient {
        PredictionClient::new(
            Arc::new(predictor),
            DEFAULT_MIN_RATINGS,
            Duration::from_secs(5),
        )
    }

    /// Predictor that waits far longer than any test timeout
    struct StallingPredictor;

    #[async_trait::async_trait]
    impl RatingPredictor for StallingPredictor {
        async fn predict(&self, _request: &PredictRequest) -> AppResult<f64> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(3.0)
        }

        fn name(&self) -> &'static str {
            "stalling"
        }
    }

    #[tokio::test]
    async fn test_insufficient_ratings_skips_network() {
        let mut predictor = MockRatingPredictor::new();
        predictor.expect_predict().times(0);
        predictor.expect_name().return_const("mock");

        let result = client(predictor)
            .predict(entries(&["1", "2"]), &movie("9"))
            .await;

        assert!(matches!(
            result,
            Err(AppError::InsufficientRatings { have: 2, need: 3 })
        ));
    }

    #[tokio::test]
    async fn test_target_already_rated_skips_network() {
        let mut predictor = MockRatingPredictor::new();
        predictor.expect_predict().times(0);
        predictor.expect_name().return_const("mock");

        let result = client(predictor)
            .predict(entries(&["1", "2", "3"]), &movie("2"))
            .await;

        assert!(matches!(result, Err(AppError::DuplicateEntry(id)) if id.as_str() == "2"));
    }

    #[tokio::test]
    async fn test_successful_prediction_sends_ledger_and_target() {
        let mut predictor = MockRatingPredictor::new();
        predictor
            .expect_predict()
            .withf(|req| {
                req.target_movie_id.as_str() == "9"
                    && req
                        .rated_movies
                        .iter()
                        .map(|e| e.movie_id.as_str())
                        .eq(["1", "2", "3"])
            })
            .times(1)
            .returning(|_| Ok(3.75));
        predictor.expect_name().return_const("mock");

        let prediction = client(predictor)
            .predict(entries(&["1", "2", "3"]), &movie("9"))
            .await
            .unwrap();

        assert_eq!(prediction.predicted_rating, 3.75);
        assert_eq!(prediction.rated_count, 3);
        assert_eq!(prediction.movie.movie_id, MovieId::from("9"));
    }

    #[tokio::test]
    async fn test_remote_error_is_relayed() {
        let mut predictor = MockRatingPredictor::new();
        predictor
            .expect_predict()
            .returning(|_| Err(AppError::RemoteError("model unavailable".to_string())));
        predictor.expect_name().return_const("mock");

        let result = client(predictor)
            .predict(entries(&["1", "2", "3"]), &movie("9"))
            .await;

        assert!(matches!(result, Err(AppError::RemoteError(msg)) if msg == "model unavailable"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout() {
        let client = PredictionClient::new(
            Arc::new(StallingPredictor),
            DEFAULT_MIN_RATINGS,
            Duration::from_secs(2),
        );

        let result = client.predict(entries(&["1", "2", "3"]), &movie("9")).await;
        assert!(matches!(result, Err(AppError::NetworkTimeout)));
        assert!(!client.is_busy());
    }

    #[tokio::test(start_paused = true)]
    async fn test_overlapping_prediction_rejected() {
        let client = Arc::new(PredictionClient::new(
            Arc::new(StallingPredictor),
            DEFAULT_MIN_RATINGS,
            Duration::from_secs(60),
        ));

        let first = {
            let client = client.clone();
            tokio::spawn(async move {
                let target = movie("9");
                client.predict(entries(&["1", "2", "3"]), &target).await
            })
        };

        // Let the first request take the in-flight slot
        tokio::task::yield_now().await;
        assert!(client.is_busy());

        let second = client.predict(entries(&["1", "2", "3"]), &movie("8")).await;
        assert!(matches!(second, Err(AppError::PredictionInFlight)));

        client.cancel();
        let first = first.await.unwrap();
        assert!(matches!(first, Err(AppError::PredictionCancelled)));
        assert!(!client.is_busy());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_cancel_right_after_slot_taken() {
        let client = Arc::new(PredictionClient::new(
            Arc::new(StallingPredictor),
            DEFAULT_MIN_RATINGS,
            Duration::from_secs(3600),
        ));

        let pending = {
            let client = client.clone();
            tokio::spawn(async move {
                let target = movie("9");
                client.predict(entries(&["1", "2", "3"]), &target).await
            })
        };

        // Cancel the moment the slot is visibly taken, racing the request
        // on the other worker
        while !client.is_busy() {
            std::hint::spin_loop();
        }
        client.cancel();

        let result = tokio::time::timeout(Duration::from_secs(5), pending)
            .await
            .expect("cancel was lost")
            .unwrap();
        assert!(matches!(result, Err(AppError::PredictionCancelled)));
        assert!(!client.is_busy());
    }

    #[tokio::test]
    async fn test_cancel_without_pending_is_noop() {
        let mut predictor = MockRatingPredictor::new();
        predictor.expect_predict().returning(|_| Ok(4.0));
        predictor.expect_name().return_const("mock");
        let client = client(predictor);

        client.cancel();

        // A cancel issued before the request must not abort it
        let prediction = client
            .predict(entries(&["1", "2", "3"]), &movie("9"))
            .await
            .unwrap();
        assert_eq!(prediction.predicted_rating, 4.0);
    }
}
