use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use movie_rater::{
    api::{create_router, AppState},
    config::Config,
    services::{providers::HttpBackend, Catalog, Session},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("movie_rater=info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let backend = Arc::new(HttpBackend::new(
        config.predictor_url.clone(),
        config.request_timeout(),
    )?);

    // Without a catalog nothing can be matched, so refuse to start
    let catalog = Catalog::initialize(backend.as_ref()).await?;

    let session = Session::from_config(catalog, backend, &config);
    let app = create_router(AppState::new(session));

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    tracing::info!(
        address = %config.bind_address(),
        predictor = %config.predictor_url,
        "Server running"
    );
    axum::serve(listener, app).await?;

    Ok(())
}
