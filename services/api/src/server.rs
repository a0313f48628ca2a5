use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_poll_routes;
use axum::{Extension, Router};
use axum_prometheus::PrometheusMetricLayer;
use polls::config::{AppConfig, PollsConfig};
use polls::error::AppError;
use polls::resources::PollService;
use polls::store::InMemoryPollStore;
use polls::telemetry;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;
    args.apply(&mut config.server);
    telemetry::init(&config.telemetry)?;

    let (metrics_layer, metrics) = PrometheusMetricLayer::pair();
    let state = AppState::starting(metrics);
    let app = poll_app(&config.polls, state.clone()).layer(metrics_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    state.mark_ready();
    info!(
        ?config.environment,
        %addr,
        latest_limit = config.polls.latest_limit,
        "accepting poll traffic"
    );

    axum::serve(listener, app).await?;
    Ok(())
}

/// Poll endpoints and probes over a fresh in-memory store.
pub(crate) fn poll_app(polls: &PollsConfig, state: AppState) -> Router {
    let service = PollService::new(Arc::new(InMemoryPollStore::new()), polls);
    with_poll_routes(Arc::new(service)).layer(Extension(state))
}
