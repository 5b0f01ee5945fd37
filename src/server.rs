use anyhow::Result;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::{net::SocketAddr, sync::Arc};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::{
    config::Config,
    handlers::{self, AppState},
    metrics,
    pricing::CostCalculator,
    roi::RoiAnalyzer,
    signals::shutdown_signal,
};

/// Build the analyzer (and its calculator) from the loaded tables
pub fn build_state(config: &Config) -> AppState {
    let calculator = CostCalculator::new(Arc::new(config.pricing.clone()));
    AppState::new(RoiAnalyzer::new(calculator, Arc::new(config.roi.clone())))
}

/// Start the calculator API server
///
/// This function:
/// 1. Initializes metrics
/// 2. Builds the shared, immutable calculation state
/// 3. Binds to the configured address
/// 4. Serves requests until SIGINT/SIGTERM, then drains connections
pub async fn start_server(config: Config) -> Result<()> {
    info!("Initializing Prometheus metrics...");
    let metrics_handle = Arc::new(metrics::init_metrics()?);

    let app = create_router(build_state(&config), metrics_handle);

    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    info!("Starting agent cost calculator on {}", addr);
    info!(
        "Configuration: {} models, {} frameworks, discount rate {:.1}%",
        config.pricing.models.len(),
        config.pricing.frameworks.len(),
        config.roi.discount_rate * 100.0
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            shutdown_signal().await;
            info!("Shutdown signal received, draining connections...");
        })
        .await?;

    info!("Server stopped gracefully");

    Ok(())
}

/// Create the Axum router with all routes and middleware
pub fn create_router(state: AppState, metrics_handle: Arc<PrometheusHandle>) -> Router {
    let api_routes = Router::new()
        .route(
            "/api/calculate",
            post(handlers::calculate::calculate).get(handlers::calculate::calculate_query),
        )
        .route(
            "/api/compare",
            post(handlers::calculate::compare).get(handlers::calculate::compare_query),
        )
        .route(
            "/api/migration",
            post(handlers::migration::migration).get(handlers::migration::migration_query),
        )
        .route(
            "/api/migration/sensitivity",
            post(handlers::migration::sensitivity),
        )
        .route(
            "/api/savings",
            post(handlers::migration::savings).get(handlers::migration::savings_query),
        )
        .route("/api/models", get(handlers::catalog::list_models))
        .route("/api/frameworks", get(handlers::catalog::list_frameworks))
        .route("/api/scenarios", get(handlers::scenarios::list_scenarios))
        .route("/api/scenarios/:key", get(handlers::scenarios::get_scenario))
        .with_state(state);

    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/metrics", get(handlers::metrics_handler::metrics))
        .with_state(metrics_handle)
        .merge(api_routes)
        // Request bodies are small JSON documents
        .layer(DefaultBodyLimit::max(64 * 1024))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, http::StatusCode};
    use metrics_exporter_prometheus::PrometheusBuilder;
    use tower::ServiceExt;

    fn test_router() -> Router {
        let recorder = PrometheusBuilder::new().build_recorder();
        create_router(build_state(&Config::default()), Arc::new(recorder.handle()))
    }

    #[tokio::test]
    async fn test_create_router_health() {
        let response = test_router()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let response = test_router()
            .oneshot(Request::get("/api/unknown").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_build_state_uses_configured_tables() {
        let mut config = Config::default();
        config.roi.discount_rate = 0.05;

        let state = build_state(&config);
        assert_eq!(state.analyzer.assumptions().discount_rate, 0.05);
        assert_eq!(state.calculator().tables(), &config.pricing);
    }
}
