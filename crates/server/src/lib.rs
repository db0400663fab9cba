//! HTTP API for the Anna Seva food map.
//!
//! All routes live under `/api/food-waste`:
//!
//! | Route | Response |
//! |---|---|
//! | `GET /test` | liveness probe `{message, timestamp}` |
//! | `GET /surplus?lat&lng` | generated surplus sites |
//! | `GET /shortages?lat&lng` | generated shortage sites |
//! | `GET /nearby?lat&lng&radius&threshold&limit&q` | every provider, merged and ranked by distance |
//! | `GET /stats?lat&lng` | dashboard figures |
//! | `GET /metrics` | request counters and latency histograms |
//!
//! Malformed query parameters never produce an error: coordinates fall back
//! to the configured default center, distances to the configured defaults.

use std::{future::Future, sync::Arc, time::Duration};

use annaseva_core::config::ConfigSchema;
use axum::{
    Router,
    http::{Method, header::CONTENT_TYPE},
    routing::get,
};
use tokio::{net::TcpListener, signal};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info};

pub mod error;
pub mod routes;
pub mod state;

pub use error::ServerError;
pub use state::AppState;

use routes::{
    fallback_handler, metrics_handler, nearby_handler, shortages_handler, stats_handler,
    surplus_handler, test_handler,
};

/// Path prefix of every route.
pub const API_PREFIX: &str = "/api/food-waste";

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    let api = Router::new()
        .route("/test", get(test_handler))
        .route("/surplus", get(surplus_handler))
        .route("/shortages", get(shortages_handler))
        .route("/nearby", get(nearby_handler))
        .route("/stats", get(stats_handler))
        .route("/metrics", get(metrics_handler));

    Router::new()
        .nest(API_PREFIX, api)
        .fallback(fallback_handler)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind the configured address and serve until Ctrl+C or SIGTERM.
pub async fn start_server(config: ConfigSchema) -> Result<(), ServerError> {
    let address = format!("{}:{}", config.server.host, config.server.port);

    info!("Initializing state...");
    let state = AppState::new(config)?;

    info!("Binding to {address}");
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| ServerError::Bind {
            address: address.clone(),
            source,
        })?;

    serve(listener, state, shutdown_signal()).await
}

/// Serve on an already bound listener until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, state: Arc<AppState>, shutdown: F) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(address) = listener.local_addr() {
        info!("Server running on {address}");
    }

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(ServerError::Serve)?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!(error = %e, "Failed to install Ctrl+C handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use annaseva_geo::{Coordinate, Located, haversine_distance};
    use annaseva_poi::PointOfInterest;
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    fn app() -> Router {
        router(AppState::seeded(ConfigSchema::default(), 42).unwrap())
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn center_of(value: &Value) -> Coordinate {
        let poi: PointOfInterest = serde_json::from_value(value.clone()).unwrap();
        poi.coordinate().unwrap()
    }

    #[tokio::test]
    async fn test_liveness() {
        let (status, body) = get_json(app(), "/api/food-waste/test").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "API is working!");
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_surplus_default_center() {
        let (status, body) = get_json(app(), "/api/food-waste/surplus").await;
        assert_eq!(status, StatusCode::OK);

        let records = body.as_array().unwrap();
        assert_eq!(records.len(), 3);
        for record in records {
            assert_eq!(record["type"], "surplus");
            let c = center_of(record);
            assert!((c.latitude - 28.6139).abs() <= 0.01 + 1e-9);
            assert!((c.longitude - 77.2090).abs() <= 0.01 + 1e-9);
        }
    }

    #[tokio::test]
    async fn test_shortages_around_given_center() {
        let (status, body) =
            get_json(app(), "/api/food-waste/shortages?lat=19.0760&lng=72.8777").await;
        assert_eq!(status, StatusCode::OK);

        let records = body.as_array().unwrap();
        assert_eq!(records.len(), 2);
        for record in records {
            assert_eq!(record["type"], "shortage");
            assert!(record["severity"].is_string());
            let c = center_of(record);
            assert!((c.latitude - 19.076).abs() <= 0.015 + 1e-9);
        }
    }

    #[tokio::test]
    async fn test_malformed_center_falls_back() {
        let (status, body) = get_json(app(), "/api/food-waste/surplus?lat=abc&lng=72.8").await;
        assert_eq!(status, StatusCode::OK);

        for record in body.as_array().unwrap() {
            let c = center_of(record);
            assert!((c.latitude - 28.6139).abs() <= 0.01 + 1e-9);
        }
    }

    #[tokio::test]
    async fn test_nearby_is_ranked_within_radius() {
        let (status, body) =
            get_json(app(), "/api/food-waste/nearby?radius=3&threshold=0.1").await;
        assert_eq!(status, StatusCode::OK);

        let center = Coordinate::new(28.6139, 77.2090);
        let records = body.as_array().unwrap();
        assert!(records.len() <= 7);

        let mut previous = 0.0;
        for record in records {
            let distance = record["distanceKm"].as_f64().unwrap();
            assert!(distance <= 3.0);
            assert!(distance >= previous);
            previous = distance;

            let c = center_of(record);
            assert!((haversine_distance(&center, &c) - distance).abs() < 1e-9);
        }

        for (i, a) in records.iter().enumerate() {
            for b in &records[i + 1..] {
                assert!(haversine_distance(&center_of(a), &center_of(b)) >= 0.1);
            }
        }
    }

    #[tokio::test]
    async fn test_nearby_limit_and_bad_radius() {
        let (status, body) =
            get_json(app(), "/api/food-waste/nearby?radius=-5&limit=1").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.as_array().unwrap().len() <= 1);
    }

    #[tokio::test]
    async fn test_stats_shape() {
        let (status, body) = get_json(app(), "/api/food-waste/stats").await;
        assert_eq!(status, StatusCode::OK);

        let surplus = body["totalSurplus"].as_u64().unwrap();
        assert!((100..=1099).contains(&surplus));
        assert!(body["peopleAffected"].is_u64());
    }

    #[tokio::test]
    async fn test_metrics_count_requests() {
        let state = AppState::seeded(ConfigSchema::default(), 1).unwrap();

        for _ in 0..2 {
            router(state.clone())
                .oneshot(
                    Request::builder()
                        .uri("/api/food-waste/surplus")
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();
        }

        let (_, body) = get_json(router(state), "/api/food-waste/metrics").await;
        assert_eq!(body["counters"]["http.requests.surplus"], 2);
        assert_eq!(body["histograms"]["http.latency_ms.surplus"]["count"], 2);
    }

    #[tokio::test]
    async fn test_stats_and_metrics_are_instrumented() {
        let state = AppState::seeded(ConfigSchema::default(), 2).unwrap();

        get_json(router(state.clone()), "/api/food-waste/stats").await;
        let (_, body) = get_json(router(state), "/api/food-waste/metrics").await;

        assert_eq!(body["counters"]["http.requests.stats"], 1);
        assert_eq!(body["histograms"]["http.latency_ms.stats"]["count"], 1);
        assert_eq!(body["counters"]["http.requests.metrics"], 1);
    }

    #[tokio::test]
    async fn test_seeded_nearby_is_stable() {
        let state = AppState::seeded(ConfigSchema::default(), 4).unwrap();
        let uri = "/api/food-waste/nearby?radius=5";

        let placed = |body: Value| -> Vec<(Value, Value, Value)> {
            body.as_array()
                .unwrap()
                .iter()
                .map(|r| (r["id"].clone(), r["lat"].clone(), r["lng"].clone()))
                .collect()
        };
        let (_, first) = get_json(router(state.clone()), uri).await;
        let (_, second) = get_json(router(state), uri).await;

        assert!(!first.as_array().unwrap().is_empty());
        assert_eq!(placed(first), placed(second));
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let (status, body) = get_json(app(), "/api/food-waste/unknown").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["status"], 404);
    }

    #[tokio::test]
    async fn test_cors_header() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/api/food-waste/test")
                    .header("origin", "http://localhost:5173")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.headers().get("access-control-allow-origin").unwrap(),
            "*"
        );
    }

    #[tokio::test]
    async fn test_serve_shuts_down() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let state = AppState::seeded(ConfigSchema::default(), 3).unwrap();

        serve(listener, state, async {}).await.unwrap();
    }
}
