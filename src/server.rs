//! HTTP adapter for the sink plugin
//!
//! Translates HTTP requests into decoder and dispatcher calls and maps the
//! outcome back onto status codes:
//!
//! - `GET /ping`: liveness probe
//! - `POST /sink_sync`: decode the envelope and dispatch it
//! - `GET /operations`: list the registered operations
//!
//! A malformed envelope or an unknown operation is answered with 400. Once a
//! known operation is dispatched the answer is always 200, even when the
//! handler fails to decode its payload; that failure is only logged.

use crate::core::{PluginConfig, PluginError, PluginResult};
use crate::dispatcher::{DispatchResult, Dispatcher};
use crate::protocol;
use crate::tracing_context::{CorrelationId, TracingContext};
use axum::{
    Json, Router,
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Header a caller may use to supply its own correlation ID
pub const CORRELATION_HEADER: &str = "x-correlation-id";

/// JSON body of every `/ping` and `/sink_sync` response
#[derive(Debug, Serialize)]
pub struct ApiResponse {
    pub code: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,
}

impl ApiResponse {
    fn ok<S: Into<String>>(message: S) -> (StatusCode, Json<Self>) {
        (
            StatusCode::OK,
            Json(Self {
                code: StatusCode::OK.as_u16(),
                message: message.into(),
                cause: None,
            }),
        )
    }

    fn bad_request<S: Into<String>>(
        message: S,
        cause: Option<String>,
    ) -> (StatusCode, Json<Self>) {
        (
            StatusCode::BAD_REQUEST,
            Json(Self {
                code: StatusCode::BAD_REQUEST.as_u16(),
                message: message.into(),
                cause,
            }),
        )
    }
}

#[derive(Debug, Serialize)]
pub struct OperationsResponse {
    pub code: u16,
    pub operations: Vec<&'static str>,
}

/// Shared server state
#[derive(Clone)]
pub struct AppState {
    dispatcher: Arc<Dispatcher>,
}

impl AppState {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher }
    }
}

/// Build the plugin router
pub fn router(state: AppState, request_timeout: Duration) -> Router {
    let routes = Router::new()
        .route("/ping", get(ping))
        .route("/sink_sync", post(sink_sync))
        .route("/operations", get(list_operations));

    with_layers(routes, request_timeout).with_state(state)
}

/// Middleware shared by every route
///
/// Row batches routinely exceed axum's 2 MB default, so the body size limit
/// is lifted; the original gin endpoint had none either.
fn with_layers<S>(routes: Router<S>, request_timeout: Duration) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    routes
        .layer(DefaultBodyLimit::disable())
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(request_timeout))
}

/// Bind the configured address and serve until a shutdown signal arrives
pub async fn serve(config: &PluginConfig, dispatcher: Arc<Dispatcher>) -> PluginResult<()> {
    let addr = config.listen_addr()?;
    let app = router(AppState::new(dispatcher), config.request_timeout());

    let listener = TcpListener::bind(addr).await?;
    info!(addr = %addr, "Sink plugin listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| PluginError::server_with_source("HTTP server terminated", e))?;

    info!("Sink plugin stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl-C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}

// API Handlers

async fn ping() -> (StatusCode, Json<ApiResponse>) {
    ApiResponse::ok("pong")
}

async fn list_operations(State(state): State<AppState>) -> Json<OperationsResponse> {
    Json(OperationsResponse {
        code: StatusCode::OK.as_u16(),
        operations: state
            .dispatcher
            .registry()
            .operations()
            .iter()
            .map(|op| op.as_str())
            .collect(),
    })
}

/// Request context keyed by the caller's `x-correlation-id`, or a fresh UUID
/// when the header is absent or blank
fn correlation_context(headers: &HeaderMap) -> TracingContext {
    let correlation_id = headers
        .get(CORRELATION_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(|v| CorrelationId::from_string(v.to_string()))
        .unwrap_or_else(CorrelationId::new_uuid);

    TracingContext::with_correlation_id(correlation_id)
}

async fn sink_sync(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, Json<ApiResponse>) {
    let context = correlation_context(&headers);

    let envelope = match protocol::decode(&body) {
        Ok(envelope) => envelope,
        Err(e) => {
            context.with_span(|| warn!("malformed envelope: {}", e));
            return ApiResponse::bad_request(e.to_string(), None);
        }
    };

    let result = state
        .dispatcher
        .dispatch_in(&context, &envelope.operation, envelope.payload());

    match result {
        DispatchResult::UnsupportedOperation(name) => ApiResponse::bad_request(
            "unsupport operation",
            Some(format!("We haven't support operation {}", name)),
        ),
        // Handler failures were logged by the dispatcher and are not surfaced
        DispatchResult::Ok(operation) | DispatchResult::HandlerError { operation, .. } => {
            ApiResponse::ok(format!("{} ok", operation))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event_sink::{MemorySink, SinkEvent};
    use axum::body::Body;
    use axum::http::{HeaderValue, Request};
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::util::ServiceExt;

    fn create_test_app() -> (Router, Arc<MemorySink>) {
        let sink = Arc::new(MemorySink::new());
        let dispatcher = Arc::new(Dispatcher::with_sink(sink.clone()));
        (
            router(AppState::new(dispatcher), Duration::from_secs(5)),
            sink,
        )
    }

    async fn post_sink_sync(app: Router, body: impl Into<Body>) -> (StatusCode, Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/sink_sync")
                    .header("content-type", "application/json")
                    .body(body.into())
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_ping() {
        let (app, _) = create_test_app();

        let response = app
            .oneshot(Request::builder().uri("/ping").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, json!({"code": 200, "message": "pong"}));
    }

    #[tokio::test]
    async fn test_add_table_round_trip() {
        let (app, sink) = create_test_app();

        let (status, body) = post_sink_sync(
            app,
            r#"{"operation":"sink_add_table","data":{"table_id":42}}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"code": 200, "message": "sink_add_table ok"}));
        assert_eq!(sink.events(), vec![SinkEvent::TableAdded { table_id: 42 }]);
    }

    #[tokio::test]
    async fn test_add_table_twice_gives_two_responses() {
        let (app, sink) = create_test_app();
        let body = r#"{"operation":"sink_add_table","data":{"table_id":42}}"#;

        let (first, _) = post_sink_sync(app.clone(), body).await;
        let (second, _) = post_sink_sync(app, body).await;

        assert_eq!(first, StatusCode::OK);
        assert_eq!(second, StatusCode::OK);
        assert_eq!(sink.len(), 2);
    }

    #[tokio::test]
    async fn test_unknown_operation() {
        let (app, sink) = create_test_app();

        let (status, body) =
            post_sink_sync(app, r#"{"operation":"bogus_op","data":{}}"#).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({
                "code": 400,
                "message": "unsupport operation",
                "cause": "We haven't support operation bogus_op"
            })
        );
        assert!(sink.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_body_never_reaches_handlers() {
        let bodies = [
            "",
            "{",
            "[]",
            r#"{"data":{"table_id":1}}"#,
            r#"{"operation":null,"data":{}}"#,
        ];

        for raw in bodies {
            let (app, sink) = create_test_app();
            let (status, body) = post_sink_sync(app, raw).await;

            assert_eq!(status, StatusCode::BAD_REQUEST, "body {:?}", raw);
            assert_eq!(body["code"], json!(400));
            assert!(body["message"].as_str().is_some_and(|m| !m.is_empty()));
            assert!(body.get("cause").is_none());
            assert!(sink.is_empty());
        }
    }

    #[tokio::test]
    async fn test_ddl_decode_failure_still_answers_ok() {
        let (app, sink) = create_test_app();

        let (status, body) =
            post_sink_sync(app, r#"{"operation":"sink_emit_ddl_event","data":{}}"#).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], json!("sink_emit_ddl_event ok"));
        assert!(sink.is_empty());
    }

    #[tokio::test]
    async fn test_missing_data_still_answers_ok() {
        let (app, sink) = create_test_app();

        let (status, body) = post_sink_sync(app, r#"{"operation":"sink_remove_table"}"#).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], json!("sink_remove_table ok"));
        assert!(sink.is_empty());
    }

    #[tokio::test]
    async fn test_row_changed_events_column_count() {
        let (app, sink) = create_test_app();
        let envelope = json!({
            "operation": "sink_emit_row_changed_events",
            "data": [
                {"commit-ts": 1, "columns": [{"value": "a"}, {"value": "b"}]},
                {"commit-ts": 2, "columns": [{"value": "c"}]},
                {"commit-ts": 3, "columns": [{"value": "d"}, {"value": "e"}, {"value": "f"}]}
            ]
        });

        let (status, body) = post_sink_sync(app, envelope.to_string()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], json!("sink_emit_row_changed_events ok"));

        let values: Vec<Value> = sink
            .events()
            .into_iter()
            .filter_map(|e| match e {
                SinkEvent::ColumnValue { value, .. } => Some(value),
                _ => None,
            })
            .collect();
        assert_eq!(
            values,
            vec![json!("a"), json!("b"), json!("c"), json!("d"), json!("e"), json!("f")]
        );
    }

    #[tokio::test]
    async fn test_list_operations() {
        let (app, _) = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/operations")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            body["operations"],
            json!([
                "sink_add_table",
                "sink_remove_table",
                "sink_emit_row_changed_events",
                "sink_emit_ddl_event"
            ])
        );
    }

    #[tokio::test]
    async fn test_row_batch_larger_than_two_megabytes() {
        let (app, sink) = create_test_app();
        let rows: Vec<Value> = (0..25_000)
            .map(|i| {
                json!({
                    "commit-ts": i,
                    "table": {"db-name": "shop", "tbl-name": "orders"},
                    "columns": [
                        {"name": "id", "value": i},
                        {"name": "note", "value": "a fairly long column value to pad the row"}
                    ]
                })
            })
            .collect();
        let envelope = json!({"operation": "sink_emit_row_changed_events", "data": rows});
        let raw = envelope.to_string();
        assert!(raw.len() > 2 * 1024 * 1024);

        let (status, body) = post_sink_sync(app, raw).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], json!("sink_emit_row_changed_events ok"));
        assert_eq!(sink.len(), 25_000 * 3);
    }

    #[test]
    fn test_correlation_header_is_used() {
        let mut headers = HeaderMap::new();
        headers.insert(CORRELATION_HEADER, HeaderValue::from_static("req-7f3a"));

        let context = correlation_context(&headers);
        assert_eq!(context.correlation_id.as_str(), "req-7f3a");
    }

    #[test]
    fn test_blank_or_missing_correlation_header_generates_id() {
        let mut blank = HeaderMap::new();
        blank.insert(CORRELATION_HEADER, HeaderValue::from_static("   "));

        for headers in [HeaderMap::new(), blank] {
            let id = correlation_context(&headers).correlation_id;
            assert!(!id.as_str().trim().is_empty());
            assert_eq!(id.as_str().len(), 36);
        }
    }

    #[tokio::test]
    async fn test_sink_sync_with_correlation_header() {
        let (app, sink) = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/sink_sync")
                    .header(CORRELATION_HEADER, "changefeed-1-req-9")
                    .body(Body::from(
                        r#"{"operation":"sink_remove_table","data":{"table_id":9}}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(sink.events(), vec![SinkEvent::TableRemoved { table_id: 9 }]);
    }

    #[tokio::test]
    async fn test_slow_request_times_out() {
        let routes: Router = Router::new().route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                "done"
            }),
        );
        let app = with_layers(routes, Duration::from_millis(20));

        let response = app
            .oneshot(Request::builder().uri("/slow").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
    }

    #[tokio::test]
    async fn test_serve_reports_address_in_use() {
        let taken = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let config = PluginConfig {
            host: "127.0.0.1".to_string(),
            port: taken.local_addr().unwrap().port(),
            ..PluginConfig::default()
        };
        let dispatcher = Arc::new(Dispatcher::with_sink(Arc::new(MemorySink::new())));

        let err = serve(&config, dispatcher).await.unwrap_err();

        assert!(matches!(err, PluginError::NetworkIO(_)));
    }

    #[tokio::test]
    async fn test_ping_rejects_post() {
        let (app, _) = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/ping")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
