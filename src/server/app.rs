use std::any::Any;

use axum::body::Body;
use axum::http::{header, HeaderName, HeaderValue, Method};
use axum::response::{IntoResponse, Response};
use axum::{extract::FromRef, http::StatusCode, routing::get, Router};
use prometheus::{Encoder, TextEncoder};
use routes::{category_router, questions_router, quizzes_router};
use sqlx::SqlitePool;
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any as AnyOrigin, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use super::error::ApiError;
use super::routes;
use crate::settings::Settings;

const ALLOWED_HEADERS: &str = "Content-Type,Authorization,true";
const ALLOWED_METHODS: &str = "GET,PUT,POST,DELETE,OPTIONS";

#[derive(FromRef, Clone)]
pub struct AppState {
    pool: SqlitePool,
}

pub async fn run_server(pool: SqlitePool, settings: &Settings) -> anyhow::Result<()> {
    let addr = settings.socket_addr();
    let listener = TcpListener::bind(&addr).await?;

    tracing::info!("Serving on {addr}");
    axum::serve(listener, app(pool)).await?;
    Ok(())
}

pub fn app(pool: SqlitePool) -> Router {
    let state = AppState { pool };

    let router = Router::new()
        .route("/metrics", get(metrics))
        .merge(category_router(state.clone()))
        .merge(questions_router(state.clone()))
        .merge(quizzes_router(state))
        .method_not_allowed_fallback(|| async { ApiError::MethodNotAllowed })
        .fallback(|| async {
            tracing::info!("Fallback");
            ApiError::NotFound
        });
    with_layers(router)
}

// cors wraps the panic layer, 500s carry the CORS headers as well
fn with_layers(router: Router) -> Router {
    router
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOWED_HEADERS),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOWED_METHODS),
        ))
        .layer(cors())
        .layer(TraceLayer::new_for_http())
}

fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("true"),
        ])
        .allow_methods([
            Method::GET,
            Method::PUT,
            Method::POST,
            Method::DELETE,
            Method::OPTIONS,
        ])
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let details = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!("Handler panicked: {details}");
    ApiError::Internal.into_response()
}

async fn metrics() -> Result<Response, ApiError> {
    let encoder = TextEncoder::new();
    let metrics = prometheus::gather();
    let mut buf = vec![];
    encoder.encode(&metrics, &mut buf).map_err(|e| {
        tracing::error!("Unable to encode metrics: {e}");
        ApiError::Internal
    })?;
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, encoder.format_type())
        .body(Body::from(buf))
        .map_err(|_| ApiError::Internal)
}
