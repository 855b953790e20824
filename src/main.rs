mod api;
mod db;
mod error;
mod models;
mod payload;
mod schema;
mod store;
mod uploads;

use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::MatchedPath;
use axum::http::Request;
use axum::routing::get;
use axum::Router;
use diesel::r2d2::{ConnectionManager, PooledConnection};
use diesel::PgConnection;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::Span;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use utoipa_swagger_ui::SwaggerUi;

use crate::error::ApiError;

/// Application state shared across all handlers
pub type AppState = Arc<ServiceContext>;

pub struct ServiceContext {
    pub pool: db::DbPool,
    pub db_state: DbState,
    pub upload_dir: PathBuf,
}

impl ServiceContext {
    /// Boundary check: handlers may not touch storage unless the schema is
    /// ready.
    pub fn ensure_ready(&self) -> Result<(), ApiError> {
        match self.db_state {
            DbState::Ready => Ok(()),
            DbState::Initializing | DbState::Failed => Err(ApiError::Unavailable),
        }
    }

    /// Check out a pooled connection.
    pub fn conn(
        &self,
    ) -> Result<PooledConnection<ConnectionManager<PgConnection>>, ApiError> {
        self.pool
            .get()
            .map_err(|e| ApiError::Internal(format!("database connection failed: {e}")))
    }
}

/// Readiness of the backing database schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbState {
    Initializing,
    Ready,
    Failed,
}

fn init_logging() {
    let fmt_layer = tracing_subscriber::fmt::layer();
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

fn build_router(state: AppState) -> Router {
    let upload_dir = state.upload_dir.clone();

    let swagger_ui = SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api::openapi());

    Router::new()
        .route("/api/health", get(api::health::health))
        .nest("/api/recipes", api::recipes::router())
        .merge(swagger_ui)
        .nest_service("/uploads", ServeDir::new(upload_dir))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<_>| {
                    let matched_path = request
                        .extensions()
                        .get::<MatchedPath>()
                        .map(MatchedPath::as_str)
                        .unwrap_or(request.uri().path());

                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %matched_path,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     _span: &Span| {
                        let status = response.status().as_u16();
                        if status >= 500 {
                            tracing::error!(
                                status = %status,
                                latency_ms = %latency.as_millis(),
                                "request failed with server error"
                            );
                        } else {
                            tracing::info!(
                                status = %status,
                                latency_ms = %latency.as_millis(),
                                "request completed"
                            );
                        }
                    },
                ),
        )
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("shutdown signal received, draining connections");
}

#[tokio::main]
async fn main() {
    init_logging();

    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(5000);
    let upload_dir = PathBuf::from(env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".into()));

    tracing::info!(state = ?DbState::Initializing, "initializing database schema");

    let (pool, db_state) = match db::create_pool(&database_url) {
        Ok(pool) => (pool, DbState::Ready),
        Err(e) => {
            // Serving traffic against an unready schema is never acceptable.
            tracing::error!(
                state = ?DbState::Failed,
                error = %e,
                "database initialization failed, refusing to serve"
            );
            std::process::exit(1);
        }
    };

    if let Err(e) = tokio::fs::create_dir_all(&upload_dir).await {
        tracing::error!(error = %e, dir = %upload_dir.display(), "failed to create uploads directory");
        std::process::exit(1);
    }

    let state: AppState = Arc::new(ServiceContext {
        pool,
        db_state,
        upload_dir,
    });

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await.unwrap();

    tracing::info!("Server listening on {}", listener.local_addr().unwrap());
    tracing::info!("Swagger UI available at http://localhost:{}/swagger-ui/", port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();

    // Dropping the pool on return releases all pooled connections.
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::StatusCode;
    use std::time::Duration;
    use tower::ServiceExt;

    /// A pool whose connections can never be established. `build_unchecked`
    /// skips the eager connect, so constructing it needs no database.
    fn dead_pool() -> db::DbPool {
        let manager =
            ConnectionManager::<PgConnection>::new("postgres://localhost:1/unreachable");
        diesel::r2d2::Pool::builder()
            .connection_timeout(Duration::from_millis(100))
            .build_unchecked(manager)
    }

    fn test_state(db_state: DbState) -> AppState {
        Arc::new(ServiceContext {
            pool: dead_pool(),
            db_state,
            upload_dir: std::env::temp_dir(),
        })
    }

    async fn status_of(db_state: DbState, uri: &str) -> StatusCode {
        let app = build_router(test_state(db_state));
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        response.status()
    }

    #[tokio::test]
    async fn health_reports_failed_schema_as_unavailable() {
        assert_eq!(
            status_of(DbState::Failed, "/api/health").await,
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[tokio::test]
    async fn health_reports_unreachable_database_as_unavailable() {
        assert_eq!(
            status_of(DbState::Ready, "/api/health").await,
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[tokio::test]
    async fn recipes_are_unavailable_before_schema_is_ready() {
        assert_eq!(
            status_of(DbState::Initializing, "/api/recipes").await,
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[tokio::test]
    async fn list_fails_closed_when_database_is_down() {
        assert_eq!(
            status_of(DbState::Ready, "/api/recipes").await,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn non_numeric_recipe_id_is_rejected() {
        let status = status_of(DbState::Ready, "/api/recipes/not-a-number").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
