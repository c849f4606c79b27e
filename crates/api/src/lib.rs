//! # DocSlot API
//!
//! HTTP server for the DocSlot scheduling service: doctors manage their
//! bookable slots, patients query availability, and the appointment flow
//! books and releases slots.
//!
//! ## Architecture
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Parse requests and delegate to the scheduling service
//! - **Extractors**: Body, path and query parsing with uniform rejections
//! - **Middleware**: Identity verification and error mapping
//! - **Config**: Environment-based configuration
//!
//! The API uses Axum as the web framework; storage goes through the
//! `docslot-db` store traits.

/// Configuration module for API settings
pub mod config;
/// Extractors with JSON error rejections
pub mod extractors;
/// Request handlers
pub mod handlers;
/// Identity verification and error handling
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;

use std::{sync::Arc, time::Duration};

use axum::{Router, http::HeaderValue};
use docslot_db::{DbPool, store::PgStore};
use docslot_scheduling::service::SchedulingService;
use eyre::Result;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{info, level_filters::LevelFilter, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::middleware::auth::{IdentityVerifier, JwtVerifier};

/// Shared application state that is accessible to all request handlers
pub struct ApiState {
    /// Scheduling operations over the configured store
    pub service: SchedulingService,
    /// Verifier for bearer credentials
    pub verifier: Arc<dyn IdentityVerifier>,
}

impl ApiState {
    pub fn new(service: SchedulingService, verifier: Arc<dyn IdentityVerifier>) -> Self {
        Self { service, verifier }
    }
}

/// Builds the application router with every route attached to `state`.
pub fn app(state: Arc<ApiState>) -> Router {
    Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Slot management and booking endpoints
        .merge(routes::slots::routes())
        // Attach shared state to all routes
        .with_state(state)
}

/// Starts the API server with the provided configuration and database connection
///
/// Installs logging, wires the PostgreSQL store into the scheduling
/// service, and serves until the listener fails.
pub async fn start_server(config: config::ApiConfig, db_pool: DbPool) -> Result<()> {
    // Initialize tracing for logging; RUST_LOG takes precedence over LOG_LEVEL
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::default().add_directive(LevelFilter::from_level(config.log_level).into())
    });
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Create shared state with dependencies
    let store = Arc::new(PgStore::new(db_pool));
    let service = SchedulingService::new(store.clone(), store);
    let verifier = Arc::new(JwtVerifier::new(&config.jwt_secret));
    let state = Arc::new(ApiState::new(service, verifier));

    let app = app(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout))),
    );

    // Apply CORS configuration if origins are specified
    let app = if let Some(origins) = &config.cors_origins {
        let allowed: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| match origin.parse() {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!("Ignoring invalid CORS origin: {}", origin);
                    None
                }
            })
            .collect();

        let cors = CorsLayer::new()
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::DELETE,
                axum::http::Method::OPTIONS,
            ])
            .allow_headers([
                axum::http::header::CONTENT_TYPE,
                axum::http::header::AUTHORIZATION,
                axum::http::header::ACCEPT,
            ])
            .allow_origin(allowed)
            .allow_credentials(true);

        app.layer(cors)
    } else {
        app
    };

    // Start the HTTP server
    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
