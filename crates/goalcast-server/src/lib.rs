//! Goalcast Web Server
//!
//! Axum-based REST API for savings goal forecasting.
//!
//! Security features:
//! - API key authentication (secure by default, use --no-auth for local dev)
//! - Restrictive CORS policy
//! - Input validation (pagination and forecast horizon limits)
//! - Sanitized error responses

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::{cors::CorsLayer, set_header::SetResponseHeaderLayer, trace::TraceLayer};
use tracing::{error, info, warn};

use goalcast_core::{Config, Database, GoalForecaster};

mod handlers;

/// Maximum pagination limit
pub const MAX_PAGE_LIMIT: i64 = 1000;

/// Maximum months in a single forecast request
pub const MAX_FORECAST_MONTHS: usize = 120;

/// Environment variable holding comma-separated API keys
pub const API_KEYS_ENV: &str = "GOALCAST_API_KEYS";

/// Authorization header for API key auth
const AUTHORIZATION_HEADER: &str = "authorization";

/// Server configuration
#[derive(Clone)]
pub struct ServerConfig {
    /// Whether authentication is required (secure by default)
    pub require_auth: bool,
    /// Allowed CORS origins (empty = same-origin only)
    pub allowed_origins: Vec<String>,
    /// API keys, sent as "Bearer <key>" in the Authorization header
    pub api_keys: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            require_auth: true,
            allowed_origins: vec![],
            api_keys: vec![],
        }
    }
}

impl ServerConfig {
    /// Read API keys from `GOALCAST_API_KEYS`
    pub fn api_keys_from_env() -> Vec<String> {
        parse_api_keys(&std::env::var(API_KEYS_ENV).unwrap_or_default())
    }
}

/// Parse a comma-separated list of API keys, skipping blanks
pub fn parse_api_keys(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Shared application state
pub struct AppState {
    pub db: Database,
    /// Forecasting pipeline over the database and the configured model store
    pub forecaster: GoalForecaster,
    /// Forecast/goal/model settings
    pub settings: Config,
    pub config: ServerConfig,
}

/// Authentication middleware - validates API keys
///
/// Keys are compared in constant time to prevent timing attacks.
async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    if !state.config.require_auth {
        return next.run(request).await;
    }

    let api_key_valid = request
        .headers()
        .get(AUTHORIZATION_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer "))
        .map(|key| validate_api_key(key, &state.config.api_keys))
        .unwrap_or(false);

    if api_key_valid {
        info!(user = "api-key", path = %request.uri().path(), "Authenticated via API key");
        return next.run(request).await;
    }

    warn!(path = %request.uri().path(), "Unauthorized request - no valid auth");
    (
        StatusCode::UNAUTHORIZED,
        Json(serde_json::json!({
            "error": "Authentication required"
        })),
    )
        .into_response()
}

/// Validate an API key against the configured keys using constant-time comparison
fn validate_api_key(provided: &str, valid_keys: &[String]) -> bool {
    use subtle::ConstantTimeEq;

    let provided_bytes = provided.as_bytes();

    for key in valid_keys {
        let key_bytes = key.as_bytes();
        // Only compare if lengths match (constant-time for same-length keys)
        if provided_bytes.len() == key_bytes.len() && provided_bytes.ct_eq(key_bytes).into() {
            return true;
        }
    }
    false
}

/// Create the router
pub fn create_router(db: Database, settings: Config, config: ServerConfig) -> Router {
    let store = settings.model.open_store(&db);
    let forecaster = GoalForecaster::new(Arc::new(db.clone()), store);

    let state = Arc::new(AppState {
        db,
        forecaster,
        settings,
        config: config.clone(),
    });

    let api_routes = Router::new()
        // Projection
        .route("/goal-projection", post(handlers::goal_projection))
        // Forecasting model
        .route("/forecast", get(handlers::get_forecast))
        .route("/train", post(handlers::train_model))
        .route("/model", get(handlers::get_model))
        // Transactions
        .route(
            "/transactions",
            get(handlers::list_transactions).post(handlers::create_transaction),
        )
        // Goals
        .route(
            "/goals",
            get(handlers::list_goals).post(handlers::create_goal),
        )
        .route(
            "/goals/:id",
            get(handlers::get_goal).delete(handlers::delete_goal),
        )
        .route("/goals/:id/projection", get(handlers::get_goal_projection))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Health stays reachable without credentials
    let public_routes = Router::new().route("/health", get(handlers::health));

    // Build CORS layer
    let cors = if config.allowed_origins.is_empty() {
        // Restrictive default: only allow same-origin
        CorsLayer::new()
            .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
    };

    Router::new()
        .nest("/api", api_routes.merge(public_routes))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Security headers
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::CONTENT_SECURITY_POLICY,
            HeaderValue::from_static("default-src 'none'; frame-ancestors 'none'"),
        ))
}

/// Start the server with default security settings
pub async fn serve(db: Database, settings: Config, host: &str, port: u16) -> anyhow::Result<()> {
    let config = ServerConfig {
        api_keys: ServerConfig::api_keys_from_env(),
        ..Default::default()
    };
    serve_with_config(db, settings, host, port, config).await
}

/// Start the server with custom configuration
pub async fn serve_with_config(
    db: Database,
    settings: Config,
    host: &str,
    port: u16,
    config: ServerConfig,
) -> anyhow::Result<()> {
    if !config.require_auth {
        warn!("⚠️  Authentication disabled - do not expose to network!");
    } else if config.api_keys.is_empty() {
        warn!(
            "⚠️  Authentication required but no API keys configured (set {})",
            API_KEYS_ENV
        );
    }

    match db.latest_trend_model() {
        Ok(Some(stored)) => info!(
            trained_at = %stored.model.trained_at,
            observations = stored.model.observations,
            "Trend model available"
        ),
        Ok(None) => info!("ℹ️  No trend model trained yet (POST /api/train)"),
        Err(e) => warn!("Failed to read trend model history: {}", e),
    }

    let app = create_router(db, settings, config);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn not_found(msg: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn internal(msg: &str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let body = Json(serde_json::json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl From<goalcast_core::Error> for AppError {
    fn from(err: goalcast_core::Error) -> Self {
        use goalcast_core::Error as E;

        match &err {
            E::EmptyInput
            | E::MissingField(_)
            | E::InsufficientRate(_)
            | E::InvalidData(_)
            | E::Import(_)
            | E::Csv(_) => Self::bad_request(&err.to_string()),
            E::ModelNotFound(_) => {
                Self::not_found("No trained model found. Train one first with POST /api/train")
            }
            E::NotFound(what) => Self::not_found(&format!("{} not found", what)),
            _ => Self::from(anyhow::Error::new(err)),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            // Return generic message to client
            message: "An internal error occurred".to_string(),
            // Keep full error for logging
            internal: Some(err),
        }
    }
}
