//! Router configuration.

use std::sync::Arc;
use std::time::Duration;

use axum::routing::{get, post};
use axum::Router;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{affection, currency, gacha, health, items, login_bonus};
use crate::state::AppState;

/// Maximum concurrent requests for the service-to-service credit endpoints.
const SERVICE_MAX_CONCURRENT_REQUESTS: usize = 100;

/// Maximum concurrent requests for user endpoints.
const API_MAX_CONCURRENT_REQUESTS: usize = 50;

/// Create the service router with all routes and middleware.
///
/// # Routes
///
/// ## Public
/// - `GET /health` - Health check
///
/// ## Currency (user auth)
/// - `GET /v1/currency/balance` - Current balance
/// - `GET /v1/currency/transactions` - Transaction history
/// - `POST /v1/currency/debit` - Spend coins
///
/// ## Currency (service API key)
/// - `POST /v1/currency/credit` - Credit reward coins
/// - `POST /v1/currency/paid` - Credit purchased coins
///
/// ## Gacha and items (user auth)
/// - `POST /v1/gacha/draw` - Single or 11-draw
/// - `GET /v1/gacha/pity` - Pity counter
/// - `GET /v1/items` - Owned items
/// - `POST /v1/items/equip` - Equip an item
///
/// ## Affection and login bonus (user auth)
/// - `POST /v1/affection/increase` - Add affection points
/// - `GET /v1/affection` - Affection per character
/// - `POST /v1/login-bonus/claim` - Claim today's bonus
/// - `GET /v1/login-bonus/streak` - Login streak
pub fn create_router(state: AppState) -> Router {
    let cors_origins = state.config.cors_origins.clone();
    let max_body_bytes = state.config.max_body_bytes;
    let request_timeout_seconds = state.config.request_timeout_seconds;

    let cors = build_cors_layer(&cors_origins);

    let state = Arc::new(state);

    // Reward credits arrive from other services in bursts.
    let service_routes = Router::new()
        .route("/credit", post(currency::credit))
        .route("/paid", post(currency::credit_paid))
        .layer(ConcurrencyLimitLayer::new(SERVICE_MAX_CONCURRENT_REQUESTS));

    let api_routes = Router::new()
        // Currency
        .route("/currency/balance", get(currency::get_balance))
        .route("/currency/transactions", get(currency::list_transactions))
        .route("/currency/debit", post(currency::debit))
        .nest("/currency", service_routes)
        // Gacha
        .route("/gacha/draw", post(gacha::draw))
        .route("/gacha/pity", get(gacha::get_pity))
        // Items
        .route("/items", get(items::list_items))
        .route("/items/equip", post(items::equip))
        // Affection
        .route("/affection", get(affection::list))
        .route("/affection/increase", post(affection::increase))
        // Login bonus
        .route("/login-bonus/claim", post(login_bonus::claim))
        .route("/login-bonus/streak", get(login_bonus::streak))
        .layer(ConcurrencyLimitLayer::new(API_MAX_CONCURRENT_REQUESTS));

    Router::new()
        .route("/health", get(health::health))
        .nest("/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(
            request_timeout_seconds,
        )))
        .with_state(state)
}

/// Build the CORS layer from configured origins.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
