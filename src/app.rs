use axum::http::HeaderValue;
use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::routes::{forecast, health, portfolio, prices, stream};
use crate::state::AppState;

pub fn create_app(state: AppState) -> Router {
    Router::<AppState>::new()
        .merge(health::router())
        .route("/ws/prices", get(stream::ws_prices))
        .route("/compare/:user_id", get(prices::compare_portfolio))
        .nest("/price", prices::router())
        .nest("/forecast", forecast::router())
        .nest("/portfolio", portfolio::router())
        .layer(cors_layer())
        .with_state(state)
}

// The web frontend runs on the Vite dev port unless configured otherwise.
fn cors_layer() -> CorsLayer {
    let origin =
        std::env::var("CORS_ORIGIN").unwrap_or_else(|_| "http://localhost:5173".to_string());

    match origin.parse::<HeaderValue>() {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods(Any)
            .allow_headers(Any),
        Err(_) => CorsLayer::new().allow_methods(Any).allow_headers(Any),
    }
}
