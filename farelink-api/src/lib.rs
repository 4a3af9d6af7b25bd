use axum::{http::Method, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod ancillary;
pub mod bookings;
pub mod error;
pub mod itinerary;
pub mod payments;
pub mod pricing;
pub mod search;
pub mod state;

pub use state::AppState;

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
            axum::http::header::USER_AGENT,
        ]);

    Router::new()
        .merge(search::routes())
        .merge(pricing::routes())
        .merge(ancillary::routes())
        .merge(itinerary::routes())
        .merge(payments::routes())
        .merge(bookings::routes())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
