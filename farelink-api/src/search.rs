use axum::{extract::State, routing::post, Json, Router};
use serde::Serialize;

use farelink_core::offer::FlightOffer;
use farelink_core::search::SearchRequest;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
struct SearchResponse {
    success: bool,
    from_cache: bool,
    tui: String,
    data: Vec<FlightOffer>,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/flights/search", post(search_flights))
}

async fn search_flights(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, AppError> {
    let outcome = state.search.initiate_search(&request).await?;

    Ok(Json(SearchResponse {
        success: true,
        from_cache: outcome.from_cache,
        tui: outcome.tui,
        data: outcome.offers,
    }))
}
