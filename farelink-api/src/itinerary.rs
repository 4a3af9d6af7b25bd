use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde::Serialize;

use farelink_order::{ItineraryOutcome, ItineraryRequest};

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
struct ItineraryResponse {
    success: bool,
    data: ItineraryOutcome,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/flights/itinerary", post(create_itinerary))
}

async fn create_itinerary(
    State(state): State<AppState>,
    Json(request): Json<ItineraryRequest>,
) -> Result<(StatusCode, Json<ItineraryResponse>), AppError> {
    let outcome = state.bookings.create_itinerary(&request).await?;

    Ok((
        StatusCode::CREATED,
        Json(ItineraryResponse {
            success: true,
            data: outcome,
        }),
    ))
}
