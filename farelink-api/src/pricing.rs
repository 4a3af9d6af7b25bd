use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};

use farelink_benzy::LivePriceQuery;
use farelink_core::pricing::PricingResult;
use farelink_core::search::TripType;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
struct PricingBody {
    amount: f64,
    index: String,
    #[serde(default = "default_trip_type")]
    trip_type: TripType,
    tui: String,
    #[serde(default = "default_order_id")]
    order_id: u32,
}

fn default_trip_type() -> TripType {
    TripType::OneWay
}

fn default_order_id() -> u32 {
    1
}

#[derive(Debug, Serialize)]
struct PricingResponse {
    success: bool,
    data: PricingResult,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/flights/pricing", post(get_live_price))
}

async fn get_live_price(
    State(state): State<AppState>,
    Json(body): Json<PricingBody>,
) -> Result<Json<PricingResponse>, AppError> {
    let query = LivePriceQuery {
        amount: body.amount,
        offer_index: body.index,
        trip_type: body.trip_type,
        tui: body.tui,
        order_id: body.order_id,
    };

    // A supplier-side price change is a normal 200 with `priceChange` set;
    // the caller decides whether to re-confirm with the traveller.
    let result = state.pricing.get_live_price(&query).await?;

    Ok(Json(PricingResponse {
        success: true,
        data: result,
    }))
}
