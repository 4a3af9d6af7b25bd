use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use farelink_benzy::ancillary::{SeatMap, SsrCatalog};
use farelink_benzy::{SeatLayoutQuery, SsrQuery};

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
struct SeatLayoutBody {
    tui: String,
    #[serde(default = "default_order_id")]
    order_id: u32,
    amount: f64,
}

fn default_order_id() -> u32 {
    1
}

#[derive(Debug, Serialize)]
struct SeatLayoutResponse {
    success: bool,
    data: SeatMap,
}

#[derive(Debug, Serialize)]
struct SsrListResponse {
    success: bool,
    data: SsrCatalog,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/flights/seat-layout", post(seat_layout))
        .route("/v1/flights/{tui}/{flight_number}/ssr", get(ssr_list))
}

async fn seat_layout(
    State(state): State<AppState>,
    Json(body): Json<SeatLayoutBody>,
) -> Result<Json<SeatLayoutResponse>, AppError> {
    let query = SeatLayoutQuery {
        tui: body.tui,
        order_id: body.order_id,
        amount: body.amount,
    };
    let data = state.ancillary.seat_layout(&query).await?;

    Ok(Json(SeatLayoutResponse {
        success: true,
        data,
    }))
}

async fn ssr_list(
    State(state): State<AppState>,
    Path((tui, flight_number)): Path<(String, String)>,
) -> Result<Json<SsrListResponse>, AppError> {
    let data = state
        .ancillary
        .ssr_catalog(&SsrQuery::new(tui, flight_number))
        .await?;

    Ok(Json(SsrListResponse {
        success: true,
        data,
    }))
}
