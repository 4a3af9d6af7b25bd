use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};

use farelink_order::{RetrieveQuery, RetrievedBooking};

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
struct RetrieveBody {
    reference_type: String,
    reference_number: String,
    #[serde(default = "default_service_type")]
    service_type: String,
}

fn default_service_type() -> String {
    "FLT".to_string()
}

#[derive(Debug, Serialize)]
struct RetrieveResponse {
    success: bool,
    data: RetrievedBooking,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/bookings/retrieve", post(retrieve_booking))
}

async fn retrieve_booking(
    State(state): State<AppState>,
    Json(body): Json<RetrieveBody>,
) -> Result<Json<RetrieveResponse>, AppError> {
    let query = RetrieveQuery {
        reference_type: body.reference_type,
        reference_number: body.reference_number,
        service_type: body.service_type,
    };
    let data = state.bookings.retrieve_booking(&query).await?;

    Ok(Json(RetrieveResponse {
        success: true,
        data,
    }))
}
