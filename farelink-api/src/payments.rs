use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    response::Redirect,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use farelink_benzy::wire::PaymentCallbackPayload;
use farelink_core::booking::BookingStatus;
use farelink_core::payment::PaymentStatus;
use farelink_order::PaymentInitiation;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
struct InitiationResponse {
    success: bool,
    data: PaymentInitiation,
}

#[derive(Debug, Serialize)]
struct CallbackResponse {
    success: bool,
    payment_id: Uuid,
    booking_reference: String,
    booking_status: BookingStatus,
    payment_status: PaymentStatus,
    message: Option<String>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/payments/{booking_id}/initiate", post(initiate_payment))
        // The gateway settles through two surfaces: a machine-to-machine
        // JSON POST and a browser GET that lands the traveller back on the
        // booking page. Both drive the same state transition.
        .route(
            "/v1/payments/callback/{transaction_id}",
            post(payment_callback_json).get(payment_callback_redirect),
        )
}

async fn initiate_payment(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
) -> Result<Json<InitiationResponse>, AppError> {
    let data = state.bookings.initiate_payment(booking_id).await?;

    Ok(Json(InitiationResponse {
        success: true,
        data,
    }))
}

async fn payment_callback_json(
    State(state): State<AppState>,
    Path(transaction_id): Path<String>,
    Json(payload): Json<PaymentCallbackPayload>,
) -> Result<Json<CallbackResponse>, AppError> {
    let outcome = state
        .bookings
        .handle_payment_callback(&transaction_id, &payload)
        .await?;

    Ok(Json(CallbackResponse {
        success: true,
        payment_id: outcome.payment_id,
        booking_reference: outcome.booking_reference,
        booking_status: outcome.booking_status,
        payment_status: outcome.payment_status,
        message: outcome.message,
    }))
}

async fn payment_callback_redirect(
    State(state): State<AppState>,
    Path(transaction_id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Redirect, AppError> {
    let payload = PaymentCallbackPayload {
        code: params.get("Code").cloned().unwrap_or_default(),
        msg: params
            .get("Msg")
            .map(|m| Value::String(m.clone()))
            .unwrap_or(Value::Null),
        book_status: params.get("BookStatus").cloned(),
        crs_pnr: params.get("CRSPNR").cloned(),
        redirect_mode: params.get("RedirectMode").cloned(),
        post_data: None,
    };

    let outcome = state
        .bookings
        .handle_payment_callback(&transaction_id, &payload)
        .await?;

    Ok(Redirect::to(&format!(
        "{}/booking/{}",
        state.frontend_base_url, outcome.booking_reference
    )))
}
