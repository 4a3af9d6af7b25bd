use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use farelink_core::error::{BookingError, PricingError, SearchError, SupplierError};

#[derive(Debug)]
pub enum AppError {
    Validation(Vec<String>),
    NotFound(String),
    Conflict(String),
    /// Search deadline elapsed: a distinct, user-actionable condition.
    SearchTimeout,
    /// Upstream failure, surfaced with a generic-safe message. Details are
    /// logged where the error is converted.
    Upstream(&'static str),
    Internal(anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Validation(violations) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "success": false,
                    "message": "Validation failed",
                    "errors": violations,
                }),
            ),
            AppError::NotFound(what) => (
                StatusCode::NOT_FOUND,
                json!({ "success": false, "message": format!("{what} not found") }),
            ),
            AppError::Conflict(message) => (
                StatusCode::CONFLICT,
                json!({ "success": false, "message": message }),
            ),
            AppError::SearchTimeout => (
                StatusCode::REQUEST_TIMEOUT,
                json!({ "success": false, "message": "Search timeout - please try again" }),
            ),
            AppError::Upstream(message) => (
                StatusCode::BAD_GATEWAY,
                json!({ "success": false, "message": message }),
            ),
            AppError::Internal(e) => {
                tracing::error!("internal error: {e:#}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "success": false, "message": "Internal server error" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<SearchError> for AppError {
    fn from(e: SearchError) -> Self {
        match e {
            SearchError::Validation(v) => AppError::Validation(v.violations),
            SearchError::DeadlineExceeded(elapsed) => {
                tracing::warn!(?elapsed, "search deadline exceeded");
                AppError::SearchTimeout
            }
            SearchError::PollRetriesExhausted { attempts, last } => {
                tracing::error!(attempts, error = %last, "search polling exhausted its retries");
                AppError::Upstream("Flight search failed")
            }
            SearchError::Supplier(e) => supplier_error("search", e, "Flight search failed"),
        }
    }
}

impl From<PricingError> for AppError {
    fn from(e: PricingError) -> Self {
        match e {
            PricingError::Validation(v) => AppError::Validation(v.violations),
            PricingError::Supplier(e) => supplier_error("pricing", e, "Pricing request failed"),
        }
    }
}

impl From<BookingError> for AppError {
    fn from(e: BookingError) -> Self {
        match e {
            BookingError::Validation(v) => AppError::Validation(v.violations),
            BookingError::NotFound(what) => AppError::NotFound(what),
            BookingError::Conflict(message) => AppError::Conflict(message),
            BookingError::Supplier(e) => supplier_error("booking", e, "Booking request failed"),
            BookingError::Store(e) => AppError::Internal(anyhow::anyhow!(e)),
        }
    }
}

impl From<SupplierError> for AppError {
    fn from(e: SupplierError) -> Self {
        supplier_error("supplier", e, "Supplier request failed")
    }
}

fn supplier_error(
    operation: &'static str,
    error: SupplierError,
    safe_message: &'static str,
) -> AppError {
    tracing::error!(operation, error = %error, "upstream call failed");
    AppError::Upstream(safe_message)
}
