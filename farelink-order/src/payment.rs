use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use farelink_benzy::wire::{CardPayload, PaymentCallbackPayload, StartPayRequest};
use farelink_core::booking::{BookingPaymentStatus, BookingStatus};
use farelink_core::error::{BookingError, ValidationError};
use farelink_core::payment::{
    is_success_code, GatewayDetails, Payment, PaymentStatus, SupplierResponseEcho,
};

use crate::service::BookingService;

#[derive(Debug, Clone, Serialize)]
pub struct PaymentInitiation {
    pub payment_id: Uuid,
    pub redirect_url: Option<String>,
    pub redirect_mode: Option<String>,
    pub status: PaymentStatus,
}

/// Result of applying one gateway callback; the HTTP layer renders it as
/// JSON or as a redirect depending on the caller.
#[derive(Debug, Clone, Serialize)]
pub struct CallbackOutcome {
    pub payment_id: Uuid,
    pub booking_reference: String,
    pub booking_status: BookingStatus,
    pub payment_status: PaymentStatus,
    pub message: Option<String>,
}

impl BookingService {
    /// Opens a payment with the supplier gateway and moves the booking to
    /// `PendingPayment`.
    pub async fn initiate_payment(
        &self,
        booking_id: Uuid,
    ) -> Result<PaymentInitiation, BookingError> {
        let mut booking = self
            .bookings
            .get(booking_id)
            .await?
            .ok_or_else(|| BookingError::NotFound("Booking".to_string()))?;

        if booking.payment_status == BookingPaymentStatus::Completed {
            return Err(BookingError::Conflict(
                "Payment already completed for this booking".to_string(),
            ));
        }

        let leg = booking
            .flights
            .first()
            .ok_or_else(|| ValidationError::single("Booking has no flight leg"))?
            .clone();
        let transaction_id: i64 = booking
            .transaction_id
            .parse()
            .map_err(|_| ValidationError::single("Booking transaction id is not numeric"))?;

        let credentials = self.credentials.get_credentials().await?;

        let request = StartPayRequest {
            transaction_id,
            payment_amount: 0.0,
            net_amount: booking.pricing.total_amount,
            browser_key: self.browser_key.clone(),
            client_id: credentials.client_id.clone(),
            tui: leg.tui.clone(),
            hold: false,
            promo: None,
            payment_type: String::new(),
            bank_code: String::new(),
            gate_way_code: String::new(),
            merchant_id: String::new(),
            payment_charge: 0.0,
            release_date: String::new(),
            online_payment: false,
            deposit_payment: true,
            card: CardPayload {
                emi_months: "0".to_string(),
                ..CardPayload::default()
            },
            vpa: String::new(),
            card_alias: String::new(),
            quick_pay: None,
            rms_signature: String::new(),
            target_currency: String::new(),
            target_amount: 0.0,
            service_type: "ITI".to_string(),
        };

        let response = self.gateway.start_pay(&credentials.token, &request).await?;

        let now = Utc::now();
        let mut payment = Payment {
            id: Uuid::new_v4(),
            booking_id: booking.id,
            transaction_id: booking.transaction_id.clone(),
            tui: leg.tui,
            payment_amount: booking.pricing.total_amount,
            net_amount: booking.pricing.total_amount,
            status: PaymentStatus::Initiated,
            payment_type: "DEPOSIT".to_string(),
            gateway: GatewayDetails {
                code: response.gateway_code.clone(),
                payment_id: response.payment_id.clone(),
                redirect_url: response.redirect_url.clone(),
                redirect_mode: response.redirect_mode.clone(),
                metadata: serde_json::to_value(&response.post_data).unwrap_or_default(),
            },
            response: SupplierResponseEcho {
                code: Some(response.code.clone()),
                message: response.first_message(),
                book_status: response.book_status.clone(),
                crs_pnr: response.crs_pnr.clone(),
            },
            history: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        payment.record(PaymentStatus::Initiated, Some("Payment initiated".to_string()), now);
        payment.record(
            PaymentStatus::Processing,
            Some("Handed off to payment gateway".to_string()),
            now,
        );

        self.payments.create(&payment).await?;

        if booking.status.can_transition_to(BookingStatus::PendingPayment) {
            booking.status = BookingStatus::PendingPayment;
        }
        booking.payment_status = BookingPaymentStatus::Processing;
        booking.updated_at = now;
        self.bookings.update(&booking).await?;

        info!(
            booking = %booking.booking_reference,
            payment = %payment.id,
            "payment initiated"
        );

        Ok(PaymentInitiation {
            payment_id: payment.id,
            redirect_url: response.redirect_url,
            redirect_mode: response.redirect_mode,
            status: payment.status,
        })
    }

    /// Applies a gateway settlement callback. Safe under re-delivery: the
    /// history appends another entry and the statuses re-apply to the same
    /// values.
    pub async fn handle_payment_callback(
        &self,
        transaction_id: &str,
        payload: &PaymentCallbackPayload,
    ) -> Result<CallbackOutcome, BookingError> {
        let mut payment = self
            .payments
            .find_by_transaction_id(transaction_id)
            .await?
            .ok_or_else(|| BookingError::NotFound("Payment".to_string()))?;
        let mut booking = self
            .bookings
            .get(payment.booking_id)
            .await?
            .ok_or_else(|| BookingError::NotFound("Booking".to_string()))?;

        let success = is_success_code(&payload.code);
        let status = if success {
            PaymentStatus::Success
        } else {
            PaymentStatus::Failed
        };
        let message = payload.first_message();

        let now = Utc::now();
        payment.response = SupplierResponseEcho {
            code: Some(payload.code.clone()),
            message: message.clone(),
            book_status: payload.book_status.clone(),
            crs_pnr: payload.crs_pnr.clone(),
        };
        payment.record(status, message.clone(), now);
        self.payments.update(&payment).await?;

        booking.payment_status = if success {
            BookingPaymentStatus::Completed
        } else {
            BookingPaymentStatus::Failed
        };
        let target = if success {
            BookingStatus::Confirmed
        } else {
            BookingStatus::Cancelled
        };
        if booking.status != target {
            if booking.status.can_transition_to(target) {
                booking.status = target;
            } else {
                warn!(
                    booking = %booking.booking_reference,
                    from = booking.status.as_str(),
                    to = target.as_str(),
                    "callback arrived for a booking that cannot transition"
                );
            }
        }
        if let Some(pnr) = payload.crs_pnr.as_ref() {
            if let Some(leg) = booking.flights.first_mut() {
                leg.provider_pnr = Some(pnr.clone());
            }
        }
        booking.updated_at = now;
        self.bookings.update(&booking).await?;

        info!(
            booking = %booking.booking_reference,
            code = %payload.code,
            status = status.as_str(),
            "payment callback applied"
        );

        Ok(CallbackOutcome {
            payment_id: payment.id,
            booking_reference: booking.booking_reference.clone(),
            booking_status: booking.status,
            payment_status: status,
            message,
        })
    }
}
