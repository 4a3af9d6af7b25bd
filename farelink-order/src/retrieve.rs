use serde::Serialize;

use farelink_benzy::wire::{as_f64_lenient, RetrieveBookingRequest};
use farelink_core::error::{BookingError, ValidationError};

use crate::service::BookingService;

#[derive(Debug, Clone)]
pub struct RetrieveQuery {
    pub reference_type: String,
    pub reference_number: String,
    pub service_type: String,
}

impl RetrieveQuery {
    pub fn new(reference_type: impl Into<String>, reference_number: impl Into<String>) -> Self {
        Self {
            reference_type: reference_type.into(),
            reference_number: reference_number.into(),
            service_type: "FLT".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RetrievedSegment {
    pub airline: Option<String>,
    pub flight_number: Option<String>,
    pub departure_airport: Option<String>,
    pub departure_terminal: Option<String>,
    pub departure_time: Option<String>,
    pub arrival_airport: Option<String>,
    pub arrival_terminal: Option<String>,
    pub arrival_time: Option<String>,
    pub duration: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RetrievedPassenger {
    pub title: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub pax_type: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RetrievedPricing {
    pub currency: String,
    pub base_amount: f64,
    pub taxes: f64,
    pub total_amount: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RetrievedBooking {
    pub transaction_id: Option<i64>,
    pub booking_status: Option<String>,
    pub payment_status: Option<String>,
    pub segments: Vec<RetrievedSegment>,
    pub passengers: Vec<RetrievedPassenger>,
    pub pricing: RetrievedPricing,
}

impl BookingService {
    /// Fetches the supplier's view of a booking by PNR or transaction
    /// reference.
    pub async fn retrieve_booking(
        &self,
        query: &RetrieveQuery,
    ) -> Result<RetrievedBooking, BookingError> {
        let mut violations = Vec::new();
        if query.reference_type.trim().is_empty() {
            violations.push("Reference type is required".to_string());
        }
        if query.reference_number.trim().is_empty() {
            violations.push("Reference number is required".to_string());
        }
        if !violations.is_empty() {
            return Err(ValidationError::new(violations).into());
        }

        let credentials = self.credentials.get_credentials().await?;
        let request = RetrieveBookingRequest {
            reference_type: query.reference_type.clone(),
            reference_number: query.reference_number.clone(),
            client_id: credentials.client_id.clone(),
            service_type: query.service_type.clone(),
        };

        let response = self
            .gateway
            .retrieve_booking(&credentials.token, &request)
            .await?;

        let segments = response
            .trips
            .first()
            .into_iter()
            .flat_map(|trip| trip.journey.first())
            .flat_map(|journey| journey.segments.iter())
            .map(|segment| {
                let flight = segment.flight.as_ref();
                RetrievedSegment {
                    airline: flight.and_then(|f| f.airline.clone()),
                    flight_number: flight.and_then(|f| f.flight_no.clone()),
                    departure_airport: flight.and_then(|f| f.departure_airport_name.clone()),
                    departure_terminal: flight.and_then(|f| f.departure_terminal.clone()),
                    departure_time: flight.and_then(|f| f.departure_time.clone()),
                    arrival_airport: flight.and_then(|f| f.arrival_airport_name.clone()),
                    arrival_terminal: flight.and_then(|f| f.arrival_terminal.clone()),
                    arrival_time: flight.and_then(|f| f.arrival_time.clone()),
                    duration: flight.and_then(|f| f.duration.clone()),
                }
            })
            .collect();

        let taxes = response
            .trips
            .first()
            .and_then(|trip| trip.journey.first())
            .and_then(|journey| journey.segments.first())
            .and_then(|segment| segment.fares.as_ref())
            .and_then(|fares| as_f64_lenient(&fares.total_tax))
            .unwrap_or(0.0);

        Ok(RetrievedBooking {
            transaction_id: response.transaction_id,
            booking_status: response.status.clone(),
            payment_status: response.payment_status.clone(),
            segments,
            passengers: response
                .pax
                .iter()
                .map(|pax| RetrievedPassenger {
                    title: pax.title.clone(),
                    first_name: pax.first_name.clone(),
                    last_name: pax.last_name.clone(),
                    pax_type: pax.pax_type.clone(),
                })
                .collect(),
            pricing: RetrievedPricing {
                currency: "INR".to_string(),
                base_amount: as_f64_lenient(&response.airline_net_fare).unwrap_or(0.0),
                taxes,
                total_amount: as_f64_lenient(&response.gross_amount).unwrap_or(0.0),
            },
        })
    }
}
