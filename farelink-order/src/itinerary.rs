use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info};
use uuid::Uuid;

use farelink_benzy::wire::{
    ContactInfoPayload, CreateItineraryRequest, CreateItineraryResponse, TravellerPayload,
};
use farelink_core::booking::{
    generate_booking_reference, Booking, BookingPaymentStatus, BookingStatus, ContactInfo,
    FlightLeg, Passenger, PricingBreakdown, TravelDocument,
};
use farelink_core::error::{BookingError, StoreError, ValidationError};
use farelink_core::offer::{
    Airline, AirportInfo, Availability, FareBreakdown, FlightOffer, Inclusions, OfferGrouping,
    RouteEndpoint, StoredFlight,
};

use crate::service::BookingService;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItineraryRequest {
    pub tui: String,
    pub contact: ContactInfoPayload,
    pub travellers: Vec<TravellerPayload>,
    pub net_amount: f64,
    #[serde(default)]
    pub ssr: Vec<Value>,
    #[serde(default)]
    pub cross_sell: Vec<Value>,
    #[serde(default)]
    pub plp: Vec<Value>,
    #[serde(default)]
    pub ssr_amount: f64,
    #[serde(default)]
    pub cross_sell_amount: f64,
    #[serde(default)]
    pub device_id: String,
    #[serde(default)]
    pub app_version: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ItineraryOutcome {
    pub booking_id: Uuid,
    pub booking_reference: String,
    pub transaction_id: String,
    pub tui: Option<String>,
    pub status: BookingStatus,
}

impl BookingService {
    /// Creates the supplier itinerary, persists the bookable flight detail,
    /// and opens a booking in `Initiated`.
    pub async fn create_itinerary(
        &self,
        request: &ItineraryRequest,
    ) -> Result<ItineraryOutcome, BookingError> {
        validate_itinerary_request(request)?;

        let credentials = self.credentials.get_credentials().await?;

        let payload = CreateItineraryRequest {
            tui: request.tui.clone(),
            client_id: credentials.client_id.clone(),
            contact_info: request.contact.clone(),
            travellers: request.travellers.clone(),
            net_amount: request.net_amount,
            ssr: request.ssr.clone(),
            cross_sell: request.cross_sell.clone(),
            plp: request.plp.clone(),
            ssr_amount: request.ssr_amount,
            cross_sell_amount: request.cross_sell_amount,
            device_id: request.device_id.clone(),
            app_version: request.app_version.clone(),
        };

        let response = self
            .gateway
            .create_itinerary(&credentials.token, &payload)
            .await?;

        // Flight persistence failures are logged, not propagated, but the
        // booking flow cannot continue without a bookable flight record.
        let saved_flight = self.save_flight_details(&response).await;
        let saved_flight = saved_flight.ok_or_else(|| {
            StoreError::Backend("flight details were not persisted".to_string())
        })?;

        let now = Utc::now();
        let booking_reference = generate_booking_reference(now);
        let transaction_id = response.transaction_id.to_string();

        let booking = Booking {
            id: Uuid::new_v4(),
            booking_reference: booking_reference.clone(),
            transaction_id: transaction_id.clone(),
            status: BookingStatus::Initiated,
            flights: vec![flight_leg(&saved_flight, &request.tui)],
            passengers: request.travellers.iter().map(passenger_from).collect(),
            contact: contact_from(&request.contact),
            pricing: PricingBreakdown {
                currency: saved_flight.offer.fare.currency.clone(),
                total_amount: saved_flight.offer.fare.gross,
                base_fare: saved_flight.offer.fare.net,
            },
            payment_status: BookingPaymentStatus::Pending,
            created_at: now,
            updated_at: now,
        };

        self.bookings.create(&booking).await?;
        info!(reference = %booking_reference, %transaction_id, "booking created");

        Ok(ItineraryOutcome {
            booking_id: booking.id,
            booking_reference,
            transaction_id,
            tui: response.tui.clone(),
            status: booking.status,
        })
    }

    async fn save_flight_details(&self, response: &CreateItineraryResponse) -> Option<StoredFlight> {
        let offer = match offer_from_itinerary(response) {
            Some(offer) => offer,
            None => {
                error!("itinerary response carried no usable flight segment");
                return None;
            }
        };

        let flight = StoredFlight {
            id: Uuid::new_v4(),
            offer,
            created_at: Utc::now(),
        };

        match self.flights.create(&flight).await {
            Ok(id) => {
                info!(flight_id = %id, "flight details saved");
                Some(flight)
            }
            Err(e) => {
                error!(error = %e, "failed to save flight details");
                None
            }
        }
    }
}

/// Lifts the first segment of the confirmed itinerary into the canonical
/// offer shape used for flight persistence.
fn offer_from_itinerary(response: &CreateItineraryResponse) -> Option<FlightOffer> {
    use farelink_benzy::wire::{as_f64_lenient, as_i64_lenient};

    let journey = response.trips.first()?.journey.first()?;
    let segment = journey.segments.first()?;
    let flight = segment.flight.as_ref()?;

    let flight_number = flight.flight_no.as_deref()?.trim().to_string();
    let (airline_name, _) = match flight.airline.as_deref() {
        Some(raw) => {
            let mut parts = raw.splitn(2, '|');
            (
                parts.next().map(|p| p.trim().to_string()),
                parts.next().map(|p| p.trim().to_string()),
            )
        }
        None => (None, None),
    };
    let airline_code = flight
        .validating_carrier
        .clone()
        .or_else(|| airline_name.clone())?;

    let departure_time = flight
        .departure_time
        .as_deref()
        .and_then(parse_itinerary_time)?;
    let arrival_time = flight
        .arrival_time
        .as_deref()
        .and_then(parse_itinerary_time)?;

    Some(FlightOffer {
        flight_number,
        provider: journey.provider.clone(),
        airline: Airline {
            code: airline_code,
            name: airline_name,
            marketing_carrier: flight.marketing_carrier.clone(),
            operating_carrier: flight.operating_carrier.clone(),
        },
        departure: RouteEndpoint {
            airport: AirportInfo {
                code: flight.departure_code.clone()?,
                name: flight.departure_airport_name.clone(),
                location: None,
            },
            terminal: flight.departure_terminal.clone(),
            scheduled_time: departure_time,
        },
        arrival: RouteEndpoint {
            airport: AirportInfo {
                code: flight.arrival_code.clone()?,
                name: flight.arrival_airport_name.clone(),
                location: None,
            },
            terminal: flight.arrival_terminal.clone(),
            scheduled_time: arrival_time,
        },
        duration: flight.duration.clone(),
        stops: as_i64_lenient(&journey.stops).unwrap_or(0).max(0) as u32,
        connections: Vec::new(),
        aircraft: flight.aircraft.clone().or_else(|| flight.equipment_type.clone()),
        fare_class: flight.fare_basis_code.clone(),
        cabin: flight.cabin.clone(),
        fare: FareBreakdown {
            currency: response
                .currency_code
                .clone()
                .unwrap_or_else(|| "INR".to_string()),
            gross: as_f64_lenient(&response.gross_amount).unwrap_or(0.0),
            net: as_f64_lenient(&response.net_amount).unwrap_or(0.0),
            commission: None,
        },
        availability: Availability {
            seats: None,
            refundable: flight.refundable.as_deref() == Some("Y"),
        },
        inclusions: Inclusions {
            baggage: response
                .ssr
                .iter()
                .find(|ssr| ssr.code.as_deref() == Some("BAG"))
                .and_then(|ssr| ssr.description.clone()),
            meals: None,
            piece_description: None,
        },
        grouping: OfferGrouping::default(),
    })
}

fn parse_itinerary_time(raw: &str) -> Option<chrono::NaiveDateTime> {
    let trimmed = raw.trim();
    chrono::NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| chrono::NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S"))
        .ok()
}

fn validate_itinerary_request(request: &ItineraryRequest) -> Result<(), ValidationError> {
    let mut violations = Vec::new();

    if request.tui.trim().is_empty() {
        violations.push("Transaction Unique Identifier is required".to_string());
    }

    let contact_fields = [
        (&request.contact.first_name, "Contact first name is required"),
        (&request.contact.last_name, "Contact last name is required"),
        (&request.contact.mobile, "Contact mobile number is required"),
        (&request.contact.email, "Contact email is required"),
        (&request.contact.address, "Contact address is required"),
        (&request.contact.country_code, "Country code is required"),
        (&request.contact.state, "State is required"),
        (&request.contact.city, "City is required"),
        (&request.contact.pin, "PIN code is required"),
    ];
    for (value, message) in contact_fields {
        if value.trim().is_empty() {
            violations.push(message.to_string());
        }
    }

    if request.net_amount <= 0.0 {
        violations.push("Net amount is required".to_string());
    }

    if request.travellers.is_empty() {
        violations.push("Traveller information is required".to_string());
    }
    for (index, traveller) in request.travellers.iter().enumerate() {
        let ordinal = index + 1;
        if traveller.id == 0 {
            violations.push(format!("Traveller ID is required for traveller {ordinal}"));
        }
        let traveller_fields = [
            (&traveller.title, "Title"),
            (&traveller.first_name, "First name"),
            (&traveller.last_name, "Last name"),
            (&traveller.gender, "Gender"),
            (&traveller.pax_type, "Passenger type"),
        ];
        for (value, name) in traveller_fields {
            if value.trim().is_empty() {
                violations.push(format!("{name} is required for traveller {ordinal}"));
            }
        }
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::new(violations))
    }
}

fn flight_leg(flight: &StoredFlight, tui: &str) -> FlightLeg {
    FlightLeg {
        flight_id: Some(flight.id),
        flight_number: flight.offer.flight_number.clone(),
        tui: tui.to_string(),
        provider_code: flight.offer.provider.clone(),
        provider_pnr: None,
        departure_airport: flight.offer.departure.airport.code.clone(),
        departure_terminal: flight.offer.departure.terminal.clone(),
        departure_time: Some(flight.offer.departure.scheduled_time),
        arrival_airport: flight.offer.arrival.airport.code.clone(),
        arrival_terminal: flight.offer.arrival.terminal.clone(),
        arrival_time: Some(flight.offer.arrival.scheduled_time),
        cabin: flight.offer.cabin.clone(),
    }
}

fn passenger_from(traveller: &TravellerPayload) -> Passenger {
    Passenger {
        pax_type: traveller.pax_type.clone(),
        title: traveller.title.to_uppercase(),
        first_name: traveller.first_name.clone(),
        last_name: traveller.last_name.clone(),
        date_of_birth: traveller
            .date_of_birth
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok()),
        nationality: traveller.nationality.clone(),
        documents: traveller
            .passport_no
            .as_ref()
            .map(|number| {
                vec![TravelDocument {
                    document_type: "PASSPORT".to_string(),
                    number: number.clone(),
                    issuing_country: traveller.nationality.clone(),
                    expiry_date: traveller
                        .passport_expiry
                        .as_deref()
                        .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok()),
                }]
            })
            .unwrap_or_default(),
    }
}

fn contact_from(contact: &ContactInfoPayload) -> ContactInfo {
    ContactInfo {
        first_name: contact.first_name.clone(),
        last_name: contact.last_name.clone(),
        email: contact.email.clone(),
        mobile: contact.mobile.clone(),
        alternate_phone: contact.phone.clone(),
        address: contact.address.clone(),
        city: contact.city.clone(),
        state: contact.state.clone(),
        country_code: contact.country_code.clone(),
        postal_code: contact.pin.clone(),
    }
}
