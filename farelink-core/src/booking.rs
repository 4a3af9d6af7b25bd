use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Initiated,
    PendingPayment,
    Confirmed,
    Cancelled,
    Refunded,
}

impl BookingStatus {
    /// Transitions are forward-only; `Cancelled` and `Refunded` are terminal.
    pub fn can_transition_to(self, next: BookingStatus) -> bool {
        use BookingStatus::*;
        matches!(
            (self, next),
            (Initiated, PendingPayment)
                | (Initiated, Cancelled)
                | (PendingPayment, Confirmed)
                | (PendingPayment, Cancelled)
                | (Confirmed, Refunded)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BookingStatus::Initiated => "INITIATED",
            BookingStatus::PendingPayment => "PENDING_PAYMENT",
            BookingStatus::Confirmed => "CONFIRMED",
            BookingStatus::Cancelled => "CANCELLED",
            BookingStatus::Refunded => "REFUNDED",
        }
    }
}

/// Payment progress mirrored on the booking aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingPaymentStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl BookingPaymentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            BookingPaymentStatus::Pending => "PENDING",
            BookingPaymentStatus::Processing => "PROCESSING",
            BookingPaymentStatus::Completed => "COMPLETED",
            BookingPaymentStatus::Failed => "FAILED",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightLeg {
    pub flight_id: Option<Uuid>,
    pub flight_number: String,
    pub tui: String,
    pub provider_code: Option<String>,
    /// Airline booking reference, attached once the payment callback
    /// delivers it.
    pub provider_pnr: Option<String>,
    pub departure_airport: String,
    pub departure_terminal: Option<String>,
    pub departure_time: Option<NaiveDateTime>,
    pub arrival_airport: String,
    pub arrival_terminal: Option<String>,
    pub arrival_time: Option<NaiveDateTime>,
    pub cabin: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TravelDocument {
    pub document_type: String,
    pub number: String,
    pub issuing_country: Option<String>,
    pub expiry_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Passenger {
    pub pax_type: String,
    pub title: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub nationality: Option<String>,
    #[serde(default)]
    pub documents: Vec<TravelDocument>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactInfo {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub mobile: String,
    pub alternate_phone: Option<String>,
    pub address: String,
    pub city: String,
    pub state: String,
    pub country_code: String,
    pub postal_code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingBreakdown {
    pub currency: String,
    pub total_amount: f64,
    pub base_fare: f64,
}

/// Aggregate root for a reservation. Created at itinerary-creation time and
/// advanced by payment initiation and gateway callbacks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub booking_reference: String,
    pub transaction_id: String,
    pub status: BookingStatus,
    pub flights: Vec<FlightLeg>,
    pub passengers: Vec<Passenger>,
    pub contact: ContactInfo,
    pub pricing: PricingBreakdown,
    pub payment_status: BookingPaymentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

const REFERENCE_PREFIX: &str = "FB";
const REFERENCE_SUFFIX_LEN: usize = 3;
const REFERENCE_CHARSET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Generates a booking reference: `FB` + base36 millisecond timestamp +
/// three random alphanumerics, all uppercase.
pub fn generate_booking_reference(now: DateTime<Utc>) -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..REFERENCE_SUFFIX_LEN)
        .map(|_| {
            let idx = rng.gen_range(0..REFERENCE_CHARSET.len());
            REFERENCE_CHARSET[idx] as char
        })
        .collect();

    format!(
        "{}{}{}",
        REFERENCE_PREFIX,
        encode_base36(now.timestamp_millis() as u64),
        suffix
    )
}

fn encode_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }

    let mut digits = Vec::new();
    while value > 0 {
        digits.push(REFERENCE_CHARSET[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    String::from_utf8(digits).expect("base36 digits are ascii")
}
