use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// The supplier repriced the selected offer between lock and fetch. This is a
/// normal result variant, not a failure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceChange {
    pub previous_amount: f64,
    pub new_amount: f64,
}

/// One flattened segment of the priced itinerary. Multi-leg journeys keep
/// every segment, in supplier order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricedSegment {
    pub flight_number: Option<String>,
    pub airline: Option<String>,
    pub aircraft: Option<String>,
    pub provider: Option<String>,
    pub duration: Option<String>,
    pub stops: u32,
    pub departure_code: Option<String>,
    pub departure_terminal: Option<String>,
    pub departure_time: Option<NaiveDateTime>,
    pub arrival_code: Option<String>,
    pub arrival_terminal: Option<String>,
    pub arrival_time: Option<NaiveDateTime>,
    pub base_fare: Option<f64>,
    pub taxes: Option<f64>,
    pub gross_fare: Option<f64>,
}

/// Result of the lock-then-fetch live pricing protocol. Each call produces a
/// fresh result; earlier ones are superseded, never merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingResult {
    pub tui: String,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub onward_date: Option<String>,
    pub return_date: Option<String>,
    pub adults: u32,
    pub children: u32,
    pub infants: u32,
    pub currency: String,
    pub net_amount: f64,
    pub gross_amount: f64,
    pub segments: Vec<PricedSegment>,
    pub price_change: Option<PriceChange>,
}

impl PricingResult {
    pub fn has_price_changed(&self) -> bool {
        self.price_change.is_some()
    }
}
