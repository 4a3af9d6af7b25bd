use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Airline {
    pub code: String,
    pub name: Option<String>,
    pub marketing_carrier: Option<String>,
    pub operating_carrier: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirportInfo {
    pub code: String,
    pub name: Option<String>,
    pub location: Option<String>,
}

/// One end of a flight leg. Times are kept as the supplier's local wall-clock
/// values; no timezone conversion is applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteEndpoint {
    pub airport: AirportInfo,
    pub terminal: Option<String>,
    pub scheduled_time: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub airport: AirportInfo,
    pub duration: Option<String>,
    pub connection_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FareBreakdown {
    pub currency: String,
    pub gross: f64,
    pub net: f64,
    pub commission: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Availability {
    pub seats: Option<String>,
    pub refundable: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Inclusions {
    pub baggage: Option<String>,
    pub meals: Option<String>,
    pub piece_description: Option<String>,
}

/// Supplier-side indices used to reference this offer in follow-up calls
/// (pricing, itinerary creation).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OfferGrouping {
    pub index: Option<String>,
    pub journey_key: Option<String>,
    pub return_identifier: Option<i64>,
    pub group_count: Option<i64>,
}

/// Canonical normalized representation of one priced itinerary leg.
/// Derived from the raw supplier payload and never mutated afterwards;
/// result-set order is the supplier's response order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightOffer {
    pub flight_number: String,
    pub provider: Option<String>,
    pub airline: Airline,
    pub departure: RouteEndpoint,
    pub arrival: RouteEndpoint,
    pub duration: Option<String>,
    pub stops: u32,
    pub connections: Vec<Connection>,
    pub aircraft: Option<String>,
    pub fare_class: Option<String>,
    pub cabin: Option<String>,
    pub fare: FareBreakdown,
    pub availability: Availability,
    pub inclusions: Inclusions,
    pub grouping: OfferGrouping,
}

/// A flight offer persisted at itinerary-creation time, keyed for later
/// lookup by the booking flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredFlight {
    pub id: Uuid,
    pub offer: FlightOffer,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample_offer() -> FlightOffer {
        FlightOffer {
            flight_number: "6E 2112".to_string(),
            provider: Some("6E".to_string()),
            airline: Airline {
                code: "6E".to_string(),
                name: Some("IndiGo".to_string()),
                marketing_carrier: Some("6E".to_string()),
                operating_carrier: Some("6E".to_string()),
            },
            departure: RouteEndpoint {
                airport: AirportInfo {
                    code: "DEL".to_string(),
                    name: Some("Indira Gandhi International".to_string()),
                    location: Some("New Delhi".to_string()),
                },
                terminal: Some("T3".to_string()),
                scheduled_time: NaiveDate::from_ymd_opt(2026, 9, 1)
                    .unwrap()
                    .and_hms_opt(6, 15, 0)
                    .unwrap(),
            },
            arrival: RouteEndpoint {
                airport: AirportInfo {
                    code: "BOM".to_string(),
                    name: Some("Chhatrapati Shivaji".to_string()),
                    location: Some("Mumbai".to_string()),
                },
                terminal: Some("T2".to_string()),
                scheduled_time: NaiveDate::from_ymd_opt(2026, 9, 1)
                    .unwrap()
                    .and_hms_opt(8, 25, 0)
                    .unwrap(),
            },
            duration: Some("02h 10m".to_string()),
            stops: 0,
            connections: Vec::new(),
            aircraft: Some("A321".to_string()),
            fare_class: Some("R".to_string()),
            cabin: Some("E".to_string()),
            fare: FareBreakdown {
                currency: "INR".to_string(),
                gross: 5899.0,
                net: 5623.5,
                commission: Some(120.0),
            },
            availability: Availability {
                seats: Some("9".to_string()),
                refundable: true,
            },
            inclusions: Inclusions {
                baggage: Some("15 Kg".to_string()),
                meals: None,
                piece_description: None,
            },
            grouping: OfferGrouping {
                index: Some("1_0".to_string()),
                journey_key: Some("DEL-BOM-0615".to_string()),
                return_identifier: Some(0),
                group_count: Some(1),
            },
        }
    }

    #[test]
    fn offer_survives_persistence_round_trip() {
        let offer = sample_offer();

        let json = serde_json::to_string(&offer).unwrap();
        let restored: FlightOffer = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.airline.code, offer.airline.code);
        assert_eq!(
            restored.departure.scheduled_time,
            offer.departure.scheduled_time
        );
        assert_eq!(restored.arrival.scheduled_time, offer.arrival.scheduled_time);
        assert_eq!(restored.fare.gross, offer.fare.gross);
        assert_eq!(restored.fare.net, offer.fare.net);
        assert_eq!(restored, offer);
    }
}
