use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TripType {
    #[serde(alias = "oneway")]
    OneWay,
    #[serde(alias = "roundtrip")]
    RoundTrip,
    #[serde(alias = "multicity")]
    MultiCity,
}

impl TripType {
    /// Supplier fare-type code for the express search payload.
    pub fn fare_type(self) -> &'static str {
        match self {
            TripType::OneWay => "ON",
            TripType::RoundTrip => "RT",
            TripType::MultiCity => "IM",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CabinClass {
    Economy,
    PremiumEconomy,
    Business,
    First,
}

impl CabinClass {
    pub fn code(self) -> &'static str {
        match self {
            CabinClass::Economy => "E",
            CabinClass::PremiumEconomy => "PE",
            CabinClass::Business => "B",
            CabinClass::First => "F",
        }
    }
}

/// Normalized trip parameters for a flight search. Immutable once submitted;
/// the cache fingerprint is derived from the normalized fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    #[serde(default = "default_trip_type")]
    pub trip_type: TripType,
    pub origin: String,
    pub destination: String,
    pub departure_date: Option<NaiveDate>,
    pub return_date: Option<NaiveDate>,
    #[serde(default = "default_adults")]
    pub adults: u32,
    #[serde(default)]
    pub children: u32,
    #[serde(default)]
    pub infants: u32,
    #[serde(default = "default_cabin")]
    pub cabin: CabinClass,
    #[serde(default)]
    pub preferred_airlines: Vec<String>,
    #[serde(default)]
    pub direct_only: bool,
    #[serde(default)]
    pub refundable_only: bool,
    #[serde(default)]
    pub student_fare: bool,
    #[serde(default)]
    pub nearby_airports: bool,
    #[serde(default)]
    pub extended_search: bool,
    #[serde(default)]
    pub multiple_carriers: bool,
    #[serde(default)]
    pub group_type: String,
}

fn default_trip_type() -> TripType {
    TripType::OneWay
}

fn default_adults() -> u32 {
    1
}

fn default_cabin() -> CabinClass {
    CabinClass::Economy
}

impl Default for SearchRequest {
    fn default() -> Self {
        Self {
            trip_type: TripType::OneWay,
            origin: String::new(),
            destination: String::new(),
            departure_date: None,
            return_date: None,
            adults: 1,
            children: 0,
            infants: 0,
            cabin: CabinClass::Economy,
            preferred_airlines: Vec::new(),
            direct_only: false,
            refundable_only: false,
            student_fare: false,
            nearby_airports: false,
            extended_search: false,
            multiple_carriers: false,
            group_type: String::new(),
        }
    }
}

impl SearchRequest {
    pub fn total_passengers(&self) -> u32 {
        self.adults + self.children + self.infants
    }

    /// Checks every rule and reports the full violation list. `today` is
    /// injected so date rules are deterministic under test.
    pub fn validate(&self, today: NaiveDate) -> Result<(), ValidationError> {
        let mut violations = Vec::new();

        if self.origin.trim().is_empty() {
            violations.push("Origin city is required".to_string());
        }
        if self.destination.trim().is_empty() {
            violations.push("Destination city is required".to_string());
        }

        match self.departure_date {
            None => violations.push("Departure date is required".to_string()),
            Some(depart) => {
                if depart < today {
                    violations.push("Departure date cannot be in the past".to_string());
                }
                if let Some(ret) = self.return_date {
                    if ret < depart {
                        violations
                            .push("Return date must be after departure date".to_string());
                    }
                }
            }
        }

        if self.trip_type == TripType::RoundTrip && self.return_date.is_none() {
            violations.push("Return date is required for round trips".to_string());
        }

        if self.adults < 1 {
            violations.push("At least one adult passenger is required".to_string());
        }
        if self.total_passengers() > 9 {
            violations.push("Maximum 9 passengers allowed per booking".to_string());
        }
        if self.infants > self.adults {
            violations.push("Number of infants cannot exceed number of adults".to_string());
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(violations))
        }
    }

    /// Stable cache key for this parameter set. Equal requests (modulo
    /// airline-code casing and airline order) fingerprint identically.
    pub fn fingerprint(&self) -> String {
        let mut airlines: Vec<String> = self
            .preferred_airlines
            .iter()
            .map(|a| a.trim().to_uppercase())
            .collect();
        airlines.sort();

        let normalized = serde_json::json!({
            "tripType": self.trip_type,
            "from": self.origin.trim().to_uppercase(),
            "to": self.destination.trim().to_uppercase(),
            "departDate": self.departure_date,
            "returnDate": self.return_date,
            "adults": self.adults,
            "children": self.children,
            "infants": self.infants,
            "cabin": self.cabin,
            "airlines": airlines.join(","),
            "directOnly": self.direct_only,
            "refundableOnly": self.refundable_only,
        });

        normalized.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 1).unwrap()
    }

    fn valid_request() -> SearchRequest {
        SearchRequest {
            origin: "DEL".to_string(),
            destination: "BOM".to_string(),
            departure_date: NaiveDate::from_ymd_opt(2026, 9, 1),
            ..SearchRequest::default()
        }
    }

    #[test]
    fn valid_request_passes() {
        assert!(valid_request().validate(today()).is_ok());
    }

    #[test]
    fn all_violations_are_reported_together() {
        let request = SearchRequest {
            adults: 0,
            infants: 2,
            ..SearchRequest::default()
        };

        let err = request.validate(today()).unwrap_err();
        assert!(err.violations.iter().any(|v| v.contains("Origin")));
        assert!(err.violations.iter().any(|v| v.contains("Destination")));
        assert!(err.violations.iter().any(|v| v.contains("Departure date is required")));
        assert!(err.violations.iter().any(|v| v.contains("adult")));
        assert!(err.violations.iter().any(|v| v.contains("infants")));
        assert!(err.violations.len() >= 5);
    }

    #[test]
    fn infants_exceeding_adults_is_rejected() {
        let request = SearchRequest {
            adults: 1,
            infants: 2,
            ..valid_request()
        };

        let err = request.validate(today()).unwrap_err();
        assert!(err
            .violations
            .iter()
            .any(|v| v.contains("infants cannot exceed")));
    }

    #[test]
    fn past_departure_date_is_rejected() {
        let request = SearchRequest {
            departure_date: NaiveDate::from_ymd_opt(2026, 7, 31),
            ..valid_request()
        };

        let err = request.validate(today()).unwrap_err();
        assert_eq!(err.violations.len(), 1);
        assert!(err.violations[0].contains("past"));
    }

    #[test]
    fn round_trip_requires_return_after_departure() {
        let missing_return = SearchRequest {
            trip_type: TripType::RoundTrip,
            ..valid_request()
        };
        let err = missing_return.validate(today()).unwrap_err();
        assert!(err.violations.iter().any(|v| v.contains("Return date is required")));

        let inverted = SearchRequest {
            trip_type: TripType::RoundTrip,
            return_date: NaiveDate::from_ymd_opt(2026, 8, 20),
            ..valid_request()
        };
        let err = inverted.validate(today()).unwrap_err();
        assert!(err.violations.iter().any(|v| v.contains("after departure")));
    }

    #[test]
    fn more_than_nine_passengers_is_rejected() {
        let request = SearchRequest {
            adults: 5,
            children: 5,
            ..valid_request()
        };

        let err = request.validate(today()).unwrap_err();
        assert!(err.violations.iter().any(|v| v.contains("Maximum 9")));
    }

    #[test]
    fn fingerprint_normalizes_case_and_airline_order() {
        let a = SearchRequest {
            origin: "del".to_string(),
            destination: "bom".to_string(),
            preferred_airlines: vec!["6E".to_string(), "AI".to_string()],
            ..valid_request()
        };
        let b = SearchRequest {
            origin: "DEL".to_string(),
            destination: "BOM".to_string(),
            preferred_airlines: vec!["ai".to_string(), "6e".to_string()],
            ..valid_request()
        };

        assert_eq!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn fingerprint_differs_by_date() {
        let a = valid_request();
        let b = SearchRequest {
            departure_date: NaiveDate::from_ymd_opt(2026, 9, 2),
            ..valid_request()
        };

        assert_ne!(a.fingerprint(), b.fingerprint());
    }
}
