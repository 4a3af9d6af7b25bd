//! Seat-layout and SSR (ancillary service) lookups. Both are short-lived
//! supplier views, cached by TUI so repeated UI fetches don't re-hit the
//! supplier.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use farelink_core::error::SupplierError;
use farelink_store::cache::{ttl, CacheNamespace, ResultCache};

use crate::credentials::CredentialCache;
use crate::gateway::SupplierGateway;
use crate::wire::{
    as_f64_lenient, as_i64_lenient, PricerTrip, SeatLayoutRequest, SeatLayoutResponse,
    SeatLayoutTrip, SsrRequest, WireSeat,
};

#[derive(Debug, Clone)]
pub struct SeatLayoutQuery {
    pub tui: String,
    pub order_id: u32,
    pub amount: f64,
}

#[derive(Debug, Clone)]
pub struct SsrQuery {
    pub tui: String,
    pub flight_number: String,
    pub source: String,
    pub fare_type: String,
}

impl SsrQuery {
    pub fn new(tui: impl Into<String>, flight_number: impl Into<String>) -> Self {
        Self {
            tui: tui.into(),
            flight_number: flight_number.into(),
            source: "LV".to_string(),
            fare_type: "N".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeatMap {
    pub tui: String,
    pub flights: Vec<SeatMapFlight>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeatMapFlight {
    pub flight_number: String,
    pub airline_name: Option<String>,
    pub airline_unit: Option<String>,
    pub provider: Option<String>,
    pub rows: Vec<SeatRow>,
    pub legend: Vec<LegendEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeatRow {
    pub row_number: u32,
    pub seats: Vec<Seat>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Seat {
    pub number: String,
    pub status: Option<String>,
    pub seat_type: Option<String>,
    pub features: Vec<String>,
    pub available: Option<String>,
    pub fare: Option<f64>,
    pub tax: Option<f64>,
    pub total: Option<f64>,
    pub position_x: Option<i64>,
    pub position_y: Option<i64>,
    pub ssr_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub code: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SsrItem {
    pub id: Option<i64>,
    pub code: Option<String>,
    pub type_code: Option<String>,
    pub description: Option<String>,
    pub charge: Option<f64>,
    pub is_paid: bool,
}

/// Ancillaries grouped the way the selection UI consumes them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SsrCatalog {
    pub flight_number: String,
    pub meals: Vec<SsrItem>,
    pub baggage: Vec<SsrItem>,
    pub sports: Vec<SsrItem>,
    pub priority: Vec<SsrItem>,
    pub seats: Vec<SsrItem>,
    pub other: Vec<SsrItem>,
}

pub struct AncillaryService {
    gateway: Arc<dyn SupplierGateway>,
    credentials: CredentialCache,
    cache: ResultCache,
}

impl AncillaryService {
    pub fn new(
        gateway: Arc<dyn SupplierGateway>,
        credentials: CredentialCache,
        cache: ResultCache,
    ) -> Self {
        Self {
            gateway,
            credentials,
            cache,
        }
    }

    pub async fn seat_layout(&self, query: &SeatLayoutQuery) -> Result<SeatMap, SupplierError> {
        self.cache
            .get_or_set(
                CacheNamespace::SeatLayout,
                &query.tui,
                ttl::SEAT_LAYOUT,
                || async {
                    let credentials = self.credentials.get_credentials().await?;
                    let request = SeatLayoutRequest {
                        client_id: credentials.client_id.clone(),
                        source: "LV".to_string(),
                        trips: vec![SeatLayoutTrip {
                            tui: query.tui.clone(),
                            index: String::new(),
                            order_id: query.order_id,
                            amount: query.amount,
                        }],
                    };
                    let response = self
                        .gateway
                        .seat_layout(&credentials.token, &request)
                        .await?;
                    format_seat_layout(&query.tui, &response)
                },
            )
            .await
    }

    /// Free and paid SSR listings are fetched concurrently and merged into
    /// one categorized catalog for the requested flight.
    pub async fn ssr_catalog(&self, query: &SsrQuery) -> Result<SsrCatalog, SupplierError> {
        let cache_key = format!("{}:{}", query.tui, query.flight_number);
        self.cache
            .get_or_set(CacheNamespace::Ssr, &cache_key, ttl::SSR, || async {
                let credentials = self.credentials.get_credentials().await?;
                let base = SsrRequest {
                    client_id: credentials.client_id.clone(),
                    source: query.source.clone(),
                    fare_type: query.fare_type.clone(),
                    paid_ssr: false,
                    trips: vec![PricerTrip {
                        amount: 0.0,
                        index: String::new(),
                        order_id: 1,
                        tui: query.tui.clone(),
                    }],
                };
                let paid = SsrRequest {
                    paid_ssr: true,
                    trips: base.trips.clone(),
                    ..base.clone()
                };

                let (free_response, paid_response) = tokio::join!(
                    self.gateway.ssr_list(&credentials.token, &base),
                    self.gateway.ssr_list(&credentials.token, &paid),
                );

                let mut items = extract_flight_ssrs(&free_response?, &query.flight_number, false);
                items.extend(extract_flight_ssrs(
                    &paid_response?,
                    &query.flight_number,
                    true,
                ));
                Ok(categorize_ssrs(&query.flight_number, items))
            })
            .await
    }
}

fn format_seat_layout(
    tui: &str,
    response: &SeatLayoutResponse,
) -> Result<SeatMap, SupplierError> {
    if response.trips.is_empty() {
        return Err(SupplierError::Protocol("SeatLayout.Trips".to_string()));
    }

    let mut flights = Vec::new();
    for trip in &response.trips {
        for journey in &trip.journey {
            for segment in &journey.segments {
                // Group seats by row, then order rows numerically and seats
                // lexically within a row.
                let mut by_row: BTreeMap<u32, Vec<Seat>> = BTreeMap::new();
                for wire_seat in &segment.seats {
                    let row_number = row_of(&wire_seat.seat_number);
                    by_row
                        .entry(row_number)
                        .or_default()
                        .push(normalize_seat(wire_seat));
                }

                let rows = by_row
                    .into_iter()
                    .map(|(row_number, mut seats)| {
                        seats.sort_by(|a, b| a.number.cmp(&b.number));
                        SeatRow { row_number, seats }
                    })
                    .collect::<Vec<_>>();

                flights.push(SeatMapFlight {
                    flight_number: segment.flight_no.clone().unwrap_or_default(),
                    airline_name: segment.airline_name.clone(),
                    airline_unit: segment.airline_unit.clone(),
                    provider: journey.provider.clone(),
                    legend: build_legend(&segment.seats),
                    rows,
                });
            }
        }
    }

    Ok(SeatMap {
        tui: tui.to_string(),
        flights,
    })
}

fn normalize_seat(seat: &WireSeat) -> Seat {
    Seat {
        number: seat.seat_number.clone(),
        status: seat.seat_status.clone(),
        seat_type: seat.seat_type.clone(),
        features: seat
            .seat_info
            .as_deref()
            .map(|info| info.split('|').map(|f| f.trim().to_string()).collect())
            .unwrap_or_default(),
        available: seat.avail_status.clone(),
        fare: as_f64_lenient(&seat.fare),
        tax: as_f64_lenient(&seat.tax),
        total: as_f64_lenient(&seat.ssr_net_amount),
        position_x: as_i64_lenient(&seat.x_value),
        position_y: as_i64_lenient(&seat.y_value),
        ssr_code: match &seat.ssid {
            serde_json::Value::Null => None,
            value => Some(
                value
                    .as_str()
                    .map(String::from)
                    .unwrap_or_else(|| value.to_string()),
            ),
        },
    }
}

fn row_of(seat_number: &str) -> u32 {
    seat_number
        .chars()
        .filter(|c| c.is_ascii_digit())
        .collect::<String>()
        .parse()
        .unwrap_or(0)
}

fn build_legend(seats: &[WireSeat]) -> Vec<LegendEntry> {
    let mut codes = Vec::new();
    for seat in seats {
        if let Some(seat_type) = seat.seat_type.as_deref() {
            if !seat_type.is_empty() && !codes.iter().any(|c| c == seat_type) {
                codes.push(seat_type.to_string());
            }
        }
        if let Some(info) = seat.seat_info.as_deref() {
            for feature in info.split('|') {
                let feature = feature.trim();
                if !feature.is_empty() && !codes.iter().any(|c| c == feature) {
                    codes.push(feature.to_string());
                }
            }
        }
    }

    codes
        .into_iter()
        .map(|code| LegendEntry {
            description: describe_seat_type(&code).to_string(),
            code,
        })
        .collect()
}

fn describe_seat_type(code: &str) -> &str {
    match code {
        "PS" => "Preferred Seat",
        "PRS" => "Premium Seat",
        "FS" => "Free Seat",
        "EES" => "Emergency Exit Seat",
        "SS" => "Standard Seat",
        "SM" => "SpiceMax Seat",
        "WINDOW" => "Window Seat",
        "AISLE" => "Aisle Seat",
        "MIDDLE" => "Middle Seat",
        "ALL" => "Available for All Passengers",
        other => other,
    }
}

fn extract_flight_ssrs(
    response: &crate::wire::SsrResponse,
    flight_number: &str,
    is_paid: bool,
) -> Vec<SsrItem> {
    let mut items = Vec::new();
    for trip in &response.trips {
        for journey in &trip.journey {
            for segment in &journey.segments {
                let matches = segment
                    .flight_no
                    .as_deref()
                    .map(|f| f.trim() == flight_number.trim())
                    // Segments without a flight number apply to the whole journey.
                    .unwrap_or(true);
                if !matches {
                    continue;
                }
                for ssr in &segment.ssr {
                    items.push(SsrItem {
                        id: as_i64_lenient(&ssr.id),
                        code: ssr.code.clone(),
                        type_code: ssr.ssr_type.clone(),
                        description: ssr.description.clone(),
                        charge: as_f64_lenient(&ssr.charge),
                        is_paid,
                    });
                }
            }
        }
    }
    items
}

fn categorize_ssrs(flight_number: &str, items: Vec<SsrItem>) -> SsrCatalog {
    let mut catalog = SsrCatalog {
        flight_number: flight_number.to_string(),
        ..SsrCatalog::default()
    };

    for item in items {
        match item.type_code.as_deref() {
            Some("1") => catalog.meals.push(item),
            Some("2") => catalog.baggage.push(item),
            Some("3") => catalog.sports.push(item),
            Some("7") | Some("8") => catalog.priority.push(item),
            Some("9") => catalog.seats.push(item),
            _ => catalog.other.push(item),
        }
    }

    catalog
}
