use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use farelink_core::error::{SearchError, SupplierError};
use farelink_core::offer::{
    Airline, AirportInfo, Availability, Connection, FareBreakdown, FlightOffer, Inclusions,
    OfferGrouping, RouteEndpoint,
};
use farelink_core::search::SearchRequest;
use farelink_store::cache::{ttl, CacheNamespace, ResultCache};

use crate::clock::Clock;
use crate::credentials::{CredentialCache, Credentials};
use crate::gateway::SupplierGateway;
use crate::wire::{
    as_f64_lenient, clean_token, ExpressSearchRequest, JourneyFlight, SearchParameters,
    SearchPollRequest, SearchPollResponse, SearchTrip,
};

/// Polling behavior for the semi-synchronous search protocol.
#[derive(Debug, Clone)]
pub struct PollConfig {
    pub initial_interval: Duration,
    pub max_interval: Duration,
    pub backoff_factor: f64,
    pub error_backoff_factor: f64,
    pub max_error_attempts: u32,
    pub deadline: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            initial_interval: Duration::from_secs(1),
            max_interval: Duration::from_secs(5),
            backoff_factor: 1.5,
            error_backoff_factor: 2.0,
            max_error_attempts: 3,
            deadline: Duration::from_secs(48),
        }
    }
}

#[derive(Debug)]
pub struct SearchOutcome {
    pub offers: Vec<FlightOffer>,
    pub tui: String,
    pub from_cache: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct CachedSearch {
    tui: String,
    offers: Vec<FlightOffer>,
}

/// Drives one search end to end: validate, submit, poll with adaptive
/// backoff under a hard wall-clock deadline, normalize. Polls within a
/// session are issued strictly one at a time; the loop stops the moment the
/// deadline passes, even mid-backoff.
pub struct SearchOrchestrator {
    gateway: Arc<dyn SupplierGateway>,
    credentials: CredentialCache,
    cache: ResultCache,
    clock: Arc<dyn Clock>,
    config: PollConfig,
}

impl SearchOrchestrator {
    pub fn new(
        gateway: Arc<dyn SupplierGateway>,
        credentials: CredentialCache,
        cache: ResultCache,
        clock: Arc<dyn Clock>,
        config: PollConfig,
    ) -> Self {
        Self {
            gateway,
            credentials,
            cache,
            clock,
            config,
        }
    }

    pub async fn initiate_search(
        &self,
        request: &SearchRequest,
    ) -> Result<SearchOutcome, SearchError> {
        request.validate(Utc::now().date_naive())?;

        let fingerprint = request.fingerprint();
        if let Some(cached) = self
            .cache
            .get::<CachedSearch>(CacheNamespace::Search, &fingerprint)
            .await
        {
            return Ok(SearchOutcome {
                offers: cached.offers,
                tui: cached.tui,
                from_cache: true,
            });
        }

        let credentials = self.credentials.get_credentials().await?;
        let payload = build_express_search(request, &credentials);

        info!(
            origin = %request.origin,
            destination = %request.destination,
            "initiating flight search"
        );

        let ack = self
            .gateway
            .express_search(&credentials.token, &payload)
            .await?;
        let tui = ack
            .tui
            .as_deref()
            .map(clean_token)
            .filter(|t| !t.is_empty())
            .ok_or(SupplierError::Protocol("TUI".to_string()))?;

        info!(%tui, "search submitted, polling for results");

        let completed = self.poll_until_complete(&credentials, &tui).await?;
        let offers = normalize_offers(&completed)?;

        self.cache
            .set(
                CacheNamespace::Search,
                &fingerprint,
                &CachedSearch {
                    tui: tui.clone(),
                    offers: offers.clone(),
                },
                ttl::SEARCH_RESULTS,
            )
            .await;

        Ok(SearchOutcome {
            offers,
            tui,
            from_cache: false,
        })
    }

    async fn poll_until_complete(
        &self,
        credentials: &Credentials,
        tui: &str,
    ) -> Result<SearchPollResponse, SearchError> {
        let request = SearchPollRequest {
            client_id: credentials.client_id.clone(),
            tui: tui.to_string(),
        };

        let deadline = self.clock.now() + self.config.deadline;
        let mut interval = self.config.initial_interval;
        let mut error_attempts = 0u32;

        loop {
            if self.clock.now() >= deadline {
                return Err(SearchError::DeadlineExceeded(self.config.deadline));
            }

            match self.gateway.poll_search(&credentials.token, &request).await {
                Ok(response) if response.is_completed() => {
                    info!(%tui, "search completed");
                    return Ok(response);
                }
                Ok(_) => {
                    interval = grow(interval, self.config.backoff_factor, self.config.max_interval);
                }
                Err(e) => {
                    error_attempts += 1;
                    warn!(%tui, attempt = error_attempts, error = %e, "search poll failed");
                    if error_attempts >= self.config.max_error_attempts {
                        return Err(SearchError::PollRetriesExhausted {
                            attempts: error_attempts,
                            last: e,
                        });
                    }
                    interval = grow(
                        interval,
                        self.config.error_backoff_factor,
                        self.config.max_interval,
                    );
                }
            }

            let now = self.clock.now();
            if now >= deadline {
                return Err(SearchError::DeadlineExceeded(self.config.deadline));
            }
            let remaining = deadline - now;
            self.clock.sleep(interval.min(remaining)).await;
        }
    }
}

fn grow(interval: Duration, factor: f64, cap: Duration) -> Duration {
    interval.mul_f64(factor).min(cap)
}

fn build_express_search(request: &SearchRequest, credentials: &Credentials) -> ExpressSearchRequest {
    let airlines: Vec<String> = request
        .preferred_airlines
        .iter()
        .map(|a| a.trim().to_uppercase())
        .collect();

    ExpressSearchRequest {
        fare_type: request.trip_type.fare_type().to_string(),
        adults: request.adults,
        children: request.children,
        infants: request.infants,
        cabin: request.cabin.code().to_string(),
        source: "CF".to_string(),
        mode: "AS".to_string(),
        client_id: credentials.client_id.clone(),
        is_multiple_carrier: request.multiple_carriers,
        is_refundable: request.refundable_only,
        preferred_airlines: if airlines.is_empty() {
            None
        } else {
            Some(airlines.clone())
        },
        tui: String::new(),
        sec_type: String::new(),
        trips: vec![SearchTrip {
            from: request.origin.trim().to_uppercase(),
            to: request.destination.trim().to_uppercase(),
            onward_date: request
                .departure_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            return_date: request
                .return_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            tui: String::new(),
        }],
        parameters: SearchParameters {
            airlines: airlines.join(","),
            group_type: request.group_type.clone(),
            refundable: if request.refundable_only { "Y" } else { "N" }.to_string(),
            is_direct: request.direct_only,
            is_student_fare: request.student_fare,
            is_nearby_airport: request.nearby_airports,
            is_extended_search: request.extended_search,
        },
    }
}

/// Flattens the completed payload into canonical offers, preserving the
/// supplier's ordering.
fn normalize_offers(response: &SearchPollResponse) -> Result<Vec<FlightOffer>, SearchError> {
    let currency = response
        .currency_code
        .clone()
        .unwrap_or_else(|| "INR".to_string());

    let mut offers = Vec::new();
    for trip in &response.trips {
        for flight in &trip.journey {
            offers.push(normalize_flight(flight, &currency)?);
        }
    }
    Ok(offers)
}

fn normalize_flight(flight: &JourneyFlight, currency: &str) -> Result<FlightOffer, SearchError> {
    let flight_number = required_text(&flight.flight_no, "Journey.FlightNo")?;
    let airline_code = required_text(&flight.validating_carrier, "Journey.VAC")?;
    let from = required_text(&flight.from, "Journey.From")?;
    let to = required_text(&flight.to, "Journey.To")?;

    let (airline_name, _) = split_piped(flight.airline_name.as_deref());
    let (from_name, from_location) = split_piped(flight.from_name.as_deref());
    let (to_name, to_location) = split_piped(flight.to_name.as_deref());

    Ok(FlightOffer {
        flight_number: flight_number.trim().to_string(),
        provider: flight.provider.clone(),
        airline: Airline {
            code: airline_code,
            name: airline_name,
            marketing_carrier: flight.marketing_carrier.clone(),
            operating_carrier: flight.operating_carrier.clone(),
        },
        departure: RouteEndpoint {
            airport: AirportInfo {
                code: from,
                name: from_name,
                location: from_location,
            },
            terminal: flight.departure_terminal.clone(),
            scheduled_time: parse_supplier_time(&flight.departure_time, "Journey.DepartureTime")?,
        },
        arrival: RouteEndpoint {
            airport: AirportInfo {
                code: to,
                name: to_name,
                location: to_location,
            },
            terminal: flight.arrival_terminal.clone(),
            scheduled_time: parse_supplier_time(&flight.arrival_time, "Journey.ArrivalTime")?,
        },
        duration: flight.duration.as_deref().map(|d| d.trim().to_string()),
        stops: flight.stops.unwrap_or(0),
        connections: flight
            .connections
            .iter()
            .map(|conn| {
                let (name, location) = split_piped(conn.arr_airport_name.as_deref());
                Connection {
                    airport: AirportInfo {
                        code: conn.airport.clone().unwrap_or_default(),
                        name,
                        location,
                    },
                    duration: conn.duration.as_deref().map(|d| d.trim().to_string()),
                    connection_type: conn.connection_type.clone(),
                }
            })
            .collect(),
        aircraft: flight.aircraft.clone(),
        fare_class: flight.fare_class.clone(),
        cabin: flight.cabin.clone(),
        fare: FareBreakdown {
            currency: currency.to_string(),
            gross: as_f64_lenient(&flight.gross_fare)
                .ok_or_else(|| SupplierError::Protocol("Journey.GrossFare".to_string()))?,
            net: as_f64_lenient(&flight.net_fare)
                .ok_or_else(|| SupplierError::Protocol("Journey.NetFare".to_string()))?,
            commission: as_f64_lenient(&flight.total_commission),
        },
        availability: Availability {
            seats: match &flight.seats {
                serde_json::Value::Null => None,
                value => Some(
                    value
                        .as_str()
                        .map(String::from)
                        .unwrap_or_else(|| value.to_string()),
                ),
            },
            refundable: flight.refundable.as_deref() == Some("Y"),
        },
        inclusions: flight
            .inclusions
            .as_ref()
            .map(|inc| Inclusions {
                baggage: inc.baggage.clone(),
                meals: inc.meals.clone(),
                piece_description: inc.piece_description.clone(),
            })
            .unwrap_or_default(),
        grouping: OfferGrouping {
            index: flight.index.clone(),
            journey_key: flight.journey_key.clone(),
            return_identifier: flight.return_identifier,
            group_count: flight.group_count,
        },
    })
}

fn required_text(value: &Option<String>, field: &str) -> Result<String, SupplierError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
        .ok_or_else(|| SupplierError::Protocol(field.to_string()))
}

/// Supplier name fields pack "Display Name|Location".
fn split_piped(value: Option<&str>) -> (Option<String>, Option<String>) {
    match value {
        Some(raw) => {
            let mut parts = raw.splitn(2, '|');
            let name = parts.next().map(|p| p.trim().to_string()).filter(|p| !p.is_empty());
            let location = parts.next().map(|p| p.trim().to_string()).filter(|p| !p.is_empty());
            (name, location)
        }
        None => (None, None),
    }
}

fn parse_supplier_time(
    value: &Option<String>,
    field: &str,
) -> Result<NaiveDateTime, SupplierError> {
    let raw = value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| SupplierError::Protocol(field.to_string()))?;

    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S"))
        .map_err(|_| SupplierError::Protocol(format!("{field}: unparseable time {raw:?}")))
}
