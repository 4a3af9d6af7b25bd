use std::sync::Arc;

use tracing::info;

use farelink_core::error::{PricingError, SupplierError, ValidationError};
use farelink_core::pricing::{PriceChange, PricedSegment, PricingResult};
use farelink_core::search::TripType;

use farelink_store::cache::{ttl, CacheNamespace, ResultCache};

use crate::credentials::CredentialCache;
use crate::gateway::SupplierGateway;
use crate::wire::{
    as_f64_lenient, as_i64_lenient, clean_token, GetPricerRequest, GetPricerResponse, PricerTrip,
    SmartPricerRequest, CODE_PRICE_CHANGED,
};

use chrono::NaiveDateTime;

/// Parameters for repricing one selected offer.
#[derive(Debug, Clone)]
pub struct LivePriceQuery {
    pub amount: f64,
    pub offer_index: String,
    pub trip_type: TripType,
    pub tui: String,
    pub order_id: u32,
}

/// Runs the two-step lock-then-fetch pricing protocol and reconciles the
/// outcome, distinguishing a supplier-side price change from a hard failure.
pub struct PricingReconciler {
    gateway: Arc<dyn SupplierGateway>,
    credentials: CredentialCache,
    cache: ResultCache,
}

impl PricingReconciler {
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

    pub async fn get_live_price(
        &self,
        query: &LivePriceQuery,
    ) -> Result<PricingResult, PricingError> {
        let mut violations = Vec::new();
        if query.amount <= 0.0 {
            violations.push("Amount is required".to_string());
        }
        if query.offer_index.trim().is_empty() {
            violations.push("Offer index is required".to_string());
        }
        if query.tui.trim().is_empty() {
            violations.push("TUI is required".to_string());
        }
        if !violations.is_empty() {
            return Err(ValidationError::new(violations).into());
        }

        let credentials = self.credentials.get_credentials().await?;

        // Step 1: lock the selected offer and obtain a pricing TUI.
        let lock_request = SmartPricerRequest {
            client_id: credentials.client_id.clone(),
            trips: vec![PricerTrip {
                amount: query.amount,
                index: query.offer_index.clone(),
                order_id: query.order_id,
                tui: query.tui.clone(),
            }],
            mode: "SS".to_string(),
            options: "A".to_string(),
            source: "CF".to_string(),
            trip_type: query.trip_type.fare_type().to_string(),
        };
        let lock = self
            .gateway
            .smart_pricer(&credentials.token, &lock_request)
            .await?;
        let pricing_tui = lock
            .tui
            .as_deref()
            .map(clean_token)
            .filter(|t| !t.is_empty())
            .ok_or(SupplierError::Protocol("SmartPricer.TUI".to_string()))?;

        // Step 2: fetch the authoritative live price under that TUI.
        let fetch_request = GetPricerRequest {
            tui: pricing_tui.clone(),
            client_id: credentials.client_id.clone(),
        };
        let live = self
            .gateway
            .get_pricer(&credentials.token, &fetch_request)
            .await?;

        let price_change = if live.code == CODE_PRICE_CHANGED {
            let change = parse_price_change_message(&live.messages());
            info!(tui = %pricing_tui, ?change, "supplier repriced the selected offer");
            change
        } else {
            None
        };

        let result = normalize_pricing(&live, &pricing_tui, price_change)?;
        self.cache
            .set(CacheNamespace::Pricing, &pricing_tui, &result, ttl::PRICING)
            .await;
        Ok(result)
    }
}

/// The supplier reports repricing only as free text, e.g.
/// `"Previous Amt:-5899.00 | New Amt:-6149.00"`. All knowledge of that
/// format lives here so a supplier wording change is a one-function fix.
/// The `-` after each label is a separator, not a sign; amounts are read as
/// positive values.
pub fn parse_price_change_message(messages: &[String]) -> Option<PriceChange> {
    let text = messages.iter().find(|m| m.contains("Previous Amt"))?;
    let previous_amount = amount_after_label(text, "Previous Amt:-")?;
    let new_amount = amount_after_label(text, "New Amt:-")?;
    Some(PriceChange {
        previous_amount,
        new_amount,
    })
}

fn amount_after_label(text: &str, label: &str) -> Option<f64> {
    let start = text.find(label)? + label.len();
    let rest = &text[start..];
    let end = rest
        .find(|c: char| !c.is_ascii_digit() && c != '.')
        .unwrap_or(rest.len());
    rest[..end].parse().ok()
}

fn normalize_pricing(
    response: &GetPricerResponse,
    tui: &str,
    price_change: Option<PriceChange>,
) -> Result<PricingResult, PricingError> {
    let net_amount = as_f64_lenient(&response.net_amount)
        .ok_or_else(|| SupplierError::Protocol("GetSPricer.NetAmount".to_string()))?;
    let gross_amount = as_f64_lenient(&response.gross_amount).unwrap_or(net_amount);

    let mut segments = Vec::new();
    for trip in &response.trips {
        for journey in &trip.journey {
            let stops = as_i64_lenient(&journey.stops).unwrap_or(0).max(0) as u32;
            for segment in &journey.segments {
                let flight = segment.flight.as_ref();
                let fares = segment.fares.as_ref();
                segments.push(PricedSegment {
                    flight_number: flight.and_then(|f| f.flight_no.clone()),
                    airline: flight.and_then(|f| {
                        f.airline
                            .as_deref()
                            .map(|a| a.split('|').next().unwrap_or(a).trim().to_string())
                    }),
                    aircraft: flight.and_then(|f| f.aircraft.clone()),
                    provider: journey.provider.clone(),
                    duration: journey.duration.clone(),
                    stops,
                    departure_code: flight.and_then(|f| f.departure_code.clone()),
                    departure_terminal: flight.and_then(|f| f.departure_terminal.clone()),
                    departure_time: flight
                        .and_then(|f| f.departure_time.as_deref())
                        .and_then(parse_time_lenient),
                    arrival_code: flight.and_then(|f| f.arrival_code.clone()),
                    arrival_terminal: flight.and_then(|f| f.arrival_terminal.clone()),
                    arrival_time: flight
                        .and_then(|f| f.arrival_time.as_deref())
                        .and_then(parse_time_lenient),
                    base_fare: fares.and_then(|f| as_f64_lenient(&f.total_base_fare)),
                    taxes: fares.and_then(|f| as_f64_lenient(&f.total_tax)),
                    gross_fare: fares.and_then(|f| as_f64_lenient(&f.gross_fare)),
                });
            }
        }
    }

    Ok(PricingResult {
        tui: tui.to_string(),
        origin: response.from.clone(),
        destination: response.to.clone(),
        onward_date: response.onward_date.clone(),
        return_date: response.return_date.clone(),
        adults: response.adults,
        children: response.children,
        infants: response.infants,
        currency: response
            .currency_code
            .clone()
            .unwrap_or_else(|| "INR".to_string()),
        net_amount,
        gross_amount,
        segments,
        price_change,
    })
}

fn parse_time_lenient(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::testing::ManualClock;
    use crate::test_support::{supplier_config, MockGateway};
    use crate::wire::{SignatureResponse, SmartPricerAck};
    use farelink_store::cache::MemoryStore;
    use std::sync::atomic::Ordering;

    fn signature_ok() -> SignatureResponse {
        SignatureResponse {
            code: "200".to_string(),
            token: "tok".to_string(),
            client_id: "client-77".to_string(),
            tui: "tui-sig".to_string(),
        }
    }

    fn query() -> LivePriceQuery {
        LivePriceQuery {
            amount: 5899.0,
            offer_index: "1_0".to_string(),
            trip_type: TripType::OneWay,
            tui: "TUI-123".to_string(),
            order_id: 1,
        }
    }

    fn reconciler(gateway: Arc<MockGateway>) -> PricingReconciler {
        let credentials = CredentialCache::new(
            gateway.clone(),
            supplier_config(),
            Arc::new(ManualClock::new()),
        );
        PricingReconciler::new(
            gateway,
            credentials,
            ResultCache::new(Arc::new(MemoryStore::new())),
        )
    }

    fn pricer_response(code: &str, msg: serde_json::Value) -> GetPricerResponse {
        serde_json::from_value(serde_json::json!({
            "Code": code,
            "Msg": msg,
            "TUI": "TUI-PRICED",
            "From": "DEL",
            "To": "BOM",
            "OnwardDate": "2099-09-01",
            "ADT": 1,
            "CHD": 0,
            "INF": 0,
            "NetAmount": "5899.00",
            "GrossAmount": 6100.0,
            "Trips": [{
                "Journey": [{
                    "Provider": "6E",
                    "Duration": "02h 10m",
                    "Stops": "1",
                    "Segments": [
                        {
                            "Flight": {
                                "FlightNo": "6E 2112",
                                "Airline": "IndiGo|6E",
                                "AirCraft": "A321",
                                "DepartureCode": "DEL",
                                "DepartureTime": "2099-09-01T06:15:00",
                                "ArrivalCode": "HYD",
                                "ArrivalTime": "2099-09-01T08:25:00"
                            },
                            "Fares": {"TotalBaseFare": 5000.0, "TotalTax": "899.00", "GrossFare": 5899.0}
                        },
                        {
                            "Flight": {
                                "FlightNo": "6E 9907",
                                "Airline": "IndiGo|6E",
                                "DepartureCode": "HYD",
                                "DepartureTime": "2099-09-01T09:30:00",
                                "ArrivalCode": "BOM",
                                "ArrivalTime": "2099-09-01T11:00:00"
                            },
                            "Fares": {"TotalBaseFare": 0.0, "TotalTax": 0.0, "GrossFare": 0.0}
                        }
                    ]
                }]
            }]
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn lock_then_fetch_produces_a_normalized_result() {
        let gateway = Arc::new(MockGateway::new());
        gateway.push_signature(Ok(signature_ok()));
        gateway.push_smart_ack(Ok(SmartPricerAck {
            code: "200".to_string(),
            msg: serde_json::Value::Null,
            tui: Some("TUI-PRICED".to_string()),
        }));
        gateway.push_pricer(Ok(pricer_response("200", serde_json::Value::Null)));

        let result = reconciler(gateway.clone()).get_live_price(&query()).await.unwrap();

        assert_eq!(result.tui, "TUI-PRICED");
        assert_eq!(result.net_amount, 5899.0);
        assert_eq!(result.gross_amount, 6100.0);
        assert!(!result.has_price_changed());
        // Multi-leg journeys keep every segment.
        assert_eq!(result.segments.len(), 2);
        assert_eq!(result.segments[0].flight_number.as_deref(), Some("6E 2112"));
        assert_eq!(result.segments[0].airline.as_deref(), Some("IndiGo"));
        assert_eq!(result.segments[0].taxes, Some(899.0));
        assert_eq!(result.segments[1].departure_code.as_deref(), Some("HYD"));
        assert_eq!(gateway.smart_calls.load(Ordering::SeqCst), 1);
        assert_eq!(gateway.pricer_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn price_change_code_is_a_result_not_an_error() {
        let gateway = Arc::new(MockGateway::new());
        gateway.push_signature(Ok(signature_ok()));
        gateway.push_smart_ack(Ok(SmartPricerAck {
            code: "200".to_string(),
            msg: serde_json::Value::Null,
            tui: Some("TUI-PRICED".to_string()),
        }));
        gateway.push_pricer(Ok(pricer_response(
            "1500",
            serde_json::json!(["Previous Amt:-100.00 | New Amt:-120.00"]),
        )));

        let result = reconciler(gateway).get_live_price(&query()).await.unwrap();

        assert!(result.has_price_changed());
        let change = result.price_change.unwrap();
        assert_eq!(change.previous_amount, 100.0);
        assert_eq!(change.new_amount, 120.0);
    }

    #[tokio::test]
    async fn hard_supplier_failure_is_an_error() {
        let gateway = Arc::new(MockGateway::new());
        gateway.push_signature(Ok(signature_ok()));
        gateway.push_smart_ack(Err(SupplierError::RequestFailed {
            code: "400".to_string(),
            message: "fare no longer available".to_string(),
        }));

        let result = reconciler(gateway).get_live_price(&query()).await;

        assert!(matches!(
            result,
            Err(PricingError::Supplier(SupplierError::RequestFailed { code, .. })) if code == "400"
        ));
    }

    #[tokio::test]
    async fn missing_query_fields_fail_validation_before_network() {
        let gateway = Arc::new(MockGateway::new());
        let bad = LivePriceQuery {
            amount: 0.0,
            offer_index: String::new(),
            trip_type: TripType::OneWay,
            tui: String::new(),
            order_id: 1,
        };

        let result = reconciler(gateway.clone()).get_live_price(&bad).await;

        match result {
            Err(PricingError::Validation(e)) => assert_eq!(e.violations.len(), 3),
            other => panic!("expected validation failure, got {other:?}"),
        }
        assert_eq!(gateway.signature_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn price_change_parser_reads_both_amounts() {
        let change = parse_price_change_message(&[
            "Previous Amt:-100.00 | New Amt:-120.00".to_string()
        ])
        .unwrap();
        assert_eq!(change.previous_amount, 100.00);
        assert_eq!(change.new_amount, 120.00);

        assert!(parse_price_change_message(&["fare expired".to_string()]).is_none());
        assert!(parse_price_change_message(&[]).is_none());
    }
}
