//! Scripted gateway and repository fixtures for this crate's tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use farelink_benzy::clock::SystemClock;
use farelink_benzy::credentials::CredentialCache;
use farelink_benzy::gateway::SupplierGateway;
use farelink_benzy::wire::*;
use farelink_core::error::SupplierError;
use farelink_store::app_config::SupplierConfig;
use farelink_store::memory::{
    InMemoryBookingRepository, InMemoryFlightRepository, InMemoryPaymentRepository,
};

use crate::itinerary::ItineraryRequest;
use crate::service::BookingService;

fn unscripted(endpoint: &'static str) -> SupplierError {
    SupplierError::RequestFailed {
        code: "mock".to_string(),
        message: format!("no scripted response for {endpoint}"),
    }
}

#[derive(Default)]
pub(crate) struct ScriptedGateway {
    itinerary_responses: Mutex<VecDeque<Result<CreateItineraryResponse, SupplierError>>>,
    start_pay_responses: Mutex<VecDeque<Result<StartPayResponse, SupplierError>>>,
    retrieve_responses: Mutex<VecDeque<Result<RetrieveBookingResponse, SupplierError>>>,
}

impl ScriptedGateway {
    pub fn push_itinerary(&self, response: Result<CreateItineraryResponse, SupplierError>) {
        self.itinerary_responses.lock().unwrap().push_back(response);
    }

    pub fn push_start_pay(&self, response: Result<StartPayResponse, SupplierError>) {
        self.start_pay_responses.lock().unwrap().push_back(response);
    }

    pub fn push_retrieve(&self, response: Result<RetrieveBookingResponse, SupplierError>) {
        self.retrieve_responses.lock().unwrap().push_back(response);
    }
}

#[async_trait]
impl SupplierGateway for ScriptedGateway {
    async fn signature(
        &self,
        _request: &SignatureRequest,
    ) -> Result<SignatureResponse, SupplierError> {
        Ok(SignatureResponse {
            code: "200".to_string(),
            token: "tok".to_string(),
            client_id: "client-77".to_string(),
            tui: "tui-sig".to_string(),
        })
    }

    async fn express_search(
        &self,
        _token: &str,
        _request: &ExpressSearchRequest,
    ) -> Result<ExpressSearchAck, SupplierError> {
        Err(unscripted("express_search"))
    }

    async fn poll_search(
        &self,
        _token: &str,
        _request: &SearchPollRequest,
    ) -> Result<SearchPollResponse, SupplierError> {
        Err(unscripted("poll_search"))
    }

    async fn smart_pricer(
        &self,
        _token: &str,
        _request: &SmartPricerRequest,
    ) -> Result<SmartPricerAck, SupplierError> {
        Err(unscripted("smart_pricer"))
    }

    async fn get_pricer(
        &self,
        _token: &str,
        _request: &GetPricerRequest,
    ) -> Result<GetPricerResponse, SupplierError> {
        Err(unscripted("get_pricer"))
    }

    async fn create_itinerary(
        &self,
        _token: &str,
        _request: &CreateItineraryRequest,
    ) -> Result<CreateItineraryResponse, SupplierError> {
        self.itinerary_responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(unscripted("create_itinerary")))
    }

    async fn start_pay(
        &self,
        _token: &str,
        _request: &StartPayRequest,
    ) -> Result<StartPayResponse, SupplierError> {
        self.start_pay_responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(unscripted("start_pay")))
    }

    async fn retrieve_booking(
        &self,
        _token: &str,
        _request: &RetrieveBookingRequest,
    ) -> Result<RetrieveBookingResponse, SupplierError> {
        self.retrieve_responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(unscripted("retrieve_booking")))
    }

    async fn seat_layout(
        &self,
        _token: &str,
        _request: &SeatLayoutRequest,
    ) -> Result<SeatLayoutResponse, SupplierError> {
        Err(unscripted("seat_layout"))
    }

    async fn ssr_list(
        &self,
        _token: &str,
        _request: &SsrRequest,
    ) -> Result<SsrResponse, SupplierError> {
        Err(unscripted("ssr_list"))
    }
}

pub(crate) struct Harness {
    pub gateway: Arc<ScriptedGateway>,
    pub bookings: Arc<InMemoryBookingRepository>,
    pub payments: Arc<InMemoryPaymentRepository>,
    pub flights: Arc<InMemoryFlightRepository>,
    pub service: BookingService,
}

pub(crate) fn harness() -> Harness {
    let gateway = Arc::new(ScriptedGateway::default());
    let bookings = Arc::new(InMemoryBookingRepository::new());
    let payments = Arc::new(InMemoryPaymentRepository::new());
    let flights = Arc::new(InMemoryFlightRepository::new());

    let config = SupplierConfig {
        merchant_id: "300".to_string(),
        api_key: "api-key".to_string(),
        client_id: "merchant-client".to_string(),
        password: "secret".to_string(),
        browser_key: "browser-key".to_string(),
        signing_key: "signing-key".to_string(),
        channel_id: String::new(),
        utils_base_url: "http://supplier.test".to_string(),
        flights_base_url: "http://supplier.test".to_string(),
    };
    let credentials = CredentialCache::new(gateway.clone(), config, Arc::new(SystemClock));

    let service = BookingService::new(
        gateway.clone(),
        credentials,
        bookings.clone(),
        payments.clone(),
        flights.clone(),
        "browser-key".to_string(),
    );

    Harness {
        gateway,
        bookings,
        payments,
        flights,
        service,
    }
}

pub(crate) fn itinerary_request() -> ItineraryRequest {
    serde_json::from_value(serde_json::json!({
        "tui": "TUI-ITIN-1",
        "contact": {
            "FName": "Asha",
            "LName": "Iyer",
            "Mobile": "9876543210",
            "Email": "asha@example.com",
            "Address": "12 MG Road",
            "City": "Bengaluru",
            "State": "KA",
            "CountryCode": "IN",
            "PIN": "560001"
        },
        "travellers": [{
            "ID": 1,
            "Title": "Mr",
            "FName": "Rahul",
            "LName": "Iyer",
            "Gender": "M",
            "PTC": "ADT",
            "DOB": "1990-04-12",
            "Nationality": "IN"
        }],
        "net_amount": 5623.5
    }))
    .expect("valid itinerary request fixture")
}

pub(crate) fn itinerary_response(transaction_id: i64) -> CreateItineraryResponse {
    serde_json::from_value(serde_json::json!({
        "Code": "200",
        "TUI": "TUI-ITIN-1",
        "TransactionID": transaction_id,
        "NetAmount": 5623.5,
        "GrossAmount": 5899.0,
        "CurrencyCode": "INR",
        "Trips": [{
            "Journey": [{
                "Provider": "6E",
                "Stops": 0,
                "Segments": [{
                    "Flight": {
                        "FlightNo": "6E 2112",
                        "VAC": "6E",
                        "Airline": "IndiGo|6E",
                        "AirCraft": "A321",
                        "Cabin": "E",
                        "Refundable": "Y",
                        "DepartureCode": "DEL",
                        "DepAirportName": "Indira Gandhi International",
                        "DepartureTerminal": "T3",
                        "DepartureTime": "2099-09-01T06:15:00",
                        "ArrivalCode": "BOM",
                        "ArrAirportName": "Chhatrapati Shivaji",
                        "ArrivalTerminal": "T2",
                        "ArrivalTime": "2099-09-01T08:25:00"
                    },
                    "Fares": {"TotalBaseFare": 5000.0, "TotalTax": 623.5, "GrossFare": 5899.0}
                }]
            }]
        }],
        "SSR": [{"ID": 1, "Code": "BAG", "Type": "2", "Description": "15 Kg", "Charge": 0}]
    }))
    .expect("valid itinerary response fixture")
}
