//! Scriptable gateway double shared by this crate's tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use farelink_core::error::SupplierError;
use farelink_store::app_config::SupplierConfig;

use crate::gateway::SupplierGateway;
use crate::wire::*;

pub(crate) fn supplier_config() -> SupplierConfig {
    SupplierConfig {
        merchant_id: "300".to_string(),
        api_key: "api-key".to_string(),
        client_id: "merchant-client".to_string(),
        password: "secret".to_string(),
        browser_key: "browser-key".to_string(),
        signing_key: "signing-key".to_string(),
        channel_id: String::new(),
        utils_base_url: "http://supplier.test".to_string(),
        flights_base_url: "http://supplier.test".to_string(),
    }
}

fn unscripted(endpoint: &'static str) -> SupplierError {
    SupplierError::RequestFailed {
        code: "mock".to_string(),
        message: format!("no scripted response for {endpoint}"),
    }
}

#[derive(Default)]
pub(crate) struct MockGateway {
    pub delay: Option<Duration>,
    pub signature_calls: AtomicUsize,
    pub search_calls: AtomicUsize,
    pub poll_calls: AtomicUsize,
    pub smart_calls: AtomicUsize,
    pub pricer_calls: AtomicUsize,
    pub ssr_calls: AtomicUsize,
    signature_responses: Mutex<VecDeque<Result<SignatureResponse, SupplierError>>>,
    search_acks: Mutex<VecDeque<Result<ExpressSearchAck, SupplierError>>>,
    poll_responses: Mutex<VecDeque<Result<SearchPollResponse, SupplierError>>>,
    poll_default: Mutex<Option<Result<SearchPollResponse, SupplierError>>>,
    smart_acks: Mutex<VecDeque<Result<SmartPricerAck, SupplierError>>>,
    pricer_responses: Mutex<VecDeque<Result<GetPricerResponse, SupplierError>>>,
    seat_responses: Mutex<VecDeque<Result<SeatLayoutResponse, SupplierError>>>,
    ssr_responses: Mutex<VecDeque<Result<SsrResponse, SupplierError>>>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn push_signature(&self, response: Result<SignatureResponse, SupplierError>) {
        self.signature_responses.lock().unwrap().push_back(response);
    }

    pub fn push_search_ack(&self, response: Result<ExpressSearchAck, SupplierError>) {
        self.search_acks.lock().unwrap().push_back(response);
    }

    pub fn push_poll(&self, response: Result<SearchPollResponse, SupplierError>) {
        self.poll_responses.lock().unwrap().push_back(response);
    }

    /// Response returned once the scripted poll queue is drained.
    pub fn set_poll_default(&self, response: Result<SearchPollResponse, SupplierError>) {
        *self.poll_default.lock().unwrap() = Some(response);
    }

    pub fn push_smart_ack(&self, response: Result<SmartPricerAck, SupplierError>) {
        self.smart_acks.lock().unwrap().push_back(response);
    }

    pub fn push_pricer(&self, response: Result<GetPricerResponse, SupplierError>) {
        self.pricer_responses.lock().unwrap().push_back(response);
    }

    pub fn push_seat_layout(&self, response: Result<SeatLayoutResponse, SupplierError>) {
        self.seat_responses.lock().unwrap().push_back(response);
    }

    pub fn push_ssr(&self, response: Result<SsrResponse, SupplierError>) {
        self.ssr_responses.lock().unwrap().push_back(response);
    }

    async fn pause(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl SupplierGateway for MockGateway {
    async fn signature(
        &self,
        _request: &SignatureRequest,
    ) -> Result<SignatureResponse, SupplierError> {
        self.signature_calls.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        self.signature_responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(unscripted("signature")))
    }

    async fn express_search(
        &self,
        _token: &str,
        _request: &ExpressSearchRequest,
    ) -> Result<ExpressSearchAck, SupplierError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        self.search_acks
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(unscripted("express_search")))
    }

    async fn poll_search(
        &self,
        _token: &str,
        _request: &SearchPollRequest,
    ) -> Result<SearchPollResponse, SupplierError> {
        self.poll_calls.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        if let Some(next) = self.poll_responses.lock().unwrap().pop_front() {
            return next;
        }
        self.poll_default
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| Err(unscripted("poll_search")))
    }

    async fn smart_pricer(
        &self,
        _token: &str,
        _request: &SmartPricerRequest,
    ) -> Result<SmartPricerAck, SupplierError> {
        self.smart_calls.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        self.smart_acks
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(unscripted("smart_pricer")))
    }

    async fn get_pricer(
        &self,
        _token: &str,
        _request: &GetPricerRequest,
    ) -> Result<GetPricerResponse, SupplierError> {
        self.pricer_calls.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        self.pricer_responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(unscripted("get_pricer")))
    }

    async fn create_itinerary(
        &self,
        _token: &str,
        _request: &CreateItineraryRequest,
    ) -> Result<CreateItineraryResponse, SupplierError> {
        Err(unscripted("create_itinerary"))
    }

    async fn start_pay(
        &self,
        _token: &str,
        _request: &StartPayRequest,
    ) -> Result<StartPayResponse, SupplierError> {
        Err(unscripted("start_pay"))
    }

    async fn retrieve_booking(
        &self,
        _token: &str,
        _request: &RetrieveBookingRequest,
    ) -> Result<RetrieveBookingResponse, SupplierError> {
        Err(unscripted("retrieve_booking"))
    }

    async fn seat_layout(
        &self,
        _token: &str,
        _request: &SeatLayoutRequest,
    ) -> Result<SeatLayoutResponse, SupplierError> {
        self.pause().await;
        self.seat_responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(unscripted("seat_layout")))
    }

    async fn ssr_list(
        &self,
        _token: &str,
        _request: &SsrRequest,
    ) -> Result<SsrResponse, SupplierError> {
        self.ssr_calls.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        self.ssr_responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(unscripted("ssr_list")))
    }
}
