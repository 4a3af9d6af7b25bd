use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use farelink_core::error::SupplierError;
use farelink_store::app_config::SupplierConfig;

use crate::wire::{
    CreateItineraryRequest, CreateItineraryResponse, Envelope, ExpressSearchAck,
    ExpressSearchRequest, GetPricerRequest, GetPricerResponse, RetrieveBookingRequest,
    RetrieveBookingResponse, SearchPollRequest, SearchPollResponse, SeatLayoutRequest,
    SeatLayoutResponse, SignatureRequest, SignatureResponse, SmartPricerAck, SmartPricerRequest,
    SsrRequest, SsrResponse, StartPayRequest, StartPayResponse, CODE_PRICE_CHANGED, CODE_SUCCESS,
};

/// Timeout for submit-class calls (search submit, pricing, itinerary,
/// payment, signature).
const SUBMIT_TIMEOUT: Duration = Duration::from_secs(10);
/// Tighter timeout for the repeated result polls.
const POLL_TIMEOUT: Duration = Duration::from_secs(8);

/// One method per supplier endpoint. The HTTP implementation below is the
/// production gateway; tests substitute their own.
#[async_trait]
pub trait SupplierGateway: Send + Sync {
    async fn signature(
        &self,
        request: &SignatureRequest,
    ) -> Result<SignatureResponse, SupplierError>;

    async fn express_search(
        &self,
        token: &str,
        request: &ExpressSearchRequest,
    ) -> Result<ExpressSearchAck, SupplierError>;

    async fn poll_search(
        &self,
        token: &str,
        request: &SearchPollRequest,
    ) -> Result<SearchPollResponse, SupplierError>;

    async fn smart_pricer(
        &self,
        token: &str,
        request: &SmartPricerRequest,
    ) -> Result<SmartPricerAck, SupplierError>;

    async fn get_pricer(
        &self,
        token: &str,
        request: &GetPricerRequest,
    ) -> Result<GetPricerResponse, SupplierError>;

    async fn create_itinerary(
        &self,
        token: &str,
        request: &CreateItineraryRequest,
    ) -> Result<CreateItineraryResponse, SupplierError>;

    async fn start_pay(
        &self,
        token: &str,
        request: &StartPayRequest,
    ) -> Result<StartPayResponse, SupplierError>;

    async fn retrieve_booking(
        &self,
        token: &str,
        request: &RetrieveBookingRequest,
    ) -> Result<RetrieveBookingResponse, SupplierError>;

    async fn seat_layout(
        &self,
        token: &str,
        request: &SeatLayoutRequest,
    ) -> Result<SeatLayoutResponse, SupplierError>;

    async fn ssr_list(&self, token: &str, request: &SsrRequest)
        -> Result<SsrResponse, SupplierError>;
}

pub struct HttpSupplierGateway {
    http: reqwest::Client,
    config: SupplierConfig,
}

impl HttpSupplierGateway {
    pub fn new(http: reqwest::Client, config: SupplierConfig) -> Self {
        Self { http, config }
    }

    fn utils_url(&self, path: &str) -> String {
        format!("{}{}", self.config.utils_base_url, path)
    }

    fn flights_url(&self, path: &str) -> String {
        format!("{}{}", self.config.flights_base_url, path)
    }

    async fn post_json<B, T>(
        &self,
        operation: &'static str,
        url: String,
        token: Option<&str>,
        body: &B,
        timeout: Duration,
        accepted_codes: &[&str],
    ) -> Result<T, SupplierError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let mut request = self.http.post(&url).json(body).timeout(timeout);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                SupplierError::Timeout(timeout)
            } else {
                SupplierError::RequestFailed {
                    code: e
                        .status()
                        .map(|s| s.as_u16().to_string())
                        .unwrap_or_else(|| "network".to_string()),
                    message: e.to_string(),
                }
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(operation, %status, "supplier returned HTTP error");
            return Err(SupplierError::RequestFailed {
                code: status.as_u16().to_string(),
                message: format!("{operation} failed with HTTP {status}"),
            });
        }

        let raw: serde_json::Value = response.json().await.map_err(|e| {
            if e.is_timeout() {
                SupplierError::Timeout(timeout)
            } else {
                SupplierError::Protocol(format!("{operation}: unreadable response body: {e}"))
            }
        })?;

        let envelope: Envelope = serde_json::from_value(raw.clone()).unwrap_or_default();
        let code = envelope.code.clone().unwrap_or_default();
        if !accepted_codes.contains(&code.as_str()) {
            let message = envelope
                .first_message()
                .unwrap_or_else(|| format!("{operation} failed"));
            warn!(operation, %code, %message, "supplier rejected request");
            return Err(SupplierError::RequestFailed { code, message });
        }

        serde_json::from_value(raw)
            .map_err(|e| SupplierError::Protocol(format!("{operation}: {e}")))
    }
}

#[async_trait]
impl SupplierGateway for HttpSupplierGateway {
    async fn signature(
        &self,
        request: &SignatureRequest,
    ) -> Result<SignatureResponse, SupplierError> {
        self.post_json(
            "Utils/Signature",
            self.utils_url("/Utils/Signature"),
            None,
            request,
            SUBMIT_TIMEOUT,
            &[CODE_SUCCESS],
        )
        .await
    }

    async fn express_search(
        &self,
        token: &str,
        request: &ExpressSearchRequest,
    ) -> Result<ExpressSearchAck, SupplierError> {
        self.post_json(
            "Flights/ExpressSearch",
            self.flights_url("/flights/ExpressSearch"),
            Some(token),
            request,
            SUBMIT_TIMEOUT,
            &[CODE_SUCCESS],
        )
        .await
    }

    async fn poll_search(
        &self,
        token: &str,
        request: &SearchPollRequest,
    ) -> Result<SearchPollResponse, SupplierError> {
        self.post_json(
            "Flights/GetExpSearch",
            self.flights_url("/flights/GetExpSearch"),
            Some(token),
            request,
            POLL_TIMEOUT,
            &[CODE_SUCCESS],
        )
        .await
    }

    async fn smart_pricer(
        &self,
        token: &str,
        request: &SmartPricerRequest,
    ) -> Result<SmartPricerAck, SupplierError> {
        self.post_json(
            "Flights/SmartPricer",
            self.flights_url("/Flights/SmartPricer"),
            Some(token),
            request,
            SUBMIT_TIMEOUT,
            &[CODE_SUCCESS, CODE_PRICE_CHANGED],
        )
        .await
    }

    async fn get_pricer(
        &self,
        token: &str,
        request: &GetPricerRequest,
    ) -> Result<GetPricerResponse, SupplierError> {
        self.post_json(
            "Flights/GetSPricer",
            self.flights_url("/Flights/GetSPricer"),
            Some(token),
            request,
            SUBMIT_TIMEOUT,
            &[CODE_SUCCESS, CODE_PRICE_CHANGED],
        )
        .await
    }

    async fn create_itinerary(
        &self,
        token: &str,
        request: &CreateItineraryRequest,
    ) -> Result<CreateItineraryResponse, SupplierError> {
        self.post_json(
            "Flights/CreateItinerary",
            self.flights_url("/Flights/CreateItinerary"),
            Some(token),
            request,
            SUBMIT_TIMEOUT,
            &[CODE_SUCCESS],
        )
        .await
    }

    async fn start_pay(
        &self,
        token: &str,
        request: &StartPayRequest,
    ) -> Result<StartPayResponse, SupplierError> {
        self.post_json(
            "Payment/StartPay",
            self.flights_url("/Payment/StartPay"),
            Some(token),
            request,
            SUBMIT_TIMEOUT,
            &[CODE_SUCCESS],
        )
        .await
    }

    async fn retrieve_booking(
        &self,
        token: &str,
        request: &RetrieveBookingRequest,
    ) -> Result<RetrieveBookingResponse, SupplierError> {
        self.post_json(
            "Utils/RetrieveBooking",
            self.flights_url("/Utils/RetrieveBooking"),
            Some(token),
            request,
            SUBMIT_TIMEOUT,
            &[CODE_SUCCESS],
        )
        .await
    }

    async fn seat_layout(
        &self,
        token: &str,
        request: &SeatLayoutRequest,
    ) -> Result<SeatLayoutResponse, SupplierError> {
        self.post_json(
            "Flights/SeatLayout",
            self.flights_url("/Flights/SeatLayout"),
            Some(token),
            request,
            SUBMIT_TIMEOUT,
            &[CODE_SUCCESS],
        )
        .await
    }

    async fn ssr_list(
        &self,
        token: &str,
        request: &SsrRequest,
    ) -> Result<SsrResponse, SupplierError> {
        self.post_json(
            "Flights/SSR",
            self.flights_url("/Flights/SSR"),
            Some(token),
            request,
            SUBMIT_TIMEOUT,
            &[CODE_SUCCESS],
        )
        .await
    }
}
