//! Typed request/response schemas for the supplier's JSON protocol.
//!
//! Every response carries a `Code` field: `"200"` is success, `"1500"` is
//! price-changed-but-acceptable (pricing calls only), anything else is an
//! error whose text arrives in the `Msg` array. Required fields are declared
//! here; a payload missing one fails typed deserialization and surfaces as a
//! protocol error instead of propagating silently.

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const CODE_SUCCESS: &str = "200";
pub const CODE_PRICE_CHANGED: &str = "1500";

/// Minimal view of the shared response envelope, extracted before typed
/// deserialization.
#[derive(Debug, Default, Deserialize)]
pub struct Envelope {
    #[serde(rename = "Code")]
    pub code: Option<String>,
    #[serde(rename = "Msg", default)]
    pub msg: Value,
}

impl Envelope {
    /// `Msg` arrives as an array of strings, occasionally as a bare string.
    pub fn first_message(&self) -> Option<String> {
        match &self.msg {
            Value::String(s) => Some(s.clone()),
            Value::Array(items) => items.iter().find_map(|v| v.as_str().map(String::from)),
            _ => None,
        }
    }

    pub fn messages(&self) -> Vec<String> {
        match &self.msg {
            Value::String(s) => vec![s.clone()],
            Value::Array(items) => items
                .iter()
                .filter_map(|v| v.as_str().map(String::from))
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// Strips the escape characters and stray quotes the supplier wraps around
/// tokens it echoes back.
pub fn clean_token(raw: &str) -> String {
    let unescaped = raw.replace("\\\"", "\"").replace('\\', "");
    let stripped = unescaped.strip_prefix('"').unwrap_or(&unescaped);
    let stripped = stripped.strip_suffix('"').unwrap_or(stripped);
    stripped.trim().to_string()
}

/// The supplier is inconsistent about numeric fields (sometimes numbers,
/// sometimes numeric strings); read them leniently.
pub fn as_f64_lenient(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub fn as_i64_lenient(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Signature
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SignatureRequest {
    #[serde(rename = "MerchantID")]
    pub merchant_id: String,
    pub api_key: String,
    #[serde(rename = "ClientID")]
    pub client_id: String,
    pub password: String,
    pub agent_code: String,
    pub browser_key: String,
    pub key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SignatureResponse {
    #[serde(rename = "Code")]
    pub code: String,
    #[serde(rename = "Token")]
    pub token: String,
    #[serde(rename = "ClientID")]
    pub client_id: String,
    #[serde(rename = "TUI", default)]
    pub tui: String,
}

// ---------------------------------------------------------------------------
// Express search
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ExpressSearchRequest {
    pub fare_type: String,
    #[serde(rename = "ADT")]
    pub adults: u32,
    #[serde(rename = "CHD")]
    pub children: u32,
    #[serde(rename = "INF")]
    pub infants: u32,
    pub cabin: String,
    pub source: String,
    pub mode: String,
    #[serde(rename = "ClientID")]
    pub client_id: String,
    pub is_multiple_carrier: bool,
    pub is_refundable: bool,
    #[serde(rename = "preferedAirlines")]
    pub preferred_airlines: Option<Vec<String>>,
    #[serde(rename = "TUI")]
    pub tui: String,
    pub sec_type: String,
    pub trips: Vec<SearchTrip>,
    pub parameters: SearchParameters,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SearchTrip {
    pub from: String,
    pub to: String,
    pub onward_date: String,
    pub return_date: String,
    #[serde(rename = "TUI")]
    pub tui: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SearchParameters {
    pub airlines: String,
    pub group_type: String,
    pub refundable: String,
    pub is_direct: bool,
    pub is_student_fare: bool,
    pub is_nearby_airport: bool,
    pub is_extended_search: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExpressSearchAck {
    #[serde(rename = "Code")]
    pub code: String,
    #[serde(rename = "TUI", default)]
    pub tui: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchPollRequest {
    #[serde(rename = "ClientID")]
    pub client_id: String,
    #[serde(rename = "TUI")]
    pub tui: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchPollResponse {
    #[serde(rename = "Code")]
    pub code: String,
    #[serde(rename = "Completed", default)]
    pub completed: Option<String>,
    #[serde(rename = "CurrencyCode", default)]
    pub currency_code: Option<String>,
    #[serde(rename = "Trips", default)]
    pub trips: Vec<PollTrip>,
    #[serde(rename = "Notices", default)]
    pub notices: Vec<WireNotice>,
}

impl SearchPollResponse {
    pub fn is_completed(&self) -> bool {
        self.completed.as_deref() == Some("True")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PollTrip {
    #[serde(rename = "Journey", default)]
    pub journey: Vec<JourneyFlight>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JourneyFlight {
    #[serde(rename = "FlightNo", default)]
    pub flight_no: Option<String>,
    #[serde(rename = "Provider", default)]
    pub provider: Option<String>,
    #[serde(rename = "VAC", default)]
    pub validating_carrier: Option<String>,
    #[serde(rename = "MAC", default)]
    pub marketing_carrier: Option<String>,
    #[serde(rename = "OAC", default)]
    pub operating_carrier: Option<String>,
    #[serde(rename = "AirlineName", default)]
    pub airline_name: Option<String>,
    #[serde(rename = "From", default)]
    pub from: Option<String>,
    #[serde(rename = "FromName", default)]
    pub from_name: Option<String>,
    #[serde(rename = "To", default)]
    pub to: Option<String>,
    #[serde(rename = "ToName", default)]
    pub to_name: Option<String>,
    #[serde(rename = "DepartureTerminal", default)]
    pub departure_terminal: Option<String>,
    #[serde(rename = "ArrivalTerminal", default)]
    pub arrival_terminal: Option<String>,
    #[serde(rename = "DepartureTime", default)]
    pub departure_time: Option<String>,
    #[serde(rename = "ArrivalTime", default)]
    pub arrival_time: Option<String>,
    #[serde(rename = "Duration", default)]
    pub duration: Option<String>,
    #[serde(rename = "Stops", default)]
    pub stops: Option<u32>,
    #[serde(rename = "Connections", default)]
    pub connections: Vec<WireConnection>,
    #[serde(rename = "AirCraft", default)]
    pub aircraft: Option<String>,
    #[serde(rename = "FareClass", default)]
    pub fare_class: Option<String>,
    #[serde(rename = "Cabin", default)]
    pub cabin: Option<String>,
    #[serde(rename = "GrossFare", default)]
    pub gross_fare: Value,
    #[serde(rename = "NetFare", default)]
    pub net_fare: Value,
    #[serde(rename = "TotalCommission", default)]
    pub total_commission: Value,
    #[serde(rename = "Seats", default)]
    pub seats: Value,
    #[serde(rename = "Refundable", default)]
    pub refundable: Option<String>,
    #[serde(rename = "Inclusions", default)]
    pub inclusions: Option<WireInclusions>,
    #[serde(rename = "ReturnIdentifier", default)]
    pub return_identifier: Option<i64>,
    #[serde(rename = "GroupCount", default)]
    pub group_count: Option<i64>,
    #[serde(rename = "JourneyKey", default)]
    pub journey_key: Option<String>,
    #[serde(rename = "Index", default)]
    pub index: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireConnection {
    #[serde(rename = "Airport", default)]
    pub airport: Option<String>,
    #[serde(rename = "ArrAirportName", default)]
    pub arr_airport_name: Option<String>,
    #[serde(rename = "Duration", default)]
    pub duration: Option<String>,
    #[serde(rename = "Type", default)]
    pub connection_type: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireInclusions {
    #[serde(rename = "Baggage", default)]
    pub baggage: Option<String>,
    #[serde(rename = "Meals", default)]
    pub meals: Option<String>,
    #[serde(rename = "PieceDescription", default)]
    pub piece_description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireNotice {
    #[serde(rename = "Notice", default)]
    pub notice: Option<String>,
    #[serde(rename = "Link", default)]
    pub link: Option<String>,
    #[serde(rename = "NoticeType", default)]
    pub notice_type: Option<String>,
}

// ---------------------------------------------------------------------------
// Pricing (smart-pricer lock, get-pricer fetch)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SmartPricerRequest {
    #[serde(rename = "ClientID")]
    pub client_id: String,
    pub trips: Vec<PricerTrip>,
    pub mode: String,
    pub options: String,
    pub source: String,
    pub trip_type: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PricerTrip {
    pub amount: f64,
    pub index: String,
    #[serde(rename = "OrderID")]
    pub order_id: u32,
    #[serde(rename = "TUI")]
    pub tui: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SmartPricerAck {
    #[serde(rename = "Code")]
    pub code: String,
    #[serde(rename = "Msg", default)]
    pub msg: Value,
    #[serde(rename = "TUI", default)]
    pub tui: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GetPricerRequest {
    #[serde(rename = "TUI")]
    pub tui: String,
    #[serde(rename = "ClientID")]
    pub client_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GetPricerResponse {
    #[serde(rename = "Code")]
    pub code: String,
    #[serde(rename = "Msg", default)]
    pub msg: Value,
    #[serde(rename = "TUI", default)]
    pub tui: Option<String>,
    #[serde(rename = "From", default)]
    pub from: Option<String>,
    #[serde(rename = "To", default)]
    pub to: Option<String>,
    #[serde(rename = "OnwardDate", default)]
    pub onward_date: Option<String>,
    #[serde(rename = "ReturnDate", default)]
    pub return_date: Option<String>,
    #[serde(rename = "ADT", default)]
    pub adults: u32,
    #[serde(rename = "CHD", default)]
    pub children: u32,
    #[serde(rename = "INF", default)]
    pub infants: u32,
    #[serde(rename = "CurrencyCode", default)]
    pub currency_code: Option<String>,
    #[serde(rename = "NetAmount", default)]
    pub net_amount: Value,
    #[serde(rename = "GrossAmount", default)]
    pub gross_amount: Value,
    #[serde(rename = "Trips", default)]
    pub trips: Vec<PricerTripDetail>,
}

impl GetPricerResponse {
    pub fn messages(&self) -> Vec<String> {
        Envelope {
            code: Some(self.code.clone()),
            msg: self.msg.clone(),
        }
        .messages()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PricerTripDetail {
    #[serde(rename = "Journey", default)]
    pub journey: Vec<PricerJourney>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PricerJourney {
    #[serde(rename = "Provider", default)]
    pub provider: Option<String>,
    #[serde(rename = "Duration", default)]
    pub duration: Option<String>,
    #[serde(rename = "Stops", default)]
    pub stops: Value,
    #[serde(rename = "Segments", default)]
    pub segments: Vec<PricerSegment>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PricerSegment {
    #[serde(rename = "Flight", default)]
    pub flight: Option<SegmentFlight>,
    #[serde(rename = "Fares", default)]
    pub fares: Option<SegmentFares>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SegmentFlight {
    #[serde(rename = "FlightNo", default)]
    pub flight_no: Option<String>,
    #[serde(rename = "Airline", default)]
    pub airline: Option<String>,
    #[serde(rename = "VAC", default)]
    pub validating_carrier: Option<String>,
    #[serde(rename = "MAC", default)]
    pub marketing_carrier: Option<String>,
    #[serde(rename = "OAC", default)]
    pub operating_carrier: Option<String>,
    #[serde(rename = "AirCraft", default)]
    pub aircraft: Option<String>,
    #[serde(rename = "EquipmentType", default)]
    pub equipment_type: Option<String>,
    #[serde(rename = "FBC", default)]
    pub fare_basis_code: Option<String>,
    #[serde(rename = "Cabin", default)]
    pub cabin: Option<String>,
    #[serde(rename = "Refundable", default)]
    pub refundable: Option<String>,
    #[serde(rename = "Duration", default)]
    pub duration: Option<String>,
    #[serde(rename = "DepartureCode", default)]
    pub departure_code: Option<String>,
    #[serde(rename = "DepAirportName", default)]
    pub departure_airport_name: Option<String>,
    #[serde(rename = "DepartureTerminal", default)]
    pub departure_terminal: Option<String>,
    #[serde(rename = "DepartureTime", default)]
    pub departure_time: Option<String>,
    #[serde(rename = "ArrivalCode", default)]
    pub arrival_code: Option<String>,
    #[serde(rename = "ArrAirportName", default)]
    pub arrival_airport_name: Option<String>,
    #[serde(rename = "ArrivalTerminal", default)]
    pub arrival_terminal: Option<String>,
    #[serde(rename = "ArrivalTime", default)]
    pub arrival_time: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SegmentFares {
    #[serde(rename = "TotalBaseFare", default)]
    pub total_base_fare: Value,
    #[serde(rename = "TotalTax", default)]
    pub total_tax: Value,
    #[serde(rename = "GrossFare", default)]
    pub gross_fare: Value,
}

// ---------------------------------------------------------------------------
// Itinerary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ContactInfoPayload {
    #[serde(rename = "FName")]
    pub first_name: String,
    #[serde(rename = "LName")]
    pub last_name: String,
    pub mobile: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub email: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub country_code: String,
    #[serde(rename = "PIN")]
    pub pin: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TravellerPayload {
    #[serde(rename = "ID")]
    pub id: u32,
    pub title: String,
    #[serde(rename = "FName")]
    pub first_name: String,
    #[serde(rename = "LName")]
    pub last_name: String,
    pub gender: String,
    #[serde(rename = "PTC")]
    pub pax_type: String,
    #[serde(rename = "DOB", default)]
    pub date_of_birth: Option<String>,
    #[serde(default)]
    pub nationality: Option<String>,
    #[serde(rename = "PassportNo", default)]
    pub passport_no: Option<String>,
    #[serde(rename = "PDOE", default)]
    pub passport_expiry: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateItineraryRequest {
    #[serde(rename = "TUI")]
    pub tui: String,
    #[serde(rename = "ClientID")]
    pub client_id: String,
    pub contact_info: ContactInfoPayload,
    pub travellers: Vec<TravellerPayload>,
    pub net_amount: f64,
    #[serde(rename = "SSR")]
    pub ssr: Vec<Value>,
    pub cross_sell: Vec<Value>,
    #[serde(rename = "PLP")]
    pub plp: Vec<Value>,
    #[serde(rename = "SSRAmount")]
    pub ssr_amount: f64,
    pub cross_sell_amount: f64,
    #[serde(rename = "DeviceID")]
    pub device_id: String,
    pub app_version: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateItineraryResponse {
    #[serde(rename = "Code")]
    pub code: String,
    #[serde(rename = "TUI", default)]
    pub tui: Option<String>,
    #[serde(rename = "TransactionID")]
    pub transaction_id: i64,
    #[serde(rename = "NetAmount", default)]
    pub net_amount: Value,
    #[serde(rename = "GrossAmount", default)]
    pub gross_amount: Value,
    #[serde(rename = "Hold", default)]
    pub hold: bool,
    #[serde(rename = "CurrencyCode", default)]
    pub currency_code: Option<String>,
    #[serde(rename = "Trips", default)]
    pub trips: Vec<PricerTripDetail>,
    #[serde(rename = "SSR", default)]
    pub ssr: Vec<WireSsr>,
}

// ---------------------------------------------------------------------------
// Payment
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CardPayload {
    pub number: String,
    pub expiry: String,
    #[serde(rename = "CVV")]
    pub cvv: String,
    #[serde(rename = "CHName")]
    pub ch_name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub country: String,
    #[serde(rename = "PIN")]
    pub pin: String,
    pub international: bool,
    pub save_card: bool,
    #[serde(rename = "FName")]
    pub first_name: String,
    #[serde(rename = "LName")]
    pub last_name: String,
    #[serde(rename = "EMIMonths")]
    pub emi_months: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct StartPayRequest {
    #[serde(rename = "TransactionID")]
    pub transaction_id: i64,
    pub payment_amount: f64,
    pub net_amount: f64,
    pub browser_key: String,
    #[serde(rename = "ClientID")]
    pub client_id: String,
    #[serde(rename = "TUI")]
    pub tui: String,
    pub hold: bool,
    pub promo: Option<Value>,
    pub payment_type: String,
    pub bank_code: String,
    pub gate_way_code: String,
    #[serde(rename = "MerchantID")]
    pub merchant_id: String,
    pub payment_charge: f64,
    pub release_date: String,
    pub online_payment: bool,
    pub deposit_payment: bool,
    pub card: CardPayload,
    #[serde(rename = "VPA")]
    pub vpa: String,
    pub card_alias: String,
    pub quick_pay: Option<Value>,
    #[serde(rename = "RMSSignature")]
    pub rms_signature: String,
    pub target_currency: String,
    pub target_amount: f64,
    pub service_type: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StartPayResponse {
    #[serde(rename = "Code")]
    pub code: String,
    #[serde(rename = "Msg", default)]
    pub msg: Value,
    #[serde(rename = "GatewayCode", default)]
    pub gateway_code: Option<String>,
    #[serde(rename = "PaymentID", default)]
    pub payment_id: Option<String>,
    #[serde(rename = "RedirectUrl", default)]
    pub redirect_url: Option<String>,
    #[serde(rename = "RedirectMode", default)]
    pub redirect_mode: Option<String>,
    #[serde(rename = "PostData", default)]
    pub post_data: Option<Value>,
    #[serde(rename = "BookStatus", default)]
    pub book_status: Option<String>,
    #[serde(rename = "CRSPNR", default)]
    pub crs_pnr: Option<String>,
}

impl StartPayResponse {
    pub fn first_message(&self) -> Option<String> {
        Envelope {
            code: Some(self.code.clone()),
            msg: self.msg.clone(),
        }
        .first_message()
    }
}

/// Body of the gateway's settlement callback, shared by the JSON and
/// browser-redirect entry points.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentCallbackPayload {
    #[serde(rename = "Code")]
    pub code: String,
    #[serde(rename = "Msg", default)]
    pub msg: Value,
    #[serde(rename = "BookStatus", default)]
    pub book_status: Option<String>,
    #[serde(rename = "CRSPNR", default)]
    pub crs_pnr: Option<String>,
    #[serde(rename = "RedirectMode", default)]
    pub redirect_mode: Option<String>,
    #[serde(rename = "PostData", default)]
    pub post_data: Option<Value>,
}

impl PaymentCallbackPayload {
    pub fn first_message(&self) -> Option<String> {
        Envelope {
            code: Some(self.code.clone()),
            msg: self.msg.clone(),
        }
        .first_message()
    }
}

// ---------------------------------------------------------------------------
// Booking retrieval
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RetrieveBookingRequest {
    pub reference_type: String,
    pub reference_number: String,
    #[serde(rename = "ClientID")]
    pub client_id: String,
    pub service_type: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RetrieveBookingResponse {
    #[serde(rename = "Code")]
    pub code: String,
    #[serde(rename = "TransactionID", default)]
    pub transaction_id: Option<i64>,
    #[serde(rename = "Status", default)]
    pub status: Option<String>,
    #[serde(rename = "PaymentStatus", default)]
    pub payment_status: Option<String>,
    #[serde(rename = "AirlineNetFare", default)]
    pub airline_net_fare: Value,
    #[serde(rename = "GrossAmount", default)]
    pub gross_amount: Value,
    #[serde(rename = "Trips", default)]
    pub trips: Vec<PricerTripDetail>,
    #[serde(rename = "Pax", default)]
    pub pax: Vec<RetrievedPax>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RetrievedPax {
    #[serde(rename = "Title", default)]
    pub title: Option<String>,
    #[serde(rename = "FName", default)]
    pub first_name: Option<String>,
    #[serde(rename = "LName", default)]
    pub last_name: Option<String>,
    #[serde(rename = "PTC", default)]
    pub pax_type: Option<String>,
}

// ---------------------------------------------------------------------------
// Seat layout & SSR
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SeatLayoutRequest {
    #[serde(rename = "ClientID")]
    pub client_id: String,
    pub source: String,
    pub trips: Vec<SeatLayoutTrip>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SeatLayoutTrip {
    #[serde(rename = "TUI")]
    pub tui: String,
    pub index: String,
    #[serde(rename = "OrderID")]
    pub order_id: u32,
    pub amount: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeatLayoutResponse {
    #[serde(rename = "Code")]
    pub code: String,
    #[serde(rename = "TUI", default)]
    pub tui: Option<String>,
    #[serde(rename = "Trips", default)]
    pub trips: Vec<SeatLayoutTripDetail>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeatLayoutTripDetail {
    #[serde(rename = "Journey", default)]
    pub journey: Vec<SeatLayoutJourney>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeatLayoutJourney {
    #[serde(rename = "Provider", default)]
    pub provider: Option<String>,
    #[serde(rename = "Segments", default)]
    pub segments: Vec<SeatLayoutSegment>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeatLayoutSegment {
    #[serde(rename = "FlightNo", default)]
    pub flight_no: Option<String>,
    #[serde(rename = "AirlineName", default)]
    pub airline_name: Option<String>,
    #[serde(rename = "AirlineUnit", default)]
    pub airline_unit: Option<String>,
    #[serde(rename = "Seats", default)]
    pub seats: Vec<WireSeat>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireSeat {
    #[serde(rename = "SeatNumber")]
    pub seat_number: String,
    #[serde(rename = "SeatStatus", default)]
    pub seat_status: Option<String>,
    #[serde(rename = "SeatType", default)]
    pub seat_type: Option<String>,
    #[serde(rename = "SeatInfo", default)]
    pub seat_info: Option<String>,
    #[serde(rename = "AvailStatus", default)]
    pub avail_status: Option<String>,
    #[serde(rename = "Fare", default)]
    pub fare: Value,
    #[serde(rename = "Tax", default)]
    pub tax: Value,
    #[serde(rename = "SSRNetAmount", default)]
    pub ssr_net_amount: Value,
    #[serde(rename = "XValue", default)]
    pub x_value: Value,
    #[serde(rename = "YValue", default)]
    pub y_value: Value,
    #[serde(rename = "SSID", default)]
    pub ssid: Value,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SsrRequest {
    #[serde(rename = "ClientID")]
    pub client_id: String,
    pub source: String,
    pub fare_type: String,
    #[serde(rename = "PaidSSR")]
    pub paid_ssr: bool,
    pub trips: Vec<PricerTrip>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SsrResponse {
    #[serde(rename = "Code")]
    pub code: String,
    #[serde(rename = "Trips", default)]
    pub trips: Vec<SsrTripDetail>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SsrTripDetail {
    #[serde(rename = "Journey", default)]
    pub journey: Vec<SsrJourney>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SsrJourney {
    #[serde(rename = "Segments", default)]
    pub segments: Vec<SsrSegment>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SsrSegment {
    #[serde(rename = "FlightNo", default)]
    pub flight_no: Option<String>,
    #[serde(rename = "SSR", default)]
    pub ssr: Vec<WireSsr>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireSsr {
    #[serde(rename = "ID", default)]
    pub id: Value,
    #[serde(rename = "Code", default)]
    pub code: Option<String>,
    #[serde(rename = "Type", default)]
    pub ssr_type: Option<String>,
    #[serde(rename = "Description", default)]
    pub description: Option<String>,
    #[serde(rename = "Charge", default)]
    pub charge: Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_token_strips_escapes_and_quotes() {
        assert_eq!(clean_token("\"abc123\""), "abc123");
        assert_eq!(clean_token("\\\"abc123\\\""), "abc123");
        assert_eq!(clean_token("  abc123  "), "abc123");
        assert_eq!(clean_token("abc123"), "abc123");
    }

    #[test]
    fn envelope_reads_msg_as_array_or_string() {
        let array: Envelope =
            serde_json::from_str(r#"{"Code":"500","Msg":["boom","later"]}"#).unwrap();
        assert_eq!(array.first_message().as_deref(), Some("boom"));
        assert_eq!(array.messages().len(), 2);

        let bare: Envelope = serde_json::from_str(r#"{"Code":"500","Msg":"boom"}"#).unwrap();
        assert_eq!(bare.first_message().as_deref(), Some("boom"));
    }

    #[test]
    fn lenient_numbers_accept_strings() {
        assert_eq!(as_f64_lenient(&serde_json::json!("5899.50")), Some(5899.5));
        assert_eq!(as_f64_lenient(&serde_json::json!(5899.5)), Some(5899.5));
        assert_eq!(as_f64_lenient(&serde_json::json!(null)), None);
        assert_eq!(as_i64_lenient(&serde_json::json!("3")), Some(3));
    }

    #[test]
    fn express_search_request_uses_supplier_field_names() {
        let request = ExpressSearchRequest {
            fare_type: "ON".to_string(),
            adults: 1,
            children: 0,
            infants: 0,
            cabin: "E".to_string(),
            source: "CF".to_string(),
            mode: "AS".to_string(),
            client_id: "client".to_string(),
            is_multiple_carrier: false,
            is_refundable: false,
            preferred_airlines: None,
            tui: String::new(),
            sec_type: String::new(),
            trips: vec![SearchTrip {
                from: "DEL".to_string(),
                to: "BOM".to_string(),
                onward_date: "2026-09-01".to_string(),
                return_date: String::new(),
                tui: String::new(),
            }],
            parameters: SearchParameters {
                airlines: String::new(),
                group_type: String::new(),
                refundable: "N".to_string(),
                is_direct: false,
                is_student_fare: false,
                is_nearby_airport: false,
                is_extended_search: false,
            },
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["FareType"], "ON");
        assert_eq!(value["ADT"], 1);
        assert_eq!(value["ClientID"], "client");
        assert_eq!(value["Trips"][0]["From"], "DEL");
        assert_eq!(value["Trips"][0]["OnwardDate"], "2026-09-01");
        assert_eq!(value["Parameters"]["Refundable"], "N");
        assert!(value.get("preferedAirlines").is_some());
    }

    #[test]
    fn poll_response_completion_flag() {
        let incomplete: SearchPollResponse =
            serde_json::from_str(r#"{"Code":"200","Completed":"False"}"#).unwrap();
        assert!(!incomplete.is_completed());

        let complete: SearchPollResponse =
            serde_json::from_str(r#"{"Code":"200","Completed":"True"}"#).unwrap();
        assert!(complete.is_completed());
    }

    #[test]
    fn missing_transaction_id_fails_itinerary_deserialization() {
        let result: Result<CreateItineraryResponse, _> =
            serde_json::from_str(r#"{"Code":"200","TUI":"t1"}"#);
        assert!(result.is_err());
    }
}
