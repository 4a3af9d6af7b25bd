use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Initiated,
    Processing,
    Success,
    Failed,
}

impl PaymentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentStatus::Initiated => "INITIATED",
            PaymentStatus::Processing => "PROCESSING",
            PaymentStatus::Success => "SUCCESS",
            PaymentStatus::Failed => "FAILED",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentHistoryEntry {
    pub status: PaymentStatus,
    pub timestamp: DateTime<Utc>,
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GatewayDetails {
    pub code: Option<String>,
    pub payment_id: Option<String>,
    pub redirect_url: Option<String>,
    pub redirect_mode: Option<String>,
    #[serde(default)]
    pub metadata: serde_json::Value,
}

/// Echo of the supplier's latest word on this payment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SupplierResponseEcho {
    pub code: Option<String>,
    pub message: Option<String>,
    pub book_status: Option<String>,
    pub crs_pnr: Option<String>,
}

/// One payment attempt for a booking. `history` is append-only: status
/// changes push an entry and never rewrite earlier ones.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub transaction_id: String,
    pub tui: String,
    pub payment_amount: f64,
    pub net_amount: f64,
    pub status: PaymentStatus,
    pub payment_type: String,
    pub gateway: GatewayDetails,
    pub response: SupplierResponseEcho,
    pub history: Vec<PaymentHistoryEntry>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Payment {
    /// Applies a status and appends the matching history entry.
    pub fn record(&mut self, status: PaymentStatus, remarks: Option<String>, at: DateTime<Utc>) {
        self.status = status;
        self.updated_at = at;
        self.history.push(PaymentHistoryEntry {
            status,
            timestamp: at,
            remarks,
        });
    }
}

/// Gateway callback codes counted as settled. "6033" is honored alongside
/// "200" because live callbacks deliver it for settled payments; it has no
/// documented meaning and must not be extended without supplier confirmation.
pub fn is_success_code(code: &str) -> bool {
    matches!(code, "200" | "6033")
}
