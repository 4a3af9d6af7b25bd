use std::time::Duration;

/// Failures talking to the flight supplier. `Clone` so a single refresh
/// outcome can be handed to every caller coalesced onto it.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SupplierError {
    #[error("credential issuance failed: {0}")]
    Auth(String),

    #[error("supplier request timed out after {0:?}")]
    Timeout(Duration),

    #[error("supplier request failed (code {code}): {message}")]
    RequestFailed { code: String, message: String },

    #[error("supplier response missing {0}")]
    Protocol(String),
}

/// Aggregated input validation failure: every violated rule, not just the
/// first one.
#[derive(Debug, Clone, thiserror::Error)]
#[error("validation failed: {}", violations.join("; "))]
pub struct ValidationError {
    pub violations: Vec<String>,
}

impl ValidationError {
    pub fn new(violations: Vec<String>) -> Self {
        Self { violations }
    }

    pub fn single(message: impl Into<String>) -> Self {
        Self {
            violations: vec![message.into()],
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Supplier(#[from] SupplierError),

    #[error("search polling aborted after {attempts} failed attempts")]
    PollRetriesExhausted {
        attempts: u32,
        #[source]
        last: SupplierError,
    },

    /// The overall search deadline passed without the supplier completing.
    /// Surfaced distinctly so callers can tell the user to retry.
    #[error("search timed out after {0:?} without completion")]
    DeadlineExceeded(Duration),
}

#[derive(Debug, thiserror::Error)]
pub enum PricingError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Supplier(#[from] SupplierError),
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("storage backend error: {0}")]
    Backend(String),
}

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{0} not found")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Supplier(#[from] SupplierError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
