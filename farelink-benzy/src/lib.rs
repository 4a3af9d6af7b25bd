pub mod ancillary;
pub mod clock;
pub mod credentials;
pub mod gateway;
pub mod pricing;
pub mod search;
pub mod wire;

#[cfg(test)]
mod test_support;

pub use ancillary::{AncillaryService, SeatLayoutQuery, SsrQuery};
pub use credentials::{CredentialCache, Credentials};
pub use gateway::{HttpSupplierGateway, SupplierGateway};
pub use pricing::{LivePriceQuery, PricingReconciler};
pub use search::{SearchOrchestrator, SearchOutcome};
