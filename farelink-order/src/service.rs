use std::sync::Arc;

use farelink_benzy::credentials::CredentialCache;
use farelink_benzy::gateway::SupplierGateway;
use farelink_core::repository::{BookingRepository, FlightRepository, PaymentRepository};

/// Drives a booking from itinerary creation through payment initiation to
/// callback-driven settlement. Transitions for one booking are applied in
/// the order calls arrive; nothing is guaranteed across bookings.
pub struct BookingService {
    pub(crate) gateway: Arc<dyn SupplierGateway>,
    pub(crate) credentials: CredentialCache,
    pub(crate) bookings: Arc<dyn BookingRepository>,
    pub(crate) payments: Arc<dyn PaymentRepository>,
    pub(crate) flights: Arc<dyn FlightRepository>,
    /// Browser key forwarded on StartPay, from the merchant configuration.
    pub(crate) browser_key: String,
}

impl BookingService {
    pub fn new(
        gateway: Arc<dyn SupplierGateway>,
        credentials: CredentialCache,
        bookings: Arc<dyn BookingRepository>,
        payments: Arc<dyn PaymentRepository>,
        flights: Arc<dyn FlightRepository>,
        browser_key: String,
    ) -> Self {
        Self {
            gateway,
            credentials,
            bookings,
            payments,
            flights,
            browser_key,
        }
    }
}
