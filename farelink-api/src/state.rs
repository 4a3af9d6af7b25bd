use std::sync::Arc;

use farelink_benzy::{AncillaryService, PricingReconciler, SearchOrchestrator};
use farelink_order::BookingService;

#[derive(Clone)]
pub struct AppState {
    pub search: Arc<SearchOrchestrator>,
    pub pricing: Arc<PricingReconciler>,
    pub ancillary: Arc<AncillaryService>,
    pub bookings: Arc<BookingService>,
    /// Base URL of the booking-status page used by the browser payment
    /// callback.
    pub frontend_base_url: String,
}
