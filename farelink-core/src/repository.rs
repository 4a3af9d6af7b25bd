use async_trait::async_trait;
use uuid::Uuid;

use crate::booking::Booking;
use crate::error::StoreError;
use crate::offer::StoredFlight;
use crate::payment::Payment;

/// Repository trait for booking aggregates.
#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn create(&self, booking: &Booking) -> Result<(), StoreError>;

    async fn get(&self, id: Uuid) -> Result<Option<Booking>, StoreError>;

    async fn find_by_reference(&self, reference: &str) -> Result<Option<Booking>, StoreError>;

    async fn find_by_transaction_id(
        &self,
        transaction_id: &str,
    ) -> Result<Option<Booking>, StoreError>;

    async fn update(&self, booking: &Booking) -> Result<(), StoreError>;
}

/// Repository trait for payment records.
#[async_trait]
pub trait PaymentRepository: Send + Sync {
    async fn create(&self, payment: &Payment) -> Result<(), StoreError>;

    async fn find_by_transaction_id(
        &self,
        transaction_id: &str,
    ) -> Result<Option<Payment>, StoreError>;

    async fn update(&self, payment: &Payment) -> Result<(), StoreError>;
}

/// Repository trait for flight details persisted at itinerary creation.
#[async_trait]
pub trait FlightRepository: Send + Sync {
    async fn create(&self, flight: &StoredFlight) -> Result<Uuid, StoreError>;

    async fn get(&self, id: Uuid) -> Result<Option<StoredFlight>, StoreError>;
}
