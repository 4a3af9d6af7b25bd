//! In-memory repositories backing tests and local development without a
//! database.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use farelink_core::booking::Booking;
use farelink_core::error::StoreError;
use farelink_core::offer::StoredFlight;
use farelink_core::payment::Payment;
use farelink_core::repository::{BookingRepository, FlightRepository, PaymentRepository};

#[derive(Default)]
pub struct InMemoryBookingRepository {
    bookings: Mutex<HashMap<Uuid, Booking>>,
}

impl InMemoryBookingRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookingRepository for InMemoryBookingRepository {
    async fn create(&self, booking: &Booking) -> Result<(), StoreError> {
        self.bookings
            .lock()
            .expect("booking store lock")
            .insert(booking.id, booking.clone());
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Booking>, StoreError> {
        Ok(self
            .bookings
            .lock()
            .expect("booking store lock")
            .get(&id)
            .cloned())
    }

    async fn find_by_reference(&self, reference: &str) -> Result<Option<Booking>, StoreError> {
        Ok(self
            .bookings
            .lock()
            .expect("booking store lock")
            .values()
            .find(|b| b.booking_reference == reference)
            .cloned())
    }

    async fn find_by_transaction_id(
        &self,
        transaction_id: &str,
    ) -> Result<Option<Booking>, StoreError> {
        Ok(self
            .bookings
            .lock()
            .expect("booking store lock")
            .values()
            .find(|b| b.transaction_id == transaction_id)
            .cloned())
    }

    async fn update(&self, booking: &Booking) -> Result<(), StoreError> {
        let mut bookings = self.bookings.lock().expect("booking store lock");
        if !bookings.contains_key(&booking.id) {
            return Err(StoreError::NotFound {
                entity: "booking",
                id: booking.id.to_string(),
            });
        }
        bookings.insert(booking.id, booking.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryPaymentRepository {
    payments: Mutex<HashMap<Uuid, Payment>>,
}

impl InMemoryPaymentRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PaymentRepository for InMemoryPaymentRepository {
    async fn create(&self, payment: &Payment) -> Result<(), StoreError> {
        self.payments
            .lock()
            .expect("payment store lock")
            .insert(payment.id, payment.clone());
        Ok(())
    }

    async fn find_by_transaction_id(
        &self,
        transaction_id: &str,
    ) -> Result<Option<Payment>, StoreError> {
        Ok(self
            .payments
            .lock()
            .expect("payment store lock")
            .values()
            .filter(|p| p.transaction_id == transaction_id)
            .max_by_key(|p| p.created_at)
            .cloned())
    }

    async fn update(&self, payment: &Payment) -> Result<(), StoreError> {
        let mut payments = self.payments.lock().expect("payment store lock");
        if !payments.contains_key(&payment.id) {
            return Err(StoreError::NotFound {
                entity: "payment",
                id: payment.id.to_string(),
            });
        }
        payments.insert(payment.id, payment.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryFlightRepository {
    flights: Mutex<HashMap<Uuid, StoredFlight>>,
    pub fail_writes: std::sync::atomic::AtomicBool,
}

impl InMemoryFlightRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FlightRepository for InMemoryFlightRepository {
    async fn create(&self, flight: &StoredFlight) -> Result<Uuid, StoreError> {
        if self.fail_writes.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(StoreError::Backend("simulated write failure".to_string()));
        }
        self.flights
            .lock()
            .expect("flight store lock")
            .insert(flight.id, flight.clone());
        Ok(flight.id)
    }

    async fn get(&self, id: Uuid) -> Result<Option<StoredFlight>, StoreError> {
        Ok(self
            .flights
            .lock()
            .expect("flight store lock")
            .get(&id)
            .cloned())
    }
}
