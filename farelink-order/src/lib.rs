pub mod itinerary;
pub mod payment;
pub mod retrieve;
pub mod service;

pub use itinerary::{ItineraryOutcome, ItineraryRequest};
pub use payment::{CallbackOutcome, PaymentInitiation};
pub use retrieve::{RetrieveQuery, RetrievedBooking};
pub use service::BookingService;

#[cfg(test)]
mod test_support;
