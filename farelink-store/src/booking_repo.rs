use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use farelink_core::booking::Booking;
use farelink_core::error::StoreError;
use farelink_core::repository::BookingRepository;

/// Bookings are stored as JSONB documents with the lookup keys lifted into
/// indexed columns.
pub struct PgBookingRepository {
    pool: PgPool,
}

impl PgBookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct DocumentRow {
    document: serde_json::Value,
}

fn backend_error(e: impl std::fmt::Display) -> StoreError {
    StoreError::Backend(e.to_string())
}

fn decode_booking(row: DocumentRow) -> Result<Booking, StoreError> {
    serde_json::from_value(row.document).map_err(backend_error)
}

#[async_trait]
impl BookingRepository for PgBookingRepository {
    async fn create(&self, booking: &Booking) -> Result<(), StoreError> {
        let document = serde_json::to_value(booking).map_err(backend_error)?;

        sqlx::query(
            r#"
            INSERT INTO bookings (id, booking_reference, transaction_id, status, document, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(booking.id)
        .bind(&booking.booking_reference)
        .bind(&booking.transaction_id)
        .bind(booking.status.as_str())
        .bind(document)
        .bind(booking.created_at)
        .bind(booking.updated_at)
        .execute(&self.pool)
        .await
        .map_err(backend_error)?;

        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Booking>, StoreError> {
        let row: Option<DocumentRow> =
            sqlx::query_as("SELECT document FROM bookings WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(backend_error)?;

        row.map(decode_booking).transpose()
    }

    async fn find_by_reference(&self, reference: &str) -> Result<Option<Booking>, StoreError> {
        let row: Option<DocumentRow> =
            sqlx::query_as("SELECT document FROM bookings WHERE booking_reference = $1")
                .bind(reference)
                .fetch_optional(&self.pool)
                .await
                .map_err(backend_error)?;

        row.map(decode_booking).transpose()
    }

    async fn find_by_transaction_id(
        &self,
        transaction_id: &str,
    ) -> Result<Option<Booking>, StoreError> {
        let row: Option<DocumentRow> =
            sqlx::query_as("SELECT document FROM bookings WHERE transaction_id = $1")
                .bind(transaction_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(backend_error)?;

        row.map(decode_booking).transpose()
    }

    async fn update(&self, booking: &Booking) -> Result<(), StoreError> {
        let document = serde_json::to_value(booking).map_err(backend_error)?;

        let result = sqlx::query(
            "UPDATE bookings SET status = $2, document = $3, updated_at = $4 WHERE id = $1",
        )
        .bind(booking.id)
        .bind(booking.status.as_str())
        .bind(document)
        .bind(booking.updated_at)
        .execute(&self.pool)
        .await
        .map_err(backend_error)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound {
                entity: "booking",
                id: booking.id.to_string(),
            });
        }
        Ok(())
    }
}
