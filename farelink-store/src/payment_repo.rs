use async_trait::async_trait;
use sqlx::PgPool;

use farelink_core::error::StoreError;
use farelink_core::payment::Payment;
use farelink_core::repository::PaymentRepository;

pub struct PgPaymentRepository {
    pool: PgPool,
}

impl PgPaymentRepository {
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

#[async_trait]
impl PaymentRepository for PgPaymentRepository {
    async fn create(&self, payment: &Payment) -> Result<(), StoreError> {
        let document = serde_json::to_value(payment).map_err(backend_error)?;

        sqlx::query(
            r#"
            INSERT INTO payments (id, booking_id, transaction_id, status, document, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(payment.id)
        .bind(payment.booking_id)
        .bind(&payment.transaction_id)
        .bind(payment.status.as_str())
        .bind(document)
        .bind(payment.created_at)
        .bind(payment.updated_at)
        .execute(&self.pool)
        .await
        .map_err(backend_error)?;

        Ok(())
    }

    async fn find_by_transaction_id(
        &self,
        transaction_id: &str,
    ) -> Result<Option<Payment>, StoreError> {
        // A booking can carry multiple attempts; the active one is the latest.
        let row: Option<DocumentRow> = sqlx::query_as(
            "SELECT document FROM payments WHERE transaction_id = $1 ORDER BY created_at DESC LIMIT 1",
        )
        .bind(transaction_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend_error)?;

        row.map(|row| serde_json::from_value(row.document).map_err(backend_error))
            .transpose()
    }

    async fn update(&self, payment: &Payment) -> Result<(), StoreError> {
        let document = serde_json::to_value(payment).map_err(backend_error)?;

        let result = sqlx::query(
            "UPDATE payments SET status = $2, document = $3, updated_at = $4 WHERE id = $1",
        )
        .bind(payment.id)
        .bind(payment.status.as_str())
        .bind(document)
        .bind(payment.updated_at)
        .execute(&self.pool)
        .await
        .map_err(backend_error)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound {
                entity: "payment",
                id: payment.id.to_string(),
            });
        }
        Ok(())
    }
}
