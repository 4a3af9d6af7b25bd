use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use farelink_core::error::StoreError;
use farelink_core::offer::StoredFlight;
use farelink_core::repository::FlightRepository;

pub struct PgFlightRepository {
    pool: PgPool,
}

impl PgFlightRepository {
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
impl FlightRepository for PgFlightRepository {
    async fn create(&self, flight: &StoredFlight) -> Result<Uuid, StoreError> {
        let document = serde_json::to_value(flight).map_err(backend_error)?;

        sqlx::query("INSERT INTO flights (id, document, created_at) VALUES ($1, $2, $3)")
            .bind(flight.id)
            .bind(document)
            .bind(flight.created_at)
            .execute(&self.pool)
            .await
            .map_err(backend_error)?;

        Ok(flight.id)
    }

    async fn get(&self, id: Uuid) -> Result<Option<StoredFlight>, StoreError> {
        let row: Option<DocumentRow> =
            sqlx::query_as("SELECT document FROM flights WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(backend_error)?;

        row.map(|row| serde_json::from_value(row.document).map_err(backend_error))
            .transpose()
    }
}
