//! SQLite-backed reservation service

use super::{CollaboratorError, ReservationService};
use crate::db::repository::{RepoError, reservation};
use async_trait::async_trait;
use shared::models::Reservation;
use sqlx::SqlitePool;

#[derive(Clone)]
pub struct SqliteReservationService {
    pool: SqlitePool,
}

impl SqliteReservationService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl From<RepoError> for CollaboratorError {
    fn from(err: RepoError) -> Self {
        CollaboratorError::Reservation(err.to_string())
    }
}

#[async_trait]
impl ReservationService for SqliteReservationService {
    async fn find_reservations_by_order(
        &self,
        order_id: i64,
    ) -> Result<Vec<Reservation>, CollaboratorError> {
        Ok(reservation::find_by_order(&self.pool, order_id).await?)
    }

    async fn consume_reservation(&self, id: i64, amount: f64) -> Result<(), CollaboratorError> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(CollaboratorError::Reservation(format!(
                "consume amount must be positive, got {amount}"
            )));
        }
        reservation::consume(&self.pool, id, amount).await?;
        tracing::info!(reservation_id = id, amount, "Reservation consumed");
        Ok(())
    }

    async fn cancel_reservation(&self, id: i64, reason: &str) -> Result<(), CollaboratorError> {
        reservation::cancel(&self.pool, id, reason).await?;
        tracing::info!(reservation_id = id, reason = %reason, "Reservation released");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use shared::models::ReservationStatus;

    #[tokio::test]
    async fn test_consume_until_fully_consumed() {
        let db = DbService::in_memory().await.unwrap();
        let service = SqliteReservationService::new(db.pool.clone());
        let id = reservation::create(&db.pool, 1, Some(10), 7, 50.0).await.unwrap();

        service.consume_reservation(id, 20.0).await.unwrap();
        let r = reservation::find_by_id(&db.pool, id).await.unwrap().unwrap();
        assert_eq!(r.consumed_amount, 20.0);
        assert_eq!(r.status, ReservationStatus::Ativa.as_str());

        service.consume_reservation(id, 30.0).await.unwrap();
        let r = reservation::find_by_id(&db.pool, id).await.unwrap().unwrap();
        assert_eq!(r.consumed_amount, 50.0);
        assert_eq!(r.status, ReservationStatus::Consumida.as_str());

        // No longer active
        assert!(service.consume_reservation(id, 1.0).await.is_err());
    }

    #[tokio::test]
    async fn test_cancel_only_active() {
        let db = DbService::in_memory().await.unwrap();
        let service = SqliteReservationService::new(db.pool.clone());
        let id = reservation::create(&db.pool, 1, None, 7, 10.0).await.unwrap();

        service.cancel_reservation(id, "order cancelled").await.unwrap();
        let r = reservation::find_by_id(&db.pool, id).await.unwrap().unwrap();
        assert_eq!(r.status, "CANCELADA");
        assert_eq!(r.reason.as_deref(), Some("order cancelled"));

        assert!(service.cancel_reservation(id, "again").await.is_err());
    }

    #[tokio::test]
    async fn test_rejects_non_positive_amount() {
        let db = DbService::in_memory().await.unwrap();
        let service = SqliteReservationService::new(db.pool.clone());
        let id = reservation::create(&db.pool, 1, None, 7, 10.0).await.unwrap();
        assert!(matches!(
            service.consume_reservation(id, 0.0).await,
            Err(CollaboratorError::Reservation(_))
        ));
    }
}
