//! External collaborators
//!
//! Contract-balance reservations and inventory lots are owned by other
//! subsystems. The order core only sees them through these capability traits
//! and never lets their failures abort its own work (see [`best_effort`]).

pub mod best_effort;
pub mod inventory;
pub mod reservation;

pub use inventory::SqliteInventoryService;
pub use reservation::SqliteReservationService;

use async_trait::async_trait;
use shared::error::{AppError, ErrorCode};
use shared::models::{InventoryLot, LotCreate, Reservation};
use thiserror::Error;

/// Collaborator failure (logged, never propagated by the core)
#[derive(Debug, Error)]
pub enum CollaboratorError {
    #[error("Reservation service failed: {0}")]
    Reservation(String),

    #[error("Inventory service failed: {0}")]
    Inventory(String),

    #[error("Dependency unavailable: {0}")]
    Unavailable(String),
}

impl CollaboratorError {
    pub fn code(&self) -> ErrorCode {
        match self {
            CollaboratorError::Reservation(_) => ErrorCode::ReservationFailed,
            CollaboratorError::Inventory(_) => ErrorCode::InventoryFailed,
            CollaboratorError::Unavailable(_) => ErrorCode::DependencyFailed,
        }
    }
}

impl From<CollaboratorError> for AppError {
    fn from(err: CollaboratorError) -> Self {
        AppError::with_message(err.code(), err.to_string())
    }
}

/// Contract balance reservations
#[async_trait]
pub trait ReservationService: Send + Sync {
    async fn find_reservations_by_order(
        &self,
        order_id: i64,
    ) -> Result<Vec<Reservation>, CollaboratorError>;

    /// Convert `amount` of an active reservation into consumed balance
    async fn consume_reservation(&self, id: i64, amount: f64) -> Result<(), CollaboratorError>;

    /// Release an active reservation back to the contract
    async fn cancel_reservation(&self, id: i64, reason: &str) -> Result<(), CollaboratorError>;
}

/// Inventory lots
#[async_trait]
pub trait InventoryService: Send + Sync {
    async fn create_lot(&self, lot: LotCreate) -> Result<InventoryLot, CollaboratorError>;
}
