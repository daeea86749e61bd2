//! Contract reservation / inventory lot models
//!
//! Owned by external collaborators; the core only calls them through capability traits.

use serde::{Deserialize, Serialize};

/// Reservation lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReservationStatus {
    /// Holding contract balance
    Ativa,
    /// Fully converted into consumed balance
    Consumida,
    /// Released back to the contract
    Cancelada,
}

impl ReservationStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Ativa => "ATIVA",
            ReservationStatus::Consumida => "CONSUMIDA",
            ReservationStatus::Cancelada => "CANCELADA",
        }
    }
}

/// Hold against a contract's remaining balance
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Reservation {
    pub id: i64,
    pub order_id: i64,
    pub order_item_id: Option<i64>,
    pub contract_id: i64,
    /// Reserved amount in currency unit
    pub amount: f64,
    /// Amount already converted into consumed balance
    pub consumed_amount: f64,
    /// ATIVA | CONSUMIDA | CANCELADA
    pub status: String,
    pub reason: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Reservation {
    pub fn is_active(&self) -> bool {
        self.status == ReservationStatus::Ativa.as_str()
    }
}

/// Inventory lot creation payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LotCreate {
    pub product_id: i64,
    pub lot: String,
    pub quantity: f64,
    #[serde(default)]
    pub expiry_date: Option<String>,
    #[serde(default)]
    pub supplier_id: Option<i64>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Inventory lot row
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct InventoryLot {
    pub id: i64,
    pub product_id: i64,
    pub lot: String,
    pub quantity: f64,
    pub expiry_date: Option<String>,
    pub supplier_id: Option<i64>,
    pub notes: Option<String>,
    pub created_at: i64,
}
