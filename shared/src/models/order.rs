//! Purchase Order Model

use crate::order::{ItemStatus, OrderStatus, ParseStatusError};
use serde::{Deserialize, Serialize};

/// Purchase order row
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct PurchaseOrder {
    pub id: i64,
    /// Human-readable number, e.g. "PED-2026-00042"
    pub order_number: String,
    /// Raw status value (see [`PurchaseOrder::parsed_status`])
    pub status: String,
    /// Total value in currency unit
    pub total_value: f64,
    pub notes: Option<String>,
    /// Owning user reference
    pub user_id: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl PurchaseOrder {
    pub fn parsed_status(&self) -> Result<OrderStatus, ParseStatusError> {
        self.status.parse()
    }
}

/// Order items grouped by supplier (one invoice / delivery stream per supplier)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderSupplierGroup {
    pub id: i64,
    pub order_id: i64,
    pub supplier_id: i64,
    /// Aggregated subtotal in currency unit
    pub subtotal: f64,
    /// Raw receiving status of the group (PENDENTE/PARCIAL/RECEBIDO)
    pub status: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Order line item
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderItem {
    pub id: i64,
    pub order_supplier_id: i64,
    pub product_id: i64,
    pub contract_id: Option<i64>,
    /// Ordered quantity
    pub quantity: f64,
    /// Unit price in currency unit
    pub unit_price: f64,
    /// Stored subtotal (should equal quantity × unit_price)
    pub subtotal: f64,
    /// Raw receiving status (PENDENTE/PARCIAL/RECEBIDO)
    pub status: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl OrderItem {
    pub fn parsed_status(&self) -> Result<ItemStatus, ParseStatusError> {
        self.status.parse()
    }
}

/// Item joined with the group/order it belongs to
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ItemContext {
    pub item_id: i64,
    pub order_supplier_id: i64,
    pub order_id: i64,
    pub supplier_id: i64,
    pub product_id: i64,
    pub contract_id: Option<i64>,
    pub quantity: f64,
    pub unit_price: f64,
    pub item_status: String,
    pub order_status: String,
}

/// Running receipt totals for one order item
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ReceivingRecord {
    pub id: i64,
    pub order_item_id: i64,
    /// Accumulated received quantity (never above the ordered quantity)
    pub quantity_received: f64,
    pub last_received_at: Option<i64>,
    /// Lot of the most recent delivery
    pub lot: Option<String>,
    /// Expiry date (YYYY-MM-DD) of the most recent delivery
    pub expiry_date: Option<String>,
    /// Notes of every delivery, oldest first
    pub notes: Option<String>,
    /// Optimistic concurrency version, bumped on every write
    pub version: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Who changed an order status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusChangeSource {
    /// Explicit operator request through the state machine
    Transition,
    /// Recomputed from item receiving state
    Derived,
}

impl StatusChangeSource {
    pub const fn as_str(&self) -> &'static str {
        match self {
            StatusChangeSource::Transition => "TRANSITION",
            StatusChangeSource::Derived => "DERIVED",
        }
    }
}

/// Order status history row
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct StatusHistoryEntry {
    pub id: i64,
    pub order_id: i64,
    pub from_status: Option<String>,
    pub to_status: String,
    pub note: Option<String>,
    pub actor: Option<String>,
    /// TRANSITION | DERIVED
    pub source: String,
    pub created_at: i64,
}

/// Status transition request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionRequest {
    pub order_id: i64,
    pub target: OrderStatus,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub actor: Option<String>,
}

/// Result of an applied transition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionOutcome {
    pub order_id: i64,
    pub from: OrderStatus,
    pub to: OrderStatus,
    /// Active reservations released (cancellation only, best-effort)
    pub released_reservations: usize,
}

/// Line item of an imported order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemDraft {
    pub product_id: i64,
    #[serde(default)]
    pub contract_id: Option<i64>,
    pub quantity: f64,
    pub unit_price: f64,
}

/// Supplier group of an imported order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupplierGroupDraft {
    pub supplier_id: i64,
    pub items: Vec<OrderItemDraft>,
}

/// Order as handed over by the external placement flow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDraft {
    pub order_number: String,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub notes: Option<String>,
    pub groups: Vec<SupplierGroupDraft>,
}
