//! Receiving DTOs

use crate::order::ItemStatus;
use serde::{Deserialize, Serialize};

/// One delivery event against an order item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptInput {
    pub order_item_id: i64,
    /// Quantity delivered in this event (must be > 0)
    pub quantity: f64,
    #[serde(default)]
    pub lot: Option<String>,
    /// Expiry date, YYYY-MM-DD
    #[serde(default)]
    pub expiry_date: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub actor: Option<String>,
}

impl ReceiptInput {
    pub fn new(order_item_id: i64, quantity: f64) -> Self {
        Self {
            order_item_id,
            quantity,
            lot: None,
            expiry_date: None,
            notes: None,
            actor: None,
        }
    }
}

/// Result of an accepted receipt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptOutcome {
    pub order_item_id: i64,
    pub order_id: i64,
    /// Accumulated quantity after this receipt
    pub quantity_received: f64,
    pub quantity_ordered: f64,
    pub item_status: ItemStatus,
    pub group_status: ItemStatus,
    /// Order status after recomputation
    pub order_status: String,
    pub order_status_changed: bool,
    /// Lot recorded for this delivery (generated if none was supplied)
    pub lot: String,
}

/// Receiving progress of one line item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemReceivingLine {
    pub order_item_id: i64,
    pub order_supplier_id: i64,
    pub supplier_id: i64,
    pub product_id: i64,
    pub quantity_ordered: f64,
    pub quantity_received: f64,
    pub quantity_pending: f64,
    /// 0–100
    pub percent_received: f64,
    pub status: String,
    pub lot: Option<String>,
    pub last_received_at: Option<i64>,
}

/// Receiving progress of a whole order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceivingSummary {
    pub order_id: i64,
    pub order_number: String,
    pub order_status: String,
    pub items: Vec<ItemReceivingLine>,
    pub total_ordered: f64,
    pub total_received: f64,
    /// 0–100, quantity-weighted
    pub completion_percent: f64,
    pub fully_received: bool,
}
