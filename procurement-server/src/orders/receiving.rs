//! Receiving Accumulator
//!
//! Applies delivery events to order items as monotonic accumulation. The
//! received total never exceeds the ordered quantity: an overflowing receipt
//! is rejected whole.
//!
//! # Flow
//!
//! ```text
//! RecordReceipt
//!   ├─ validate input
//!   ├─ per-item lock
//!   ├─ BEGIN
//!   │    ├─ resolve item → group → order
//!   │    ├─ newTotal = received + quantity  (reject if > ordered)
//!   │    ├─ receiving_record insert / CAS on version (retry on conflict)
//!   │    ├─ item status, group status
//!   │    └─ recompute order status (deriver)
//!   ├─ COMMIT
//!   └─ best-effort: consume reservation, create inventory lot
//! ```

use super::error::{OrderError, OrderResult};
use super::money::{line_subtotal, quantity_to_f64, require_finite, to_decimal, to_f64};
use super::status_deriver;
use crate::audit_log;
use crate::db::begin_write;
use crate::db::repository::{RepoError, item, receiving, supplier_group};
use crate::db::repository::receiving::ReceivingWrite;
use crate::services::{InventoryService, ReservationService, best_effort};
use crate::utils::validation::{
    MAX_ACTOR_LEN, MAX_LOT_LEN, MAX_NOTE_LEN, validate_expiry_date, validate_optional_text,
};
use dashmap::DashMap;
use rust_decimal::Decimal;
use shared::models::{ItemContext, LotCreate, ReceiptInput, ReceiptOutcome};
use shared::order::ItemStatus;
use sqlx::SqlitePool;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Separator between the notes of successive deliveries
const NOTES_SEPARATOR: &str = "\n---\n";

/// Item status implied by the accumulated quantity
pub fn derive_item_status(received: Decimal, ordered: Decimal) -> ItemStatus {
    if received >= ordered && received > Decimal::ZERO {
        ItemStatus::Recebido
    } else if received > Decimal::ZERO {
        ItemStatus::Parcial
    } else {
        ItemStatus::Pendente
    }
}

/// Supplier group status implied by its items' statuses.
///
/// Unparseable item statuses count as PENDENTE.
pub fn derive_group_status(item_statuses: &[String]) -> ItemStatus {
    let parsed: Vec<ItemStatus> = item_statuses
        .iter()
        .map(|s| s.parse().unwrap_or_default())
        .collect();
    if !parsed.is_empty() && parsed.iter().all(|s| *s == ItemStatus::Recebido) {
        ItemStatus::Recebido
    } else if parsed.iter().any(|s| *s != ItemStatus::Pendente) {
        ItemStatus::Parcial
    } else {
        ItemStatus::Pendente
    }
}

/// Generated lot identifier, `LOT-` + 8 hex chars
pub fn generate_lot_id() -> String {
    let id = uuid::Uuid::new_v4().simple().to_string();
    format!("LOT-{}", id[..8].to_uppercase())
}

fn append_notes(existing: Option<&str>, new: Option<&str>) -> Option<String> {
    let new = new.map(str::trim).filter(|n| !n.is_empty());
    match (existing, new) {
        (Some(old), Some(new)) if !old.is_empty() => Some(format!("{old}{NOTES_SEPARATOR}{new}")),
        (_, Some(new)) => Some(new.to_string()),
        (old, None) => old.map(str::to_string),
    }
}

/// Receipt committed inside the transaction, before side effects
struct CommittedReceipt {
    ctx: ItemContext,
    outcome: ReceiptOutcome,
}

enum Attempt {
    Committed(Box<CommittedReceipt>),
    VersionConflict,
}

/// Receiving accumulator service
#[derive(Clone)]
pub struct ReceivingService {
    pool: SqlitePool,
    reservations: Arc<dyn ReservationService>,
    inventory: Arc<dyn InventoryService>,
    /// Per-item locks; serialize read-modify-write of one item in this process
    item_locks: Arc<DashMap<i64, Arc<Mutex<()>>>>,
    retry_limit: u32,
}

impl ReceivingService {
    pub fn new(
        pool: SqlitePool,
        reservations: Arc<dyn ReservationService>,
        inventory: Arc<dyn InventoryService>,
        retry_limit: u32,
    ) -> Self {
        Self {
            pool,
            reservations,
            inventory,
            item_locks: Arc::new(DashMap::new()),
            retry_limit,
        }
    }

    fn item_lock(&self, item_id: i64) -> Arc<Mutex<()>> {
        self.item_locks
            .entry(item_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Drop the item's lock entry once no receipt holds or waits on it
    fn release_item_lock(&self, item_id: i64) {
        self.item_locks
            .remove_if(&item_id, |_, lock| Arc::strong_count(lock) == 1);
    }

    /// Run attempts until one commits. `None` when every attempt lost a race.
    async fn apply_with_retry(
        &self,
        input: &ReceiptInput,
        lot: &str,
    ) -> OrderResult<Option<Box<CommittedReceipt>>> {
        for attempt in 0..=self.retry_limit {
            match self.try_apply(input, lot).await {
                Ok(Attempt::Committed(receipt)) => return Ok(Some(receipt)),
                Ok(Attempt::VersionConflict) => {
                    tracing::warn!(
                        order_item_id = input.order_item_id,
                        attempt,
                        "Receiving record version conflict, retrying"
                    );
                }
                Err(OrderError::Repo(RepoError::Busy(e))) => {
                    tracing::warn!(
                        order_item_id = input.order_item_id,
                        attempt,
                        error = %e,
                        "Database busy, retrying receipt"
                    );
                }
                Err(e) => return Err(e),
            }
        }
        Ok(None)
    }

    /// Record one delivery against an order item.
    pub async fn record_receipt(&self, input: ReceiptInput) -> OrderResult<ReceiptOutcome> {
        require_finite(input.quantity, "quantity").map_err(OrderError::Validation)?;
        if input.quantity <= 0.0 {
            return Err(OrderError::InvalidQuantity(input.quantity));
        }
        validate_optional_text(input.lot.as_deref(), "lot", MAX_LOT_LEN)?;
        validate_optional_text(input.notes.as_deref(), "notes", MAX_NOTE_LEN)?;
        validate_optional_text(input.actor.as_deref(), "actor", MAX_ACTOR_LEN)?;
        validate_expiry_date(input.expiry_date.as_deref())?;

        let lot = input
            .lot
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .unwrap_or_else(generate_lot_id);

        let lock = self.item_lock(input.order_item_id);
        let committed = {
            let _guard = lock.lock().await;
            self.apply_with_retry(&input, &lot).await
        };
        drop(lock);
        self.release_item_lock(input.order_item_id);

        let Some(receipt) = committed? else {
            return Err(OrderError::ReceiptConflict(input.order_item_id));
        };
        let CommittedReceipt { ctx, outcome } = *receipt;

        tracing::info!(
            order_item_id = outcome.order_item_id,
            order_id = outcome.order_id,
            quantity = input.quantity,
            received = outcome.quantity_received,
            ordered = outcome.quantity_ordered,
            item_status = %outcome.item_status,
            order_status = %outcome.order_status,
            "Receipt recorded"
        );
        audit_log!(
            input.actor.as_deref().unwrap_or("system"),
            "receipt",
            format!("order_item:{}", outcome.order_item_id),
            format!("+{} ({}/{})", input.quantity, outcome.quantity_received, outcome.quantity_ordered)
        );

        // Side effects run after commit and never fail the receipt
        let amount = to_f64(line_subtotal(input.quantity, ctx.unit_price));
        best_effort::consume_for_receipt(
            self.reservations.as_ref(),
            ctx.order_id,
            ctx.item_id,
            ctx.contract_id,
            amount,
        )
        .await;
        best_effort::create_lot(
            self.inventory.as_ref(),
            LotCreate {
                product_id: ctx.product_id,
                lot: lot.clone(),
                quantity: input.quantity,
                expiry_date: input.expiry_date.clone(),
                supplier_id: Some(ctx.supplier_id),
                notes: input.notes.clone(),
            },
        )
        .await;

        Ok(outcome)
    }

    /// One read-modify-write attempt in its own transaction
    async fn try_apply(&self, input: &ReceiptInput, lot: &str) -> OrderResult<Attempt> {
        let mut tx = begin_write(&self.pool).await?;

        let ctx = item::find_context(&mut *tx, input.order_item_id)
            .await?
            .ok_or(OrderError::ItemNotFound(input.order_item_id))?;

        let record = receiving::find_by_item(&mut *tx, ctx.item_id).await?;
        let received = record.as_ref().map(|r| r.quantity_received).unwrap_or(0.0);

        let ordered = to_decimal(ctx.quantity);
        let new_total = to_decimal(received) + to_decimal(input.quantity);
        if new_total > ordered {
            return Err(OrderError::ExceedsOrdered {
                ordered: ctx.quantity,
                received,
                quantity: input.quantity,
            });
        }

        let item_status = derive_item_status(new_total, ordered);
        let now = shared::util::now_millis();
        let write = ReceivingWrite {
            order_item_id: ctx.item_id,
            quantity_received: quantity_to_f64(new_total),
            last_received_at: now,
            lot: Some(lot.to_string()),
            expiry_date: input
                .expiry_date
                .clone()
                .or_else(|| record.as_ref().and_then(|r| r.expiry_date.clone())),
            notes: append_notes(
                record.as_ref().and_then(|r| r.notes.as_deref()),
                input.notes.as_deref(),
            ),
        };

        let written = receiving::upsert(&mut *tx, record.as_ref().map(|r| r.version), &write).await?;
        if !written {
            return Ok(Attempt::VersionConflict);
        }

        item::update_status(&mut *tx, ctx.item_id, item_status.as_str()).await?;

        let group_statuses = item::statuses_by_group(&mut *tx, ctx.order_supplier_id).await?;
        let group_status = derive_group_status(&group_statuses);
        supplier_group::update_status(&mut *tx, ctx.order_supplier_id, group_status.as_str()).await?;

        let derived = status_deriver::recompute_in_tx(&mut tx, ctx.order_id).await?;

        tx.commit().await?;

        let outcome = ReceiptOutcome {
            order_item_id: ctx.item_id,
            order_id: ctx.order_id,
            quantity_received: write.quantity_received,
            quantity_ordered: ctx.quantity,
            item_status,
            group_status,
            order_status: derived.status.clone(),
            order_status_changed: derived.changed,
            lot: lot.to_string(),
        };
        Ok(Attempt::Committed(Box::new(CommittedReceipt { ctx, outcome })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{SqliteInventoryService, SqliteReservationService};

    fn dec(v: f64) -> Decimal {
        to_decimal(v)
    }

    fn service() -> ReceivingService {
        let pool = SqlitePool::connect_lazy("sqlite::memory:").unwrap();
        ReceivingService::new(
            pool.clone(),
            Arc::new(SqliteReservationService::new(pool.clone())),
            Arc::new(SqliteInventoryService::new(pool)),
            3,
        )
    }

    #[tokio::test]
    async fn test_item_lock_entry_released_when_unused() {
        let svc = service();
        let held = svc.item_lock(7);
        let waiting = svc.item_lock(7);
        svc.item_lock(8);
        assert_eq!(svc.item_locks.len(), 2);

        drop(held);
        svc.release_item_lock(7);
        assert!(svc.item_locks.contains_key(&7), "still referenced by a waiter");

        drop(waiting);
        svc.release_item_lock(7);
        svc.release_item_lock(8);
        assert!(svc.item_locks.is_empty());
    }

    #[test]
    fn test_derive_item_status() {
        assert_eq!(derive_item_status(dec(0.0), dec(10.0)), ItemStatus::Pendente);
        assert_eq!(derive_item_status(dec(4.0), dec(10.0)), ItemStatus::Parcial);
        assert_eq!(derive_item_status(dec(10.0), dec(10.0)), ItemStatus::Recebido);
        assert_eq!(derive_item_status(dec(0.1) + dec(0.2), dec(0.3)), ItemStatus::Recebido);
    }

    #[test]
    fn test_derive_group_status() {
        let s = |v: &[&str]| v.iter().map(|x| x.to_string()).collect::<Vec<_>>();
        assert_eq!(derive_group_status(&s(&[])), ItemStatus::Pendente);
        assert_eq!(derive_group_status(&s(&["PENDENTE", "PENDENTE"])), ItemStatus::Pendente);
        assert_eq!(derive_group_status(&s(&["RECEBIDO", "PENDENTE"])), ItemStatus::Parcial);
        assert_eq!(derive_group_status(&s(&["PARCIAL"])), ItemStatus::Parcial);
        assert_eq!(derive_group_status(&s(&["RECEBIDO", "RECEBIDO"])), ItemStatus::Recebido);
        assert_eq!(derive_group_status(&s(&["RECEBIDO", "???"])), ItemStatus::Parcial);
    }

    #[test]
    fn test_generate_lot_id() {
        let lot = generate_lot_id();
        assert!(lot.starts_with("LOT-"));
        assert_eq!(lot.len(), 12);
        assert_ne!(generate_lot_id(), lot);
    }

    #[test]
    fn test_append_notes() {
        assert_eq!(append_notes(None, None), None);
        assert_eq!(append_notes(None, Some(" first ")).as_deref(), Some("first"));
        assert_eq!(append_notes(Some("first"), Some("  ")).as_deref(), Some("first"));
        assert_eq!(
            append_notes(Some("first"), Some("second")).as_deref(),
            Some("first\n---\nsecond")
        );
    }
}
