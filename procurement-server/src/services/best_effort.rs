//! Best-effort collaborator calls
//!
//! Called after the core transaction has committed. Failures are logged with
//! their error code and swallowed here, so call sites never handle them.

use super::{CollaboratorError, InventoryService, ReservationService};
use shared::models::{InventoryLot, LotCreate, Reservation};

fn log_failure(operation: &str, err: &CollaboratorError) {
    tracing::warn!(
        operation,
        error = %err,
        error_code = err.code().code(),
        "Collaborator call failed (DependencyFailed), continuing"
    );
}

/// Pick the reservation a receipt should consume: active, same contract,
/// preferring one tied to the item itself.
pub fn select_reservation(
    reservations: &[Reservation],
    contract_id: i64,
    order_item_id: i64,
) -> Option<&Reservation> {
    let active = || {
        reservations
            .iter()
            .filter(move |r| r.is_active() && r.contract_id == contract_id)
    };
    active()
        .find(|r| r.order_item_id == Some(order_item_id))
        .or_else(|| active().next())
}

/// Consume contract balance for a receipt. Returns `true` when a reservation was consumed.
pub async fn consume_for_receipt(
    reservations: &dyn ReservationService,
    order_id: i64,
    order_item_id: i64,
    contract_id: Option<i64>,
    amount: f64,
) -> bool {
    let Some(contract_id) = contract_id else {
        tracing::debug!(order_item_id, "Item has no contract, nothing to consume");
        return false;
    };

    let found = match reservations.find_reservations_by_order(order_id).await {
        Ok(found) => found,
        Err(e) => {
            log_failure("find_reservations_by_order", &e);
            return false;
        }
    };

    let Some(target) = select_reservation(&found, contract_id, order_item_id) else {
        tracing::info!(
            order_id,
            order_item_id,
            contract_id,
            "No active reservation for contract, nothing to consume"
        );
        return false;
    };

    match reservations.consume_reservation(target.id, amount).await {
        Ok(()) => true,
        Err(e) => {
            log_failure("consume_reservation", &e);
            false
        }
    }
}

/// Release every active reservation of an order. Returns how many were released.
pub async fn release_order_reservations(
    reservations: &dyn ReservationService,
    order_id: i64,
    reason: &str,
) -> usize {
    let found = match reservations.find_reservations_by_order(order_id).await {
        Ok(found) => found,
        Err(e) => {
            log_failure("find_reservations_by_order", &e);
            return 0;
        }
    };

    let mut released = 0;
    for reservation in found.iter().filter(|r| r.is_active()) {
        match reservations.cancel_reservation(reservation.id, reason).await {
            Ok(()) => released += 1,
            Err(e) => log_failure("cancel_reservation", &e),
        }
    }
    released
}

/// Create an inventory lot for received goods
pub async fn create_lot(inventory: &dyn InventoryService, lot: LotCreate) -> Option<InventoryLot> {
    match inventory.create_lot(lot).await {
        Ok(created) => Some(created),
        Err(e) => {
            log_failure("create_lot", &e);
            None
        }
    }
}
