//! Order Status State Machine
//!
//! Validates explicit status transitions against the transition table and
//! applies them through the guarded status writer.

use super::error::{OrderError, OrderResult};
use super::status_writer::{self, StatusChange};
use crate::audit_log;
use crate::db::begin_write;
use crate::db::repository::{order, status_history};
use crate::services::{ReservationService, best_effort};
use crate::utils::validation::{
    MAX_ACTOR_LEN, MAX_NOTE_LEN, validate_cancel_note, validate_optional_text,
};
use shared::models::{StatusChangeSource, StatusHistoryEntry, TransitionOutcome, TransitionRequest};
use shared::order::OrderStatus;
use sqlx::SqlitePool;
use std::sync::Arc;

/// Outgoing edges of each status. Terminal states have none.
pub fn allowed_transitions(from: OrderStatus) -> &'static [OrderStatus] {
    use OrderStatus::*;
    match from {
        Pendente => &[Confirmado, Cancelado],
        Confirmado => &[Recebimento, Recebido, EmPreparacao, Cancelado],
        Recebimento => &[Recebido, Cancelado],
        Recebido => &[EmPreparacao, Faturado, Cancelado],
        EmPreparacao => &[Enviado, Cancelado],
        Enviado => &[Entregue],
        Entregue => &[Faturado],
        Faturado | Cancelado => &[],
    }
}

/// Check if a state transition is valid
#[inline]
pub fn is_valid_transition(from: OrderStatus, to: OrderStatus) -> bool {
    allowed_transitions(from).contains(&to)
}

/// Explicit (operator-driven) status changes
#[derive(Clone)]
pub struct OrderStateMachine {
    pool: SqlitePool,
    reservations: Arc<dyn ReservationService>,
}

impl OrderStateMachine {
    pub fn new(pool: SqlitePool, reservations: Arc<dyn ReservationService>) -> Self {
        Self { pool, reservations }
    }

    /// Validate and apply a transition.
    ///
    /// Status and history are committed together. On cancellation the order's
    /// active reservations are released afterwards, best-effort.
    pub async fn request_transition(&self, req: TransitionRequest) -> OrderResult<TransitionOutcome> {
        let note = req.note.as_deref();
        let actor = req.actor.as_deref();
        validate_optional_text(note, "note", MAX_NOTE_LEN)?;
        validate_optional_text(actor, "actor", MAX_ACTOR_LEN)?;

        let mut tx = begin_write(&self.pool).await?;

        let current = order::find_status(&mut *tx, req.order_id)
            .await?
            .ok_or(OrderError::OrderNotFound(req.order_id))?;

        // An unparseable stored status has no outgoing edges
        let from = match current.parse::<OrderStatus>() {
            Ok(from) if is_valid_transition(from, req.target) => from,
            _ => {
                tracing::info!(
                    order_id = req.order_id,
                    from = %current,
                    to = %req.target,
                    "Transition rejected"
                );
                return Err(OrderError::InvalidTransition {
                    from: current,
                    to: req.target,
                });
            }
        };

        if req.target == OrderStatus::Cancelado {
            validate_cancel_note(note)?;
        }

        status_writer::write_status(
            &mut tx,
            StatusChange {
                order_id: req.order_id,
                expected: &current,
                target: req.target,
                note,
                actor,
                source: StatusChangeSource::Transition,
            },
        )
        .await?;

        tx.commit().await?;

        tracing::info!(
            order_id = req.order_id,
            from = %from,
            to = %req.target,
            "Order status transitioned"
        );
        audit_log!(
            actor.unwrap_or("system"),
            "transition",
            format!("order:{}", req.order_id),
            format!("{from} -> {}", req.target)
        );

        let released_reservations = if req.target == OrderStatus::Cancelado {
            let reason = note.map(str::trim).unwrap_or_default();
            best_effort::release_order_reservations(self.reservations.as_ref(), req.order_id, reason)
                .await
        } else {
            0
        };

        Ok(TransitionOutcome {
            order_id: req.order_id,
            from,
            to: req.target,
            released_reservations,
        })
    }

    /// Status history of an order, oldest first
    pub async fn history(&self, order_id: i64) -> OrderResult<Vec<StatusHistoryEntry>> {
        if order::find_status(&self.pool, order_id).await?.is_none() {
            return Err(OrderError::OrderNotFound(order_id));
        }
        Ok(status_history::find_by_order(&self.pool, order_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EDGES: &[(OrderStatus, OrderStatus)] = &[
        (OrderStatus::Pendente, OrderStatus::Confirmado),
        (OrderStatus::Pendente, OrderStatus::Cancelado),
        (OrderStatus::Confirmado, OrderStatus::Recebimento),
        (OrderStatus::Confirmado, OrderStatus::Recebido),
        (OrderStatus::Confirmado, OrderStatus::EmPreparacao),
        (OrderStatus::Confirmado, OrderStatus::Cancelado),
        (OrderStatus::Recebimento, OrderStatus::Recebido),
        (OrderStatus::Recebimento, OrderStatus::Cancelado),
        (OrderStatus::Recebido, OrderStatus::EmPreparacao),
        (OrderStatus::Recebido, OrderStatus::Faturado),
        (OrderStatus::Recebido, OrderStatus::Cancelado),
        (OrderStatus::EmPreparacao, OrderStatus::Enviado),
        (OrderStatus::EmPreparacao, OrderStatus::Cancelado),
        (OrderStatus::Enviado, OrderStatus::Entregue),
        (OrderStatus::Entregue, OrderStatus::Faturado),
    ];

    #[test]
    fn test_transition_table_is_exactly_the_edge_list() {
        for from in OrderStatus::ALL {
            for to in OrderStatus::ALL {
                assert_eq!(
                    is_valid_transition(from, to),
                    EDGES.contains(&(from, to)),
                    "{from} -> {to}"
                );
            }
        }
    }

    #[test]
    fn test_terminal_states_have_no_edges() {
        for status in OrderStatus::ALL {
            assert_eq!(allowed_transitions(status).is_empty(), status.is_terminal());
        }
    }

    #[test]
    fn test_no_self_loops() {
        for status in OrderStatus::ALL {
            assert!(!is_valid_transition(status, status));
        }
    }

    #[test]
    fn test_confirmation_only_from_pendente() {
        for from in OrderStatus::ALL {
            assert_eq!(
                is_valid_transition(from, OrderStatus::Confirmado),
                from == OrderStatus::Pendente
            );
        }
    }
}
