//! Order lifecycle
//!
//! - `state_machine`: explicit transitions (operator)
//! - `receiving`: receipt accumulation per item
//! - `status_deriver`: order status from item receiving state
//! - `status_writer`: the single guarded writer both of them use
//! - `summary`: receiving progress read model

pub mod error;
pub mod money;
pub mod receiving;
pub mod state_machine;
pub mod status_deriver;
pub mod status_writer;
pub mod summary;

pub use error::{OrderError, OrderResult};
pub use receiving::ReceivingService;
pub use state_machine::{OrderStateMachine, allowed_transitions, is_valid_transition};
pub use status_deriver::{DerivedStatus, recompute_order_status};
pub use summary::receiving_summary;
