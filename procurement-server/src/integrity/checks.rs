//! Integrity checks
//!
//! Pure functions over an [`OrderAggregate`] snapshot. Loading happens in
//! the auditor; nothing here touches the database.

use crate::orders::money::{exceeds_tolerance, format_money, line_subtotal, sum_money, to_decimal};
use crate::orders::receiving::derive_item_status;
use rust_decimal::Decimal;
use shared::models::{
    IntegrityIssue, IssueCategory, IssueCode, IssueTarget, OrderItem, OrderSupplierGroup,
    PurchaseOrder, Severity,
};
use shared::order::{ItemStatus, OrderStatus};
use std::collections::{HashMap, HashSet};

/// Which references of an order resolve
#[derive(Debug, Clone, Default)]
pub struct ReferenceSnapshot {
    pub user_exists: bool,
    pub missing_suppliers: HashSet<i64>,
    pub missing_products: HashSet<i64>,
    /// contract id → active flag; absent key = contract does not exist
    pub contracts: HashMap<i64, bool>,
}

/// Everything the checks need about one order
#[derive(Debug, Clone)]
pub struct OrderAggregate {
    pub order: PurchaseOrder,
    pub groups: Vec<OrderSupplierGroup>,
    pub items: Vec<OrderItem>,
    /// item id → accumulated received quantity
    pub received: HashMap<i64, f64>,
    pub refs: ReferenceSnapshot,
}

impl OrderAggregate {
    pub fn items_of_group(&self, group_id: i64) -> impl Iterator<Item = &OrderItem> {
        self.items
            .iter()
            .filter(move |i| i.order_supplier_id == group_id)
    }

    /// Σ quantity × unit price over every item
    pub fn computed_total(&self) -> Decimal {
        sum_money(self.items.iter().map(|i| line_subtotal(i.quantity, i.unit_price)))
    }

    pub fn has_non_positive_inputs(&self) -> bool {
        self.items
            .iter()
            .any(|i| i.quantity <= 0.0 || i.unit_price <= 0.0)
    }
}

/// Run every check, in a stable order
pub fn run_checks(agg: &OrderAggregate) -> Vec<IntegrityIssue> {
    let mut issues = Vec::new();
    check_references(agg, &mut issues);
    check_existence(agg, &mut issues);
    check_item_calculations(agg, &mut issues);
    check_group_calculations(agg, &mut issues);
    check_order_total(agg, &mut issues);
    check_order_status(agg, &mut issues);
    check_receiving_consistency(agg, &mut issues);
    issues
}

// ============================================================================
// Referential
// ============================================================================

fn check_references(agg: &OrderAggregate, issues: &mut Vec<IntegrityIssue>) {
    let order_id = agg.order.id;

    if !agg.refs.user_exists {
        let observed = agg
            .order
            .user_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "null".into());
        issues.push(
            IntegrityIssue::new(
                Severity::Critical,
                IssueCategory::Reference,
                IssueCode::MissingUser,
                IssueTarget::Order(order_id),
                format!("Order {} references a user that does not exist", agg.order.order_number),
            )
            .with_field("user_id")
            .with_observed(observed)
            .with_suggestion("Reassign the order to an existing user"),
        );
    }

    for group in &agg.groups {
        if agg.refs.missing_suppliers.contains(&group.supplier_id) {
            issues.push(
                IntegrityIssue::new(
                    Severity::Critical,
                    IssueCategory::Reference,
                    IssueCode::MissingSupplier,
                    IssueTarget::SupplierGroup(group.id),
                    format!("Supplier group {} references missing supplier {}", group.id, group.supplier_id),
                )
                .with_field("supplier_id")
                .with_observed(group.supplier_id)
                .with_suggestion("Restore the supplier or move the items to an existing supplier"),
            );
        }
    }

    for item in &agg.items {
        if agg.refs.missing_products.contains(&item.product_id) {
            issues.push(
                IntegrityIssue::new(
                    Severity::Critical,
                    IssueCategory::Reference,
                    IssueCode::MissingProduct,
                    IssueTarget::Item(item.id),
                    format!("Item {} references missing product {}", item.id, item.product_id),
                )
                .with_field("product_id")
                .with_observed(item.product_id)
                .with_suggestion("Restore the product or replace the item"),
            );
        }

        let Some(contract_id) = item.contract_id else {
            continue;
        };
        match agg.refs.contracts.get(&contract_id) {
            None => issues.push(
                IntegrityIssue::new(
                    Severity::Warning,
                    IssueCategory::Reference,
                    IssueCode::MissingContract,
                    IssueTarget::Item(item.id),
                    format!("Item {} references missing contract {contract_id}", item.id),
                )
                .with_field("contract_id")
                .with_observed(contract_id)
                .with_suggestion("Link the item to an existing contract"),
            ),
            Some(false) => issues.push(
                IntegrityIssue::new(
                    Severity::Warning,
                    IssueCategory::Reference,
                    IssueCode::InactiveContract,
                    IssueTarget::Item(item.id),
                    format!("Item {} references inactive contract {contract_id}", item.id),
                )
                .with_field("contract_id")
                .with_observed(contract_id)
                .with_suggestion("Check whether the contract was closed before the order"),
            ),
            Some(true) => {}
        }
    }
}

// ============================================================================
// Existence
// ============================================================================

fn check_existence(agg: &OrderAggregate, issues: &mut Vec<IntegrityIssue>) {
    let target = IssueTarget::Order(agg.order.id);
    if agg.groups.is_empty() {
        issues.push(
            IntegrityIssue::new(
                Severity::Critical,
                IssueCategory::Data,
                IssueCode::NoSupplierGroups,
                target,
                "Order has no supplier groups (no fulfillable content)",
            )
            .with_suggestion("Add supplier groups and items or cancel the order"),
        );
    } else if agg.items.is_empty() {
        issues.push(
            IntegrityIssue::new(
                Severity::Critical,
                IssueCategory::Data,
                IssueCode::NoItems,
                target,
                "Order has no items (no fulfillable content)",
            )
            .with_suggestion("Add items or cancel the order"),
        );
    }
}

// ============================================================================
// Calculation
// ============================================================================

fn check_item_calculations(agg: &OrderAggregate, issues: &mut Vec<IntegrityIssue>) {
    for item in &agg.items {
        let target = IssueTarget::Item(item.id);

        if item.quantity <= 0.0 {
            issues.push(
                IntegrityIssue::new(
                    Severity::Critical,
                    IssueCategory::Data,
                    IssueCode::NonPositiveQuantity,
                    target,
                    format!("Item {} has non-positive quantity", item.id),
                )
                .with_field("quantity")
                .with_observed(item.quantity),
            );
        }
        if item.unit_price <= 0.0 {
            issues.push(
                IntegrityIssue::new(
                    Severity::Critical,
                    IssueCategory::Data,
                    IssueCode::NonPositiveUnitPrice,
                    target,
                    format!("Item {} has non-positive unit price", item.id),
                )
                .with_field("unit_price")
                .with_observed(item.unit_price),
            );
        }

        let expected = line_subtotal(item.quantity, item.unit_price);
        let stored = to_decimal(item.subtotal);
        if exceeds_tolerance(expected, stored) {
            issues.push(
                IntegrityIssue::new(
                    Severity::Critical,
                    IssueCategory::Calculation,
                    IssueCode::ItemSubtotalMismatch,
                    target,
                    format!("Item {} subtotal does not equal quantity × unit price", item.id),
                )
                .with_field("subtotal")
                .with_values(format_money(expected), format_money(stored))
                .with_suggestion("Rewrite the subtotal to quantity × unit price"),
            );
        }
    }
}

fn check_group_calculations(agg: &OrderAggregate, issues: &mut Vec<IntegrityIssue>) {
    for group in &agg.groups {
        let expected = sum_money(
            agg.items_of_group(group.id)
                .map(|i| line_subtotal(i.quantity, i.unit_price)),
        );
        let stored = to_decimal(group.subtotal);
        if exceeds_tolerance(expected, stored) {
            issues.push(
                IntegrityIssue::new(
                    Severity::Warning,
                    IssueCategory::Calculation,
                    IssueCode::GroupSubtotalMismatch,
                    IssueTarget::SupplierGroup(group.id),
                    format!("Supplier group {} subtotal does not equal the sum of its items", group.id),
                )
                .with_field("subtotal")
                .with_values(format_money(expected), format_money(stored))
                .with_suggestion("Recalculate the supplier group subtotal"),
            );
        }
    }
}

fn check_order_total(agg: &OrderAggregate, issues: &mut Vec<IntegrityIssue>) {
    let expected = agg.computed_total();
    let stored = to_decimal(agg.order.total_value);
    if exceeds_tolerance(expected, stored) {
        issues.push(
            IntegrityIssue::new(
                Severity::Critical,
                IssueCategory::Calculation,
                IssueCode::OrderTotalMismatch,
                IssueTarget::Order(agg.order.id),
                format!(
                    "Order {} total does not equal the sum of its items",
                    agg.order.order_number
                ),
            )
            .with_field("total_value")
            .with_values(format_money(expected), format_money(stored))
            .with_suggestion("Rewrite the order total to the sum of item subtotals"),
        );
    }
}

// ============================================================================
// Domain validity
// ============================================================================

fn check_order_status(agg: &OrderAggregate, issues: &mut Vec<IntegrityIssue>) {
    if agg.order.status.parse::<OrderStatus>().is_err() {
        issues.push(
            IntegrityIssue::new(
                Severity::Critical,
                IssueCategory::Data,
                IssueCode::InvalidOrderStatus,
                IssueTarget::Order(agg.order.id),
                format!("Order status {:?} is not a defined state", agg.order.status),
            )
            .with_field("status")
            .with_observed(&agg.order.status)
            .with_suggestion("Set the status manually to one of the defined states"),
        );
    }
}

// ============================================================================
// Receiving consistency
// ============================================================================

fn check_receiving_consistency(agg: &OrderAggregate, issues: &mut Vec<IntegrityIssue>) {
    let mut outstanding = 0usize;

    for item in &agg.items {
        let target = IssueTarget::Item(item.id);
        let ordered = to_decimal(item.quantity);
        let received_raw = agg.received.get(&item.id).copied().unwrap_or(0.0);
        let received = to_decimal(received_raw);

        if received < ordered {
            outstanding += 1;
        }

        if received > ordered {
            issues.push(
                IntegrityIssue::new(
                    Severity::Critical,
                    IssueCategory::Consistency,
                    IssueCode::ReceivedExceedsOrdered,
                    target,
                    format!("Item {} received more than was ordered", item.id),
                )
                .with_field("quantity_received")
                .with_values(item.quantity, received_raw)
                .with_suggestion("Review the receiving records of this item"),
            );
        }

        match item.status.parse::<ItemStatus>() {
            Err(_) => issues.push(
                IntegrityIssue::new(
                    Severity::Warning,
                    IssueCategory::Data,
                    IssueCode::InvalidItemStatus,
                    target,
                    format!("Item status {:?} is not a defined state", item.status),
                )
                .with_field("status")
                .with_observed(&item.status),
            ),
            Ok(stored) => {
                let expected = derive_item_status(received, ordered);
                if stored != expected {
                    issues.push(
                        IntegrityIssue::new(
                            Severity::Warning,
                            IssueCategory::Consistency,
                            IssueCode::ItemStatusMismatch,
                            target,
                            format!("Item {} status disagrees with its received quantity", item.id),
                        )
                        .with_field("status")
                        .with_values(expected, stored)
                        .with_suggestion("Record a receipt or correct the item status"),
                    );
                }
            }
        }
    }

    if agg.order.status == OrderStatus::Recebido.as_str() && outstanding > 0 {
        issues.push(
            IntegrityIssue::new(
                Severity::Warning,
                IssueCategory::Consistency,
                IssueCode::OrderStatusMismatch,
                IssueTarget::Order(agg.order.id),
                format!("Order is RECEBIDO but {outstanding} item(s) are not fully received"),
            )
            .with_field("status")
            .with_suggestion("Recompute the order status from its items"),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(total: f64, status: &str) -> PurchaseOrder {
        PurchaseOrder {
            id: 1,
            order_number: "PED-1".into(),
            status: status.into(),
            total_value: total,
            notes: None,
            user_id: Some(1),
            created_at: 0,
            updated_at: 0,
        }
    }

    fn group(id: i64, subtotal: f64) -> OrderSupplierGroup {
        OrderSupplierGroup {
            id,
            order_id: 1,
            supplier_id: 100 + id,
            subtotal,
            status: "PENDENTE".into(),
            created_at: 0,
            updated_at: 0,
        }
    }

    fn item(id: i64, group: i64, q: f64, p: f64, subtotal: f64) -> OrderItem {
        OrderItem {
            id,
            order_supplier_id: group,
            product_id: 200 + id,
            contract_id: None,
            quantity: q,
            unit_price: p,
            subtotal,
            status: "PENDENTE".into(),
            created_at: 0,
            updated_at: 0,
        }
    }

    fn clean_aggregate() -> OrderAggregate {
        OrderAggregate {
            order: order(20.0, "CONFIRMADO"),
            groups: vec![group(1, 20.0)],
            items: vec![item(1, 1, 10.0, 2.0, 20.0)],
            received: HashMap::new(),
            refs: ReferenceSnapshot {
                user_exists: true,
                ..Default::default()
            },
        }
    }

    fn codes(issues: &[IntegrityIssue]) -> Vec<IssueCode> {
        issues.iter().map(|i| i.code).collect()
    }

    #[test]
    fn test_clean_order_has_no_issues() {
        assert!(run_checks(&clean_aggregate()).is_empty());
    }

    #[test]
    fn test_corrupted_item_subtotal_is_single_critical() {
        let mut agg = clean_aggregate();
        agg.items[0].subtotal = 25.0;
        let issues = run_checks(&agg);
        assert_eq!(codes(&issues), vec![IssueCode::ItemSubtotalMismatch]);
        assert_eq!(issues[0].severity, Severity::Critical);
        assert_eq!(issues[0].target, IssueTarget::Item(1));
        assert_eq!(issues[0].expected.as_deref(), Some("20.00"));
        assert_eq!(issues[0].observed.as_deref(), Some("25.00"));
    }

    #[test]
    fn test_tolerance_is_inclusive() {
        let mut agg = clean_aggregate();
        agg.items[0].subtotal = 20.01;
        agg.order.total_value = 19.99;
        assert!(run_checks(&agg).is_empty());
    }

    #[test]
    fn test_group_and_order_mismatch() {
        let mut agg = clean_aggregate();
        agg.groups[0].subtotal = 30.0;
        agg.order.total_value = 30.0;
        let issues = run_checks(&agg);
        assert_eq!(
            codes(&issues),
            vec![IssueCode::GroupSubtotalMismatch, IssueCode::OrderTotalMismatch]
        );
        assert_eq!(issues[0].severity, Severity::Warning);
        assert_eq!(issues[1].severity, Severity::Critical);
    }

    #[test]
    fn test_missing_references() {
        let mut agg = clean_aggregate();
        agg.refs.user_exists = false;
        agg.refs.missing_suppliers.insert(101);
        agg.refs.missing_products.insert(201);
        agg.items[0].contract_id = Some(9);
        let issues = run_checks(&agg);
        assert_eq!(
            codes(&issues),
            vec![
                IssueCode::MissingUser,
                IssueCode::MissingSupplier,
                IssueCode::MissingProduct,
                IssueCode::MissingContract,
            ]
        );
        assert_eq!(issues[3].severity, Severity::Warning);
    }

    #[test]
    fn test_inactive_contract_is_warning() {
        let mut agg = clean_aggregate();
        agg.items[0].contract_id = Some(9);
        agg.refs.contracts.insert(9, false);
        let issues = run_checks(&agg);
        assert_eq!(codes(&issues), vec![IssueCode::InactiveContract]);

        agg.refs.contracts.insert(9, true);
        assert!(run_checks(&agg).is_empty());
    }

    #[test]
    fn test_empty_order_is_one_critical() {
        let mut agg = clean_aggregate();
        agg.items.clear();
        agg.groups.clear();
        agg.order.total_value = 0.0;
        assert_eq!(codes(&run_checks(&agg)), vec![IssueCode::NoSupplierGroups]);

        agg.groups.push(group(1, 0.0));
        assert_eq!(codes(&run_checks(&agg)), vec![IssueCode::NoItems]);
    }

    #[test]
    fn test_non_positive_values() {
        let mut agg = clean_aggregate();
        agg.items[0] = item(1, 1, 0.0, -1.0, 0.0);
        agg.groups[0].subtotal = 0.0;
        agg.order.total_value = 0.0;
        let issues = run_checks(&agg);
        assert!(codes(&issues).contains(&IssueCode::NonPositiveQuantity));
        assert!(codes(&issues).contains(&IssueCode::NonPositiveUnitPrice));
    }

    #[test]
    fn test_unknown_order_status() {
        let mut agg = clean_aggregate();
        agg.order.status = "ARQUIVADO".into();
        let issues = run_checks(&agg);
        assert_eq!(codes(&issues), vec![IssueCode::InvalidOrderStatus]);
        assert_eq!(issues[0].severity, Severity::Critical);
    }

    #[test]
    fn test_receiving_consistency() {
        let mut agg = clean_aggregate();
        agg.received.insert(1, 12.0);
        agg.items[0].status = "RECEBIDO".into();
        let issues = run_checks(&agg);
        assert_eq!(codes(&issues), vec![IssueCode::ReceivedExceedsOrdered]);

        let mut agg = clean_aggregate();
        agg.received.insert(1, 4.0);
        let issues = run_checks(&agg);
        assert_eq!(codes(&issues), vec![IssueCode::ItemStatusMismatch]);
        assert_eq!(issues[0].expected.as_deref(), Some("PARCIAL"));

        let mut agg = clean_aggregate();
        agg.items[0].status = "parcial".into();
        assert_eq!(codes(&run_checks(&agg)), vec![IssueCode::InvalidItemStatus]);

        let mut agg = clean_aggregate();
        agg.order.status = "RECEBIDO".into();
        assert_eq!(codes(&run_checks(&agg)), vec![IssueCode::OrderStatusMismatch]);
    }
}
