//! Integrity audit DTOs
//!
//! Issues are produced fresh on every audit run and never persisted one by one.

use serde::{Deserialize, Serialize};

/// 问题严重级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Critical,
    Warning,
    Info,
}

impl Severity {
    /// Points subtracted from the integrity score per issue
    pub const fn penalty(&self) -> u32 {
        match self {
            Severity::Critical => 20,
            Severity::Warning => 5,
            Severity::Info => 1,
        }
    }
}

/// 问题分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueCategory {
    /// Malformed or out-of-domain values
    Data,
    /// Dangling references to users, suppliers, products or contracts
    Reference,
    /// Stored amounts disagreeing with recomputed ones
    Calculation,
    /// Receiving state disagreeing with derived status
    Consistency,
}

/// Machine-readable issue kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueCode {
    MissingUser,
    MissingSupplier,
    MissingProduct,
    MissingContract,
    InactiveContract,
    NoSupplierGroups,
    NoItems,
    NonPositiveQuantity,
    NonPositiveUnitPrice,
    ItemSubtotalMismatch,
    GroupSubtotalMismatch,
    OrderTotalMismatch,
    InvalidOrderStatus,
    InvalidItemStatus,
    ReceivedExceedsOrdered,
    ItemStatusMismatch,
    OrderStatusMismatch,
    AuditFailed,
    OrphanOrders,
    OrphanSupplierGroups,
    OrphanItems,
}

impl IssueCode {
    /// Only these shapes can be corrected deterministically
    pub const fn is_auto_fixable(&self) -> bool {
        matches!(
            self,
            IssueCode::ItemSubtotalMismatch | IssueCode::OrderTotalMismatch
        )
    }
}

/// Entity an issue is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum IssueTarget {
    Order(i64),
    SupplierGroup(i64),
    Item(i64),
    /// Dataset-wide structural finding
    System,
}

/// A single detected inconsistency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegrityIssue {
    pub severity: Severity,
    pub category: IssueCategory,
    pub code: IssueCode,
    pub target: IssueTarget,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observed: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl IntegrityIssue {
    pub fn new(
        severity: Severity,
        category: IssueCategory,
        code: IssueCode,
        target: IssueTarget,
        description: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            category,
            code,
            target,
            description: description.into(),
            field: None,
            expected: None,
            observed: None,
            suggestion: None,
        }
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    pub fn with_values(mut self, expected: impl ToString, observed: impl ToString) -> Self {
        self.expected = Some(expected.to_string());
        self.observed = Some(observed.to_string());
        self
    }

    pub fn with_observed(mut self, observed: impl ToString) -> Self {
        self.observed = Some(observed.to_string());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

/// Per-severity issue counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueCounts {
    pub critical: usize,
    pub warning: usize,
    pub info: usize,
}

impl IssueCounts {
    pub fn from_issues<'a>(issues: impl IntoIterator<Item = &'a IntegrityIssue>) -> Self {
        let mut counts = Self::default();
        for issue in issues {
            counts.add(issue.severity);
        }
        counts
    }

    pub fn add(&mut self, severity: Severity) {
        match severity {
            Severity::Critical => self.critical += 1,
            Severity::Warning => self.warning += 1,
            Severity::Info => self.info += 1,
        }
    }

    pub fn merge(&mut self, other: &IssueCounts) {
        self.critical += other.critical;
        self.warning += other.warning;
        self.info += other.info;
    }

    pub fn total(&self) -> usize {
        self.critical + self.warning + self.info
    }
}

/// Audit result for one order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntegrityReport {
    pub order_id: i64,
    pub order_number: String,
    /// Raw stored status (may be outside the defined states)
    pub status: String,
    pub issues: Vec<IntegrityIssue>,
    /// 0–100
    pub score: u8,
    pub recommendations: Vec<String>,
    pub counts: IssueCounts,
    pub audited_at: i64,
}

impl IntegrityReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Audit result for the whole dataset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemIntegrityReport {
    pub total_orders: usize,
    /// Orders whose audit completed
    pub audited_orders: usize,
    /// Orders whose audit raised an error (reported as CRITICAL issues)
    pub failed_orders: usize,
    pub orders_with_issues: usize,
    /// Counts across every order report and structural issue
    pub counts: IssueCounts,
    /// Mean score of audited orders (100 when there are none)
    pub average_score: f64,
    /// Reports of orders with at least one issue
    pub order_reports: Vec<IntegrityReport>,
    /// Orphan-reference findings and per-order audit failures
    pub structural_issues: Vec<IntegrityIssue>,
    pub generated_at: i64,
}

/// Outcome of an automatic correction pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutoFixResult {
    pub order_id: i64,
    pub fixed: usize,
    pub unresolved: Vec<IntegrityIssue>,
    pub log: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_counts() {
        let issues = vec![
            IntegrityIssue::new(
                Severity::Critical,
                IssueCategory::Calculation,
                IssueCode::ItemSubtotalMismatch,
                IssueTarget::Item(1),
                "x",
            ),
            IntegrityIssue::new(
                Severity::Warning,
                IssueCategory::Reference,
                IssueCode::MissingContract,
                IssueTarget::Item(1),
                "y",
            ),
            IntegrityIssue::new(
                Severity::Critical,
                IssueCategory::Data,
                IssueCode::NoItems,
                IssueTarget::Order(1),
                "z",
            ),
        ];
        let counts = IssueCounts::from_issues(&issues);
        assert_eq!(counts.critical, 2);
        assert_eq!(counts.warning, 1);
        assert_eq!(counts.info, 0);
        assert_eq!(counts.total(), 3);
    }

    #[test]
    fn test_auto_fixable_codes() {
        assert!(IssueCode::ItemSubtotalMismatch.is_auto_fixable());
        assert!(IssueCode::OrderTotalMismatch.is_auto_fixable());
        assert!(!IssueCode::GroupSubtotalMismatch.is_auto_fixable());
        assert!(!IssueCode::MissingProduct.is_auto_fixable());
        assert!(!IssueCode::NonPositiveQuantity.is_auto_fixable());
    }

    #[test]
    fn test_issue_serialization_shape() {
        let issue = IntegrityIssue::new(
            Severity::Critical,
            IssueCategory::Calculation,
            IssueCode::ItemSubtotalMismatch,
            IssueTarget::Item(9),
            "Subtotal mismatch",
        )
        .with_field("subtotal")
        .with_values("20.00", "25.00");

        let json = serde_json::to_value(&issue).unwrap();
        assert_eq!(json["severity"], "CRITICAL");
        assert_eq!(json["category"], "CALCULATION");
        assert_eq!(json["code"], "ITEM_SUBTOTAL_MISMATCH");
        assert_eq!(json["target"]["kind"], "item");
        assert_eq!(json["target"]["id"], 9);
        assert_eq!(json["expected"], "20.00");
        assert!(json.get("suggestion").is_none());
    }
}
