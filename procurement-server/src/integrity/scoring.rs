//! Integrity score and recommendations

use shared::models::{IntegrityIssue, IssueCategory, IssueCounts};

pub const MAX_SCORE: u32 = 100;

/// 100 minus the severity penalties, floored at 0
pub fn score(issues: &[IntegrityIssue]) -> u8 {
    let penalty: u32 = issues.iter().map(|i| i.severity.penalty()).sum();
    MAX_SCORE.saturating_sub(penalty) as u8
}

/// Deterministic recommendations derived from the issue list.
///
/// Empty when there are no issues.
pub fn recommendations(issues: &[IntegrityIssue]) -> Vec<String> {
    if issues.is_empty() {
        return Vec::new();
    }

    let counts = IssueCounts::from_issues(issues);
    let has = |category: IssueCategory| issues.iter().any(|i| i.category == category);
    let mut out = Vec::new();

    if counts.critical > 0 {
        out.push(format!(
            "Resolve {} critical issue(s) before advancing this order",
            counts.critical
        ));
    }
    if has(IssueCategory::Reference) {
        out.push("Restore or reassign missing references (users, suppliers, products, contracts)".into());
    }
    if has(IssueCategory::Calculation) {
        out.push("Recalculate subtotals and totals; run auto-fix for item subtotals and order totals".into());
    }
    if has(IssueCategory::Data) {
        out.push("Correct invalid values (quantities, prices, statuses) manually".into());
    }
    if has(IssueCategory::Consistency) {
        out.push("Review receiving records and recompute statuses".into());
    }
    if counts.critical == 0 && counts.warning > 0 {
        out.push(format!(
            "Only warnings found ({}); review them at the next maintenance window",
            counts.warning
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{IssueCode, IssueTarget, Severity};

    fn issue(severity: Severity, category: IssueCategory) -> IntegrityIssue {
        IntegrityIssue::new(severity, category, IssueCode::NoItems, IssueTarget::Order(1), "x")
    }

    #[test]
    fn test_score() {
        assert_eq!(score(&[]), 100);
        assert_eq!(score(&[issue(Severity::Critical, IssueCategory::Calculation)]), 80);
        assert_eq!(
            score(&[
                issue(Severity::Critical, IssueCategory::Data),
                issue(Severity::Warning, IssueCategory::Reference),
                issue(Severity::Info, IssueCategory::Data),
            ]),
            74
        );
    }

    #[test]
    fn test_score_floor() {
        let issues: Vec<_> = (0..6)
            .map(|_| issue(Severity::Critical, IssueCategory::Data))
            .collect();
        assert_eq!(score(&issues), 0);
    }

    #[test]
    fn test_recommendations() {
        assert!(recommendations(&[]).is_empty());

        let recs = recommendations(&[
            issue(Severity::Critical, IssueCategory::Calculation),
            issue(Severity::Critical, IssueCategory::Calculation),
        ]);
        assert_eq!(recs.len(), 2);
        assert!(recs[0].contains("2 critical"));
        assert!(recs[1].contains("auto-fix"));

        let recs = recommendations(&[issue(Severity::Warning, IssueCategory::Reference)]);
        assert_eq!(recs.len(), 2);
        assert!(recs[1].starts_with("Only warnings"));
    }

    #[test]
    fn test_recommendations_are_deterministic() {
        let issues = vec![
            issue(Severity::Warning, IssueCategory::Consistency),
            issue(Severity::Critical, IssueCategory::Reference),
        ];
        assert_eq!(recommendations(&issues), recommendations(&issues));
    }
}
