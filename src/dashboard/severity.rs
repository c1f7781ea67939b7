use std::str::FromStr;

use strum::{EnumIter, EnumString, IntoEnumIterator};

/// Display rank of an alert severity. Variants are declared in sort order,
/// so the derived `Ord` is the dashboard's ordering. Any severity string that
/// is not one of the four known levels lands in `Unranked`, which always
/// sorts last.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SeverityRank {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
    #[strum(disabled)]
    Unranked = 4,
}

impl SeverityRank {
    pub fn of(severity: &str) -> Self {
        SeverityRank::from_str(severity.trim()).unwrap_or(SeverityRank::Unranked)
    }

    pub fn as_i64(&self) -> i64 {
        *self as i64
    }

    /// The four named levels, highest first.
    pub fn ranked() -> impl Iterator<Item = SeverityRank> {
        SeverityRank::iter().filter(|rank| *rank != SeverityRank::Unranked)
    }

    pub fn badge_class(&self) -> &'static str {
        match self {
            SeverityRank::Critical => "badge-critical",
            SeverityRank::High => "badge-high",
            SeverityRank::Medium => "badge-medium",
            SeverityRank::Low => "badge-low",
            SeverityRank::Unranked => "badge-info",
        }
    }

    pub fn full_name(&self) -> &'static str {
        match self {
            SeverityRank::Critical => "Critical",
            SeverityRank::High => "High",
            SeverityRank::Medium => "Medium",
            SeverityRank::Low => "Low",
            SeverityRank::Unranked => "Other",
        }
    }
}

/// Stable sort by severity rank: equal ranks keep their incoming order.
pub fn sort_by_severity<T, F>(items: &mut [T], severity: F)
where
    F: Fn(&T) -> &str,
{
    items.sort_by_key(|item| SeverityRank::of(severity(item)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_rank_values() {
        assert_eq!(SeverityRank::of("critical").as_i64(), 0);
        assert_eq!(SeverityRank::of("high").as_i64(), 1);
        assert_eq!(SeverityRank::of("medium").as_i64(), 2);
        assert_eq!(SeverityRank::of("low").as_i64(), 3);
        assert_eq!(SeverityRank::of("informational").as_i64(), 4);
    }

    #[test]
    fn test_rank_is_case_insensitive() {
        assert_eq!(SeverityRank::of("CRITICAL"), SeverityRank::Critical);
        assert_eq!(SeverityRank::of(" High "), SeverityRank::High);
    }

    #[test]
    fn test_unranked_is_not_parseable_by_name() {
        assert_eq!(SeverityRank::of("unranked"), SeverityRank::Unranked);
        assert!(SeverityRank::from_str("unranked").is_err());
        assert_eq!(SeverityRank::of(""), SeverityRank::Unranked);
    }

    #[test]
    fn test_ranked_excludes_fallback_bucket() {
        let ranked: Vec<_> = SeverityRank::ranked().collect();
        assert_eq!(
            ranked,
            vec![
                SeverityRank::Critical,
                SeverityRank::High,
                SeverityRank::Medium,
                SeverityRank::Low
            ]
        );
    }

    #[test]
    fn test_sort_keeps_arrival_order_for_ties() {
        let mut items = vec![
            ("a", "low"),
            ("b", "weird"),
            ("c", "critical"),
            ("d", "LOW"),
            ("e", "critical"),
            ("f", "medium"),
        ];
        sort_by_severity(&mut items, |item| item.1);
        let order: Vec<&str> = items.iter().map(|item| item.0).collect();
        assert_eq!(order, vec!["c", "e", "f", "a", "d", "b"]);
    }

    fn severity_strategy() -> impl Strategy<Value = String> {
        prop_oneof![
            Just("critical".to_string()),
            Just("high".to_string()),
            Just("Medium".to_string()),
            Just("low".to_string()),
            "[a-z]{0,8}",
        ]
    }

    proptest! {
        #[test]
        fn prop_severity_sort_is_idempotent(
            severities in proptest::collection::vec(severity_strategy(), 0..40)
        ) {
            let mut items: Vec<(usize, String)> = severities.into_iter().enumerate().collect();
            sort_by_severity(&mut items, |item| item.1.as_str());
            let once = items.clone();
            sort_by_severity(&mut items, |item| item.1.as_str());
            prop_assert_eq!(once, items);
        }

        #[test]
        fn prop_sorted_ranks_are_non_decreasing(
            severities in proptest::collection::vec(severity_strategy(), 0..40)
        ) {
            let mut items = severities;
            sort_by_severity(&mut items, |s| s.as_str());
            let ranks: Vec<SeverityRank> = items.iter().map(|s| SeverityRank::of(s)).collect();
            prop_assert!(ranks.windows(2).all(|w| w[0] <= w[1]));
        }
    }
}
