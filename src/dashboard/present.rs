//! Presentation rules shared by the list and detail views: how scores,
//! categories, priorities and predictions turn into labels and styles.

use serde_json::Value;

/// Circumference used by the confidence gauges (r = 45 in a 100x100 box).
pub const GAUGE_CIRCUMFERENCE: f64 = 283.0;

/// A [0,1] score as a rounded whole percentage.
pub fn percent(value: f64) -> i64 {
    (value * 100.0).round() as i64
}

/// Stroke dash offset that fills the gauge in proportion to the percentage.
pub fn gauge_offset(value: f64) -> f64 {
    GAUGE_CIRCUMFERENCE - (GAUGE_CIRCUMFERENCE * percent(value) as f64) / 100.0
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ConfidenceBand {
    Alarming,
    Caution,
    Calm,
}

impl ConfidenceBand {
    pub fn of(confidence: f64) -> Self {
        if confidence >= 0.9 {
            ConfidenceBand::Alarming
        } else if confidence >= 0.7 {
            ConfidenceBand::Caution
        } else {
            ConfidenceBand::Calm
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            ConfidenceBand::Alarming => "conf-alarming",
            ConfidenceBand::Caution => "conf-caution",
            ConfidenceBand::Calm => "conf-calm",
        }
    }
}

/// `data_exfiltration` → `Data Exfiltration`. Underscores become spaces and
/// the first letter of every word is upper-cased; the rest is left alone.
pub fn humanize_category(category: &str) -> String {
    let mut out = String::with_capacity(category.len());
    let mut at_word_start = true;
    for c in category.chars() {
        let c = if c == '_' { ' ' } else { c };
        if at_word_start && c.is_alphanumeric() {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        at_word_start = !c.is_alphanumeric();
    }
    out
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PriorityLevel {
    Critical,
    High,
    Medium,
}

impl PriorityLevel {
    /// 1 and 2 are named; every other value is shown as Medium.
    pub fn of(priority: i64) -> Self {
        match priority {
            1 => PriorityLevel::Critical,
            2 => PriorityLevel::High,
            _ => PriorityLevel::Medium,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PriorityLevel::Critical => "Critical",
            PriorityLevel::High => "High",
            PriorityLevel::Medium => "Medium",
        }
    }

    pub fn rank_class(&self) -> &'static str {
        match self {
            PriorityLevel::Critical => "p1",
            PriorityLevel::High => "p2",
            PriorityLevel::Medium => "p3",
        }
    }

    pub fn badge_class(&self) -> &'static str {
        match self {
            PriorityLevel::Critical => "badge-danger",
            PriorityLevel::High => "badge-high",
            PriorityLevel::Medium => "badge-info",
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PredictionTone {
    Benign,
    Malicious,
}

impl PredictionTone {
    /// Only an exact "BENIGN" reads as benign.
    pub fn of(prediction: &str) -> Self {
        if prediction == "BENIGN" {
            PredictionTone::Benign
        } else {
            PredictionTone::Malicious
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            PredictionTone::Benign => "tone-safe",
            PredictionTone::Malicious => "tone-danger",
        }
    }

    pub fn marker(&self) -> &'static str {
        match self {
            PredictionTone::Benign => "🟢",
            PredictionTone::Malicious => "🔴",
        }
    }
}

pub fn classification_label(is_true_positive: bool) -> &'static str {
    if is_true_positive {
        "True Positive"
    } else {
        "False Positive"
    }
}

pub fn classification_advice(is_true_positive: bool) -> &'static str {
    if is_true_positive {
        "Immediate investigation is recommended."
    } else {
        "Review and validate before escalation."
    }
}

pub fn confirmation_label(is_true_positive: bool) -> &'static str {
    if is_true_positive {
        "⚠️ Confirmed"
    } else {
        "✅ Not Confirmed"
    }
}

/// Tone of the true-positive card: a confirmed alert is the dangerous case.
pub fn confirmation_class(is_true_positive: bool) -> &'static str {
    if is_true_positive {
        "tone-danger"
    } else {
        "tone-safe"
    }
}

/// One line of the raw record dump.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpLine {
    /// Right-aligned to two columns
    pub number: String,
    /// Text up to and including the first `:`, when the line has one
    pub key: Option<String>,
    pub rest: String,
}

/// Pretty-prints the record (two-space indent) and splits each line at its
/// first colon so keys and values can be styled apart.
pub fn dump_lines(record: &Value) -> Vec<DumpLine> {
    let pretty = serde_json::to_string_pretty(record).unwrap_or_else(|_| record.to_string());
    pretty
        .lines()
        .enumerate()
        .map(|(i, line)| {
            let number = format!("{:>2}", i + 1);
            match line.find(':') {
                Some(idx) => DumpLine {
                    number,
                    key: Some(line[..=idx].to_owned()),
                    rest: line[idx + 1..].to_owned(),
                },
                None => DumpLine {
                    number,
                    key: None,
                    rest: line.to_owned(),
                },
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_percent_rounds() {
        assert_eq!(percent(0.97), 97);
        assert_eq!(percent(0.886), 89);
        assert_eq!(percent(0.684), 68);
        assert_eq!(percent(0.0), 0);
        assert_eq!(percent(1.0), 100);
    }

    #[test]
    fn test_gauge_offset() {
        assert_eq!(gauge_offset(1.0), 0.0);
        assert_eq!(gauge_offset(0.0), 283.0);
        assert!((gauge_offset(0.5) - 141.5).abs() < 1e-9);
    }

    #[test]
    fn test_confidence_bands() {
        assert_eq!(ConfidenceBand::of(0.97), ConfidenceBand::Alarming);
        assert_eq!(ConfidenceBand::of(0.9), ConfidenceBand::Alarming);
        assert_eq!(ConfidenceBand::of(0.89), ConfidenceBand::Caution);
        assert_eq!(ConfidenceBand::of(0.7), ConfidenceBand::Caution);
        assert_eq!(ConfidenceBand::of(0.69), ConfidenceBand::Calm);
    }

    #[test]
    fn test_humanize_category() {
        assert_eq!(humanize_category("data_exfiltration"), "Data Exfiltration");
        assert_eq!(humanize_category("reconnaissance"), "Reconnaissance");
        assert_eq!(humanize_category("policy_violation"), "Policy Violation");
        assert_eq!(humanize_category("c2-beacon_v2"), "C2-Beacon V2");
        assert_eq!(humanize_category(""), "");
    }

    #[test]
    fn test_priority_levels() {
        assert_eq!(PriorityLevel::of(1).label(), "Critical");
        assert_eq!(PriorityLevel::of(2).label(), "High");
        assert_eq!(PriorityLevel::of(3).label(), "Medium");
        assert_eq!(PriorityLevel::of(7).rank_class(), "p3");
        assert_eq!(PriorityLevel::of(1).badge_class(), "badge-danger");
    }

    #[test]
    fn test_prediction_tone() {
        assert_eq!(PredictionTone::of("BENIGN"), PredictionTone::Benign);
        assert_eq!(PredictionTone::of("MALICIOUS"), PredictionTone::Malicious);
        assert_eq!(PredictionTone::of("benign"), PredictionTone::Malicious);
        assert_eq!(PredictionTone::of("UNKNOWN"), PredictionTone::Malicious);
    }

    #[test]
    fn test_dump_lines_split_at_first_colon() {
        let lines = dump_lines(&json!({"_id": "7", "summary": "a: b"}));
        assert_eq!(
            lines,
            vec![
                DumpLine {
                    number: " 1".to_string(),
                    key: None,
                    rest: "{".to_string()
                },
                DumpLine {
                    number: " 2".to_string(),
                    key: Some("  \"_id\":".to_string()),
                    rest: " \"7\",".to_string()
                },
                DumpLine {
                    number: " 3".to_string(),
                    key: Some("  \"summary\":".to_string()),
                    rest: " \"a: b\"".to_string()
                },
                DumpLine {
                    number: " 4".to_string(),
                    key: None,
                    rest: "}".to_string()
                },
            ]
        );
    }
}
