use std::borrow::Cow;
use std::fmt::Write;

use crate::alerts::{Alert, Recommendation};

use super::present::{
    classification_advice, classification_label, confirmation_class, confirmation_label,
    dump_lines, gauge_offset, humanize_category, percent, ConfidenceBand, PredictionTone,
    PriorityLevel, GAUGE_CIRCUMFERENCE,
};
use super::severity::SeverityRank;
use super::techniques::TechniqueCatalog;
use super::view::{AlertEntry, DashboardView, ViewState};

pub fn escape_html(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 16);
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

fn severity_badge(alert: &Alert) -> String {
    let rank = SeverityRank::of(&alert.severity);
    format!(
        r#"<span class="badge {}">{} {}</span>"#,
        rank.badge_class(),
        severity_icon(rank),
        escape_html(&alert.severity.to_uppercase())
    )
}

fn severity_icon(rank: SeverityRank) -> &'static str {
    match rank {
        SeverityRank::Critical => "🔥",
        SeverityRank::High => "🔴",
        SeverityRank::Medium => "🟡",
        SeverityRank::Low => "🟢",
        SeverityRank::Unranked => "🔵",
    }
}

/// The whole dashboard document. Every detail panel is rendered up front
/// and the page script only switches which one is visible, so selection
/// never goes back to the server.
pub fn render_page(view: &DashboardView, catalog: &TechniqueCatalog) -> String {
    let mut html = String::with_capacity(16 * 1024);
    let in_list = view.state() == ViewState::List;

    let title = match view.selected() {
        Some(entry) => format!("{} · SOC Alert Intelligence", escape_html(&entry.alert.alert_id)),
        None => "SOC Alert Intelligence Dashboard".to_string(),
    };
    let _ = write!(
        html,
        concat!(
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n",
            "<meta charset=\"utf-8\">\n",
            "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n",
            "<title>{}</title>\n",
            "<link rel=\"stylesheet\" href=\"/static/dashboard.css\">\n",
            "</head>\n<body>\n",
        ),
        title
    );

    let _ = write!(
        html,
        concat!(
            "<header class=\"hero\">\n<nav class=\"nav\">\n",
            "<div class=\"brand\" data-action=\"brand\" role=\"button\" tabindex=\"0\">",
            "<span class=\"brand-mark\">S</span>",
            "<span class=\"brand-name\">SOC<span class=\"accent\">Alert</span></span></div>\n",
            "<button class=\"btn-pill btn-primary\" data-action=\"back\"{}>← All Alerts</button>\n",
            "</nav>\n",
            "<div class=\"hero-text\" data-list-only{}>\n",
            "<h1>SOC Alert Intelligence <span class=\"accent\">Dashboard</span></h1>\n",
            "<p>Real-time security event monitoring with AI-driven analysis, ",
            "MITRE ATT&amp;CK mapping, and actionable recommendations.</p>\n",
            "</div>\n</header>\n<main>\n",
        ),
        hidden_attr(in_list),
        hidden_attr(!in_list),
    );

    render_stat_bar(&mut html, view, in_list);
    render_list(&mut html, view, in_list);

    for (index, entry) in view.entries().iter().enumerate() {
        let visible = view.state() == ViewState::Detail(index);
        render_detail(&mut html, index, entry, catalog, visible);
    }

    html.push_str(concat!(
        "</main>\n",
        "<footer class=\"footer\"><span class=\"brand-name\">SOC<span class=\"accent\">Alert</span></span>",
        "<p>Built for Security Operations</p></footer>\n",
        "<script src=\"/static/dashboard.js\"></script>\n",
        "</body>\n</html>\n",
    ));

    html
}

fn hidden_attr(hide: bool) -> &'static str {
    if hide {
        " hidden"
    } else {
        ""
    }
}

fn render_stat_bar(html: &mut String, view: &DashboardView, visible: bool) {
    let counts = view.severity_counts();
    let _ = write!(
        html,
        "<section class=\"stat-bar\" data-list-only{}>\n",
        hidden_attr(!visible)
    );
    let _ = writeln!(
        html,
        "<div class=\"card stat\"><div class=\"stat-label\">Total Alerts</div><div class=\"stat-value\">{}</div></div>",
        counts.total
    );
    for (rank, count) in &counts.by_rank {
        let _ = writeln!(
            html,
            "<div class=\"card stat {}\"><div class=\"stat-label\">{} {}</div><div class=\"stat-value\">{}</div></div>",
            rank.badge_class(),
            severity_icon(*rank),
            rank.full_name(),
            count
        );
    }
    html.push_str("</section>\n");
}

pub fn render_list(html: &mut String, view: &DashboardView, visible: bool) {
    let entries = view.entries();
    let _ = write!(
        html,
        concat!(
            "<section class=\"card alert-table\" data-list-only{}>\n",
            "<div class=\"table-title\"><span class=\"section-title\">All Security Alerts</span>",
            "<span class=\"muted\">{} alerts</span></div>\n",
            "<div class=\"row header\"><span>Alert ID</span><span>Summary</span><span>Category</span>",
            "<span>Severity</span><span>Confidence</span><span class=\"center\">Details</span></div>\n",
        ),
        hidden_attr(!visible),
        entries.len()
    );

    for (index, entry) in entries.iter().enumerate() {
        let alert = &entry.alert;
        let _ = writeln!(
            html,
            concat!(
                "<div class=\"row alert-row\" data-rank=\"{}\" data-select=\"{}\" role=\"button\" tabindex=\"0\">",
                "<span class=\"mono\">{}</span>",
                "<span class=\"summary\" title=\"{}\">{}</span>",
                "<span class=\"muted\">{}</span>",
                "{}",
                "<span class=\"confidence {}\">{}%</span>",
                "<span class=\"center\"><span class=\"open-detail\">›</span></span></div>",
            ),
            entry.rank().as_i64(),
            index,
            escape_html(&alert.alert_id),
            escape_html(&alert.summary),
            escape_html(&alert.summary),
            escape_html(&humanize_category(&alert.category)),
            severity_badge(alert),
            ConfidenceBand::of(alert.confidence).css_class(),
            percent(alert.confidence),
        );
    }

    html.push_str("</section>\n");
}

pub fn render_detail(
    html: &mut String,
    index: usize,
    entry: &AlertEntry,
    catalog: &TechniqueCatalog,
    visible: bool,
) {
    let alert = &entry.alert;
    let _ = writeln!(
        html,
        "<section class=\"detail\" data-detail=\"{}\"{}>",
        index,
        hidden_attr(!visible)
    );

    let _ = writeln!(
        html,
        concat!(
            "<button class=\"link-back\" data-action=\"back\">‹ Back to All Alerts</button>\n",
            "<div class=\"card detail-header\"><div><div class=\"eyebrow\">Alert ID</div>",
            "<div class=\"mono big\">{}</div></div>",
            "<div class=\"badges\">{}<span class=\"badge badge-info\">📁 {}</span></div></div>",
        ),
        escape_html(&alert.alert_id),
        severity_badge(alert),
        escape_html(&humanize_category(&alert.category)),
    );

    let _ = writeln!(
        html,
        concat!(
            "<div class=\"card\"><div class=\"section-title\">Alert Summary</div>",
            "<div class=\"summary-box\"><p class=\"lead\">{}</p>",
            "<p class=\"muted\">This alert was flagged as a <strong class=\"{}\">{}</strong> ",
            "with {}% confidence. {}</p></div></div>",
        ),
        escape_html(&alert.summary),
        confirmation_class(alert.is_true_positive),
        classification_label(alert.is_true_positive),
        percent(alert.confidence),
        classification_advice(alert.is_true_positive),
    );

    html.push_str("<div class=\"grid-2\">\n");
    html.push_str("<div class=\"card\"><div class=\"section-title\">Confidence Scores</div><div class=\"gauges\">");
    render_gauge(html, alert.confidence, "Alert Confidence", "gauge-primary");
    render_gauge(html, alert.ml_confidence, "ML Confidence", "gauge-royal");
    html.push_str("</div></div>\n");

    let tone = PredictionTone::of(&alert.ml_prediction);
    let _ = writeln!(
        html,
        concat!(
            "<div class=\"card\"><div class=\"section-title\">Analysis Status</div>",
            "<div class=\"status-card {}\"><div class=\"eyebrow\">True Positive</div>",
            "<div class=\"status-value\">{}</div></div>",
            "<div class=\"status-card {}\"><div class=\"eyebrow\">ML Prediction</div>",
            "<div class=\"status-value\">{} {}</div></div></div>",
        ),
        confirmation_class(alert.is_true_positive),
        confirmation_label(alert.is_true_positive),
        tone.css_class(),
        tone.marker(),
        escape_html(&alert.ml_prediction),
    );
    html.push_str("</div>\n");

    html.push_str("<div class=\"grid-2\">\n");
    render_techniques(html, &alert.mitre_techniques, catalog);
    render_recommendations(html, &alert.recommendations);
    html.push_str("</div>\n");

    render_dump(html, entry);

    html.push_str("</section>\n");
}

fn render_gauge(html: &mut String, value: f64, label: &str, class: &str) {
    let _ = write!(
        html,
        concat!(
            "<div class=\"gauge {}\"><div class=\"ring\">",
            "<svg width=\"100\" height=\"100\" viewBox=\"0 0 100 100\">",
            "<circle cx=\"50\" cy=\"50\" r=\"45\" class=\"ring-bg\"/>",
            "<circle cx=\"50\" cy=\"50\" r=\"45\" class=\"ring-fill\" ",
            "stroke-dasharray=\"{}\" stroke-dashoffset=\"{}\"/></svg>",
            "<span class=\"ring-label\">{}%</span></div>",
            "<span class=\"gauge-label\">{}</span></div>",
        ),
        class,
        GAUGE_CIRCUMFERENCE,
        gauge_offset(value),
        percent(value),
        label,
    );
}

fn render_techniques(html: &mut String, techniques: &[String], catalog: &TechniqueCatalog) {
    html.push_str("<div class=\"card\"><div class=\"section-title\">MITRE ATT&amp;CK Techniques</div><div class=\"stack\">");
    for code in techniques {
        let _ = write!(
            html,
            concat!(
                "<a class=\"mitre-badge\" href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">",
                "<span class=\"mono\">{}</span><span class=\"mitre-name\">{}</span><span>↗</span></a>",
            ),
            escape_html(&TechniqueCatalog::reference_url(code)),
            escape_html(code),
            escape_html(catalog.display_name(code)),
        );
    }
    html.push_str("</div></div>\n");
}

fn render_recommendations(html: &mut String, recommendations: &[Recommendation]) {
    html.push_str("<div class=\"card\"><div class=\"section-title\">Recommended Actions</div><div class=\"stack\">");
    for rec in recommendations {
        let level = PriorityLevel::of(rec.priority);
        let _ = write!(
            html,
            concat!(
                "<div class=\"rec-card\"><div class=\"rec-number {}\">{}</div>",
                "<div><div class=\"rec-action\">{}</div>",
                "<span class=\"badge {}\">Priority: {}</span></div></div>",
            ),
            level.rank_class(),
            rec.priority,
            escape_html(&rec.action),
            level.badge_class(),
            level.label(),
        );
    }
    html.push_str("</div></div>\n");
}

fn render_dump(html: &mut String, entry: &AlertEntry) {
    html.push_str("<div class=\"card\"><div class=\"section-title\">Raw Alert Data</div><pre class=\"raw-dump\"><code>");
    for line in dump_lines(&entry.raw) {
        let _ = write!(html, "<span class=\"line-no\">{} │ </span>", line.number);
        match &line.key {
            Some(key) => {
                let _ = write!(
                    html,
                    "<span class=\"json-key\">{}</span><span class=\"json-value\">{}</span>",
                    escape_html(key),
                    escape_html(&line.rest)
                );
            }
            None => html.push_str(&escape_html(&line.rest)),
        }
        html.push('\n');
    }
    html.push_str("</code></pre></div>\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_view() -> DashboardView {
        DashboardView::from_records(vec![
            json!({
                "_id": "2",
                "alert_id": "test-001",
                "severity": "high",
                "category": "intrusion_attempt",
                "confidence": 0.92,
                "summary": "SSH brute force <attack>",
                "is_true_positive": true,
                "ml_prediction": "BENIGN",
                "ml_confidence": 0.89,
                "mitre_techniques": ["T1110.001", "T9999"],
                "recommendations": [
                    {"action": "Block source IP at firewall", "priority": 1},
                    {"action": "Enable fail2ban", "priority": 3}
                ]
            }),
            json!({
                "_id": "1",
                "alert_id": "test-004",
                "severity": "mystery",
                "category": "policy_violation",
                "confidence": 0.5,
                "summary": "After hours access",
                "is_true_positive": false,
                "ml_prediction": "MALICIOUS",
                "ml_confidence": 0.91,
                "mitre_techniques": [],
                "recommendations": []
            }),
        ])
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("plain"), "plain");
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_list_rows() {
        let html = render_page(&sample_view(), &TechniqueCatalog::builtin());
        assert!(html.contains("2 alerts"));
        assert!(html.contains("data-rank=\"1\" data-select=\"0\""));
        assert!(html.contains("data-rank=\"4\" data-select=\"1\""));
        assert!(html.contains("<title>SOC Alert Intelligence Dashboard</title>"));
        assert!(html.contains("Intrusion Attempt"));
        assert!(html.contains("badge-high"));
        assert!(html.contains("<span class=\"confidence conf-alarming\">92%</span>"));
        assert!(html.contains("<span class=\"confidence conf-calm\">50%</span>"));
        assert!(html.contains("badge-info\">🔵 MYSTERY"));
        assert!(html.contains("SSH brute force &lt;attack&gt;"));
        assert!(!html.contains("<attack>"));
    }

    #[test]
    fn test_list_state_hides_details() {
        let html = render_page(&sample_view(), &TechniqueCatalog::builtin());
        assert!(html.contains("<section class=\"detail\" data-detail=\"0\" hidden>"));
        assert!(html.contains("<section class=\"detail\" data-detail=\"1\" hidden>"));
        assert!(html.contains("<section class=\"card alert-table\" data-list-only>"));
    }

    #[test]
    fn test_detail_state_shows_selected_panel() {
        let mut view = sample_view();
        view.select(0);
        let html = render_page(&view, &TechniqueCatalog::builtin());
        assert!(html.contains("<section class=\"detail\" data-detail=\"0\">"));
        assert!(html.contains("<section class=\"detail\" data-detail=\"1\" hidden>"));
        assert!(html.contains("<section class=\"card alert-table\" data-list-only hidden>"));
        assert!(html.contains("<title>test-001 · SOC Alert Intelligence</title>"));
    }

    #[test]
    fn test_detail_content() {
        let view = sample_view();
        let mut html = String::new();
        render_detail(&mut html, 0, &view.entries()[0], &TechniqueCatalog::builtin(), true);

        assert!(html.contains("<strong class=\"tone-danger\">True Positive</strong> with 92% confidence. Immediate investigation is recommended."));
        assert!(html.contains(&format!(
            "stroke-dasharray=\"283\" stroke-dashoffset=\"{}\"",
            gauge_offset(0.92)
        )));
        assert!(html.contains("<span class=\"ring-label\">89%</span></div><span class=\"gauge-label\">ML Confidence</span>"));
        assert!(html.contains("⚠️ Confirmed"));
        assert!(html.contains("<div class=\"status-card tone-safe\"><div class=\"eyebrow\">ML Prediction</div><div class=\"status-value\">🟢 BENIGN</div>"));
        assert!(html.contains("href=\"https://attack.mitre.org/techniques/T1110/001/\""));
        assert!(html.contains("<span class=\"mitre-name\">Brute Force: Password Guessing</span>"));
        assert!(html.contains("<span class=\"mono\">T9999</span><span class=\"mitre-name\">T9999</span>"));
        assert!(html.contains("<div class=\"rec-number p1\">1</div>"));
        assert!(html.contains("Priority: Critical"));
        assert!(html.contains("<div class=\"rec-number p3\">3</div>"));
        assert!(html.contains("Priority: Medium"));
        assert!(html.contains("<span class=\"line-no\"> 1 │ </span>{"));
        assert!(html.contains("<span class=\"json-key\">  &quot;_id&quot;:</span><span class=\"json-value\"> &quot;2&quot;,</span>"));
    }

    #[test]
    fn test_false_positive_narrative() {
        let view = sample_view();
        let mut html = String::new();
        render_detail(&mut html, 1, &view.entries()[1], &TechniqueCatalog::builtin(), true);
        assert!(html.contains("False Positive</strong> with 50% confidence. Review and validate before escalation."));
        assert!(html.contains("✅ Not Confirmed"));
        assert!(html.contains("status-card tone-danger\"><div class=\"eyebrow\">ML Prediction</div><div class=\"status-value\">🔴 MALICIOUS"));
    }

    #[test]
    fn test_empty_view_renders() {
        let html = render_page(&DashboardView::empty(), &TechniqueCatalog::builtin());
        assert!(html.contains("0 alerts"));
        assert!(!html.contains("data-detail="));
    }
}
