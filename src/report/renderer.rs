use std::fmt::Write;

use rust_decimal::Decimal;

use super::aggregator::ActivitySummary;
use crate::database::models::User;

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedReport {
    pub subject: String,
    pub html: String,
}

/// One `<li>` of the report.
#[derive(Debug, Clone, PartialEq)]
pub struct ContributorLine {
    pub label: String,
    pub hours: Decimal,
}

/// Contributors in the order `users` lists them, then any contributor the
/// directory could not resolve, labelled by id.
pub fn contributor_lines(summary: &ActivitySummary, users: &[User]) -> Vec<ContributorLine> {
    let mut lines = Vec::with_capacity(summary.hours_by_user.len());

    for user in users {
        if let Some(hours) = summary.hours_by_user.get(&user.id) {
            lines.push(ContributorLine {
                label: user.name.clone(),
                hours: *hours,
            });
        }
    }

    for id in summary.contributor_ids() {
        if !users.iter().any(|u| u.id == id) {
            lines.push(ContributorLine {
                label: id.to_string(),
                hours: summary.hours_by_user[&id],
            });
        }
    }

    lines
}

pub fn render(project_name: &str, summary: &ActivitySummary, users: &[User]) -> RenderedReport {
    let name = escape_html(project_name);
    let mut items = String::new();
    for line in contributor_lines(summary, users) {
        // Writing into a String cannot fail.
        let _ = write!(
            items,
            "<li>{}: {} hrs</li>",
            escape_html(&line.label),
            two_places(line.hours)
        );
    }

    let html = format!(
        "<h2>Project Report: {name}</h2>\n\
         <p><strong>Total Hours Worked:</strong> {hours} hrs</p>\n\
         <p><strong>Total Budget Consumed:</strong> €{budget}</p>\n\
         <h3>Who Worked:</h3>\n\
         <ul>{items}</ul>\n",
        name = name,
        hours = two_places(summary.total_hours),
        budget = two_places(summary.total_budget),
        items = items,
    );

    RenderedReport {
        subject: format!("Report for Project: {}", project_name),
        html,
    }
}

fn two_places(value: Decimal) -> String {
    format!("{:.2}", value.round_dp(2))
}

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn user(name: &str) -> User {
        User {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            organisation: Uuid::nil(),
        }
    }

    #[test]
    fn empty_report_renders_zero_totals() {
        let report = render("Apollo", &ActivitySummary::default(), &[]);
        assert_eq!(report.subject, "Report for Project: Apollo");
        assert!(report.html.contains("<h2>Project Report: Apollo</h2>"));
        assert!(report.html.contains("0.00 hrs"));
        assert!(report.html.contains("€0.00"));
        assert!(report.html.contains("<ul></ul>"));
    }

    #[test]
    fn totals_use_two_decimals() {
        let summary = ActivitySummary {
            total_hours: d("12.5"),
            total_budget: d("1234.567"),
            ..Default::default()
        };
        let report = render("Apollo", &summary, &[]);
        assert!(report.html.contains("12.50 hrs"));
        assert!(report.html.contains("€1234.57"));
    }

    #[test]
    fn lists_resolved_users_in_lookup_order_then_unresolved_ids() {
        let alice = user("Alice");
        let bob = user("Bob");
        let ghost = Uuid::new_v4();
        let mut summary = ActivitySummary::default();
        summary.hours_by_user.insert(alice.id, d("3"));
        summary.hours_by_user.insert(bob.id, d("1.5"));
        summary.hours_by_user.insert(ghost, d("2"));

        let lines = contributor_lines(&summary, &[bob.clone(), alice.clone()]);
        let labels: Vec<&str> = lines.iter().map(|l| l.label.as_str()).collect();
        assert_eq!(labels, vec!["Bob", "Alice", ghost.to_string().as_str()]);

        let report = render("Apollo", &summary, &[bob, alice]);
        assert!(report.html.contains("<li>Bob: 1.50 hrs</li><li>Alice: 3.00 hrs</li>"));
        assert!(report.html.contains(&format!("<li>{}: 2.00 hrs</li>", ghost)));
    }

    #[test]
    fn users_without_hours_are_skipped() {
        let alice = user("Alice");
        let lines = contributor_lines(&ActivitySummary::default(), &[alice]);
        assert!(lines.is_empty());
    }

    #[test]
    fn interpolated_text_is_escaped() {
        let mallory = user("<script>alert('x')</script>");
        let mut summary = ActivitySummary::default();
        summary.hours_by_user.insert(mallory.id, d("1"));

        let report = render("R&D <Team>", &summary, &[mallory]);
        assert!(report.html.contains("Project Report: R&amp;D &lt;Team&gt;"));
        assert!(report.html.contains("&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;"));
        assert!(!report.html.contains("<script>"));
        assert_eq!(report.subject, "Report for Project: R&D <Team>");
    }
}
