//! Report rendering.
//!
//! The matcher hands over `(team, suitable, close_calls)` per team and
//! nothing else. This module turns that into:
//!
//! | Format | Shape |
//! |--------|-------|
//! | Text | `ABC: Alice, Carol (Bob)`, or `ABC: none` |
//! | HTML | standalone page with a team table and a mentor table |
//! | JSON | `{"ok": true, "data": [{"team", "suitable", "close_calls"}]}` |

use std::fmt::Write as _;

use clap::ValueEnum;
use serde::Serialize;

use crate::matching::{teams_by_mentor, TeamMatch};
use crate::models::Mentor;

/// Output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// One line per team.
    #[default]
    Text,
    /// HTML document.
    Html,
    /// JSON envelope.
    Json,
}

/// Owned, serializable view of a [`TeamMatch`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamSummary {
    /// Team id.
    pub team: String,
    /// Suitable mentor names.
    pub suitable: Vec<String>,
    /// Close-call mentor names.
    pub close_calls: Vec<String>,
    /// Distance to the team (km), when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
}

impl From<&TeamMatch<'_>> for TeamSummary {
    fn from(m: &TeamMatch<'_>) -> Self {
        Self {
            team: m.team.id.clone(),
            suitable: m.suitable.iter().map(|s| s.name.clone()).collect(),
            close_calls: m.close_calls.iter().map(|s| s.name.clone()).collect(),
            distance_km: m.distance_m.map(|d| d / 1000.0),
        }
    }
}

#[derive(Serialize)]
struct JsonOut<T: Serialize> {
    ok: bool,
    data: T,
}

/// Renders in the requested format.
pub fn render(
    format: ReportFormat,
    matches: &[TeamMatch<'_>],
    mentors: &[Mentor],
) -> Result<String, serde_json::Error> {
    match format {
        ReportFormat::Text => Ok(render_text(matches)),
        ReportFormat::Html => Ok(render_html(matches, mentors)),
        ReportFormat::Json => render_json(matches),
    }
}

/// `"<id>: <suitable> (<close calls>)"`.
pub fn render_line(m: &TeamMatch<'_>) -> String {
    if m.is_unmatched() {
        return format!("{}: none", m.team.id);
    }
    let mut line = format!("{}:", m.team.id);
    if !m.suitable.is_empty() {
        let _ = write!(line, " {}", join_names(&m.suitable));
    }
    if !m.close_calls.is_empty() {
        let _ = write!(line, " ({})", join_names(&m.close_calls));
    }
    line
}

/// One line per team, newline-terminated.
pub fn render_text(matches: &[TeamMatch<'_>]) -> String {
    matches
        .iter()
        .map(|m| render_line(m) + "\n")
        .collect()
}

/// Pretty-printed JSON envelope.
pub fn render_json(matches: &[TeamMatch<'_>]) -> Result<String, serde_json::Error> {
    let data: Vec<TeamSummary> = matches.iter().map(TeamSummary::from).collect();
    serde_json::to_string_pretty(&JsonOut { ok: true, data })
}

/// Standalone HTML page. Rookies are marked with `*`.
pub fn render_html(matches: &[TeamMatch<'_>], mentors: &[Mentor]) -> String {
    let mut out = String::new();
    out.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    out.push_str("<title>Mentor matches</title>\n</head>\n<body>\n");

    out.push_str("<h1>Teams</h1>\n<table>\n");
    out.push_str("<tr><th>Team</th><th>Distance</th><th>Suitable</th><th>Close calls</th></tr>\n");
    for m in matches {
        let distance = m
            .distance_m
            .map(|d| format!("{} km", (d / 1000.0).round()))
            .unwrap_or_else(|| "?".to_string());
        let _ = writeln!(
            out,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape_html(&m.team.id),
            distance,
            html_names(&m.suitable),
            html_names(&m.close_calls),
        );
    }
    out.push_str("</table>\n");

    out.push_str("<h1>Mentors</h1>\n<table>\n");
    out.push_str("<tr><th>Mentor</th><th>Suitable teams</th></tr>\n");
    for (mentor, teams) in teams_by_mentor(matches, mentors) {
        let teams: Vec<String> = teams.iter().map(|t| escape_html(&t.id)).collect();
        let _ = writeln!(
            out,
            "<tr><td>{}</td><td>{}</td></tr>",
            escape_html(&mentor_label(mentor)),
            teams.join(", "),
        );
    }
    out.push_str("</table>\n</body>\n</html>\n");
    out
}

fn join_names(mentors: &[&Mentor]) -> String {
    mentors
        .iter()
        .map(|m| m.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn mentor_label(m: &Mentor) -> String {
    if m.rookie {
        format!("{}*", m.name)
    } else {
        m.name.clone()
    }
}

fn html_names(mentors: &[&Mentor]) -> String {
    if mentors.is_empty() {
        return "&ndash;".to_string();
    }
    mentors
        .iter()
        .map(|m| escape_html(&mentor_label(m)))
        .collect::<Vec<_>>()
        .join(", ")
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
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
    out
}
