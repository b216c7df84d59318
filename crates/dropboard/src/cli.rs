//! Terminal rendering of the dashboard view model
//!
//! The presentation boundary: consumes `ProcessedConfig` read-only and
//! renders it as tables (or JSON for scripting).

use comfy_table::{Cell, Color, ContentArrangement, Row, Table};
use dropboard_core::models::{DropStatus, ProcessedConfig};

/// Render the full dashboard (human tables or pretty JSON)
pub fn format_dashboard(view: &ProcessedConfig, json: bool, no_color: bool) -> String {
    if json {
        return serde_json::to_string_pretty(view).unwrap_or_else(|_| "{}".to_string());
    }

    let mut sections = vec![format_version_header(view)];

    if !view.drops.is_empty() {
        sections.push(format_drops_table(view, no_color));
    }
    if !view.teams.is_empty() {
        sections.push(format_teams_table(view, no_color));
    }
    if !view.birthdays.is_empty() {
        sections.push(format_birthdays(view));
    }

    sections.join("\n\n")
}

fn format_version_header(view: &ProcessedConfig) -> String {
    let version = &view.version_data;
    let mut lines = vec![
        format!("Release:   {}", version.name),
        format!(
            "Window:    {} → {}  ({} days)",
            version.start_date.format("%Y-%m-%d"),
            version.end_date.format("%Y-%m-%d"),
            version.total_days
        ),
        format!(
            "Progress:  {}%  ({} days / {:.1} weeks left)",
            version.progress, version.days_left, view.weeks_left
        ),
    ];

    for milestone in &version.milestones {
        lines.push(format!("Milestone: {}  {}", milestone.name, milestone.date));
    }
    for branch in &version.branches {
        lines.push(format!(
            "Branch:    {}  {}  [{}]",
            branch.title, branch.branch, branch.products
        ));
    }

    lines.join("\n")
}

fn format_drops_table(view: &ProcessedConfig, no_color: bool) -> String {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);

    if no_color {
        table.set_header(vec!["Drop", "Date", "Status"]);
    } else {
        table.set_header(vec![
            Cell::new("Drop").fg(Color::Cyan),
            Cell::new("Date").fg(Color::Cyan),
            Cell::new("Status").fg(Color::Cyan),
        ]);
    }

    for drop in &view.drops {
        let status = status_label(drop.status);
        if no_color {
            table.add_row(Row::from(vec![drop.name.as_str(), drop.date.as_str(), status]));
        } else {
            table.add_row(Row::from(vec![
                Cell::new(&drop.name),
                Cell::new(&drop.date),
                Cell::new(status).fg(status_color(drop.status)),
            ]));
        }
    }

    table.to_string()
}

fn format_teams_table(view: &ProcessedConfig, no_color: bool) -> String {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);

    if no_color {
        table.set_header(vec!["Team", "Features", "Dev", "QA"]);
    } else {
        table.set_header(vec![
            Cell::new("Team").fg(Color::Cyan),
            Cell::new("Features").fg(Color::Cyan),
            Cell::new("Dev").fg(Color::Cyan),
            Cell::new("QA").fg(Color::Cyan),
        ]);
    }

    for team in &view.teams {
        let features: Vec<&str> = team.features.iter().map(|f| f.title.as_str()).collect();
        let dev: Vec<&str> = team
            .features
            .iter()
            .flat_map(|f| f.dev.iter().map(String::as_str))
            .collect();
        let qa: Vec<&str> = team
            .features
            .iter()
            .flat_map(|f| f.qa.iter().map(String::as_str))
            .collect();

        table.add_row(Row::from(vec![
            team.name.clone(),
            features.join("\n"),
            dev.join(", "),
            qa.join(", "),
        ]));
    }

    table.to_string()
}

fn format_birthdays(view: &ProcessedConfig) -> String {
    let mut lines = Vec::new();

    for birthday in &view.birthdays {
        let distance = match birthday.days_away {
            0 => "today!".to_string(),
            1 => "tomorrow".to_string(),
            days => format!("in {days} days"),
        };
        lines.push(format!("Birthday:  {}  {}  ({distance})", birthday.name, birthday.date));
    }

    if view.has_upcoming_birthday {
        if let Some(upcoming) = &view.upcoming_birthday {
            lines.push(format!("Upcoming:  {} within the week", upcoming.name));
        }
    }

    lines.join("\n")
}

fn status_label(status: DropStatus) -> &'static str {
    match status {
        DropStatus::Completed => "completed",
        DropStatus::Current => "current",
        DropStatus::Upcoming => "upcoming",
    }
}

fn status_color(status: DropStatus) -> Color {
    match status {
        DropStatus::Completed => Color::Green,
        DropStatus::Current => Color::Cyan,
        DropStatus::Upcoming => Color::DarkGrey,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};
    use dropboard_core::models::{Birthday, Drop, Feature, Team, VersionData};

    fn sample_view() -> ProcessedConfig {
        let start = Local.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).single().unwrap();
        let end = Local.with_ymd_and_hms(2026, 4, 1, 0, 0, 0).single().unwrap();

        ProcessedConfig {
            version_data: VersionData {
                name: "26.2".to_string(),
                start_date: start,
                end_date: end,
                total_days: 59,
                days_left: 18,
                progress: 70,
                milestones: Vec::new(),
                branches: Vec::new(),
            },
            weeks_left: 2.6,
            drops: vec![Drop {
                id: 1,
                name: "Drop 1".to_string(),
                date: "15 Mar".to_string(),
                status: DropStatus::Current,
            }],
            teams: vec![Team {
                name: "Platform".to_string(),
                icon_color: "#38bdf8".to_string(),
                border_color: "#334155".to_string(),
                features: vec![Feature {
                    title: "Search".to_string(),
                    dev: vec!["ana".to_string()],
                    qa: vec!["ben".to_string()],
                }],
            }],
            birthdays: vec![Birthday {
                name: "Ana".to_string(),
                date: "JUNE 15".to_string(),
                days_away: 3,
                image: "<svg/>".to_string(),
            }],
            upcoming_birthday: None,
            next_birthday: None,
            has_upcoming_birthday: false,
        }
    }

    #[test]
    fn test_format_dashboard_human() {
        let rendered = format_dashboard(&sample_view(), false, true);
        assert!(rendered.contains("Release:   26.2"));
        assert!(rendered.contains("Drop 1"));
        assert!(rendered.contains("current"));
        assert!(rendered.contains("Platform"));
        assert!(rendered.contains("JUNE 15"));
    }

    #[test]
    fn test_format_dashboard_json() {
        let rendered = format_dashboard(&sample_view(), true, true);
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(value["versionData"]["progress"], 70);
        assert_eq!(value["weeksLeft"], 2.6);
    }

    #[test]
    fn test_birthday_distance_wording() {
        let mut view = sample_view();
        view.birthdays[0].days_away = 0;
        let rendered = format_dashboard(&view, false, true);
        assert!(rendered.contains("today!"));
    }
}
