//! Config transformation
//!
//! Pure functions from a validated [`AppConfig`] and a reference instant to
//! the decorated [`ProcessedConfig`]: timeline progress, roadmap status
//! buckets, roster normalization, and the nearest-birthday selection. The
//! transformer owns no state; the orchestrator decides what to do with the
//! result.

use crate::constants::{
    DAY_IN_MS, DEFAULT_TEAM_BORDER_COLOR, DEFAULT_TEAM_ICON_COLOR, DEFAULT_TEAM_NAME,
    UPCOMING_BIRTHDAY_WINDOW_DAYS,
};
use crate::dates;
use crate::error::CoreError;
use crate::models::{
    AppConfig, Birthday, Drop, DropStatus, Feature, ProcessedConfig, RawBirthday, RawDrop,
    RawFeature, RawTeam, RawVersionData, Team, VersionData,
};
use chrono::{DateTime, Local, NaiveDate, TimeZone};
use tracing::debug;

/// Resolve a version date string to a local instant
///
/// Accepts RFC 3339, bare `YYYY-MM-DD` (local midnight), or a month-name
/// calendar spelling.
fn parse_version_instant(input: &str) -> Option<DateTime<Local>> {
    let trimmed = input.trim();

    if let Ok(instant) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(instant.with_timezone(&Local));
    }

    dates::parse_calendar_date(trimmed).and_then(|date| {
        let midnight = date.and_hms_opt(0, 0, 0)?;
        Local.from_local_datetime(&midnight).earliest()
    })
}

fn ceil_days(ms: i64) -> i64 {
    let day = DAY_IN_MS as i64;
    (ms + day - 1) / day
}

/// Derive timeline progress from the raw version data
///
/// A zero-duration window yields `total_days == 0` and `progress == 0`; the
/// elapsed share is never computed by dividing by zero.
pub fn compute_version_data(
    raw: &RawVersionData,
    now: DateTime<Local>,
) -> Result<VersionData, CoreError> {
    let start = parse_version_instant(&raw.start_date).ok_or_else(|| {
        CoreError::transform(format!("unresolvable versionData.startDate: {:?}", raw.start_date))
    })?;
    let end = parse_version_instant(&raw.end_date).ok_or_else(|| {
        CoreError::transform(format!("unresolvable versionData.endDate: {:?}", raw.end_date))
    })?;

    let total_duration_ms = (end - start).num_milliseconds().max(0);
    let elapsed_ms = (now - start).num_milliseconds().clamp(0, total_duration_ms);
    let remaining_ms = (end - now).num_milliseconds().max(0);

    let progress = if total_duration_ms == 0 {
        0
    } else {
        ((elapsed_ms as f64 / total_duration_ms as f64) * 100.0).round() as i64
    };
    let total_days = if total_duration_ms == 0 {
        0
    } else {
        ceil_days(total_duration_ms)
    };
    let days_left = if remaining_ms == 0 { 0 } else { ceil_days(remaining_ms) };

    Ok(VersionData {
        name: raw.name.clone(),
        start_date: start,
        end_date: end,
        total_days,
        days_left,
        progress,
        milestones: raw.milestones.clone(),
        branches: raw.branches.clone(),
    })
}

/// Order drops and assign status buckets relative to `now`
///
/// Drops whose date parses are sorted ascending among themselves; drops with
/// unparseable dates keep their original position, status, and date text and
/// are skipped by the status scan. The first parseable drop on or after
/// today becomes `current`, earlier ones `completed`, later ones `upcoming`;
/// when nothing is on or after today every parseable drop is `completed`.
pub fn decorate_drops(drops: &[RawDrop], now: DateTime<Local>) -> Vec<Drop> {
    let today = dates::start_of_day(now);
    let parsed: Vec<Option<NaiveDate>> = drops
        .iter()
        .map(|drop| dates::parse_drop_date(&drop.date))
        .collect();

    // Parseable entries sorted by date, stable so equal dates keep document
    // order. Unparseable entries never move.
    let mut dated: Vec<(&RawDrop, NaiveDate)> = drops
        .iter()
        .zip(&parsed)
        .filter_map(|(drop, date)| date.map(|date| (drop, date)))
        .collect();
    dated.sort_by_key(|(_, date)| *date);

    let current_index = dated.iter().position(|(_, date)| *date >= today);

    let mut sorted = dated.into_iter().enumerate().map(|(index, (drop, date))| {
        let status = match current_index {
            Some(current) if index < current => DropStatus::Completed,
            Some(current) if index == current => DropStatus::Current,
            Some(_) => DropStatus::Upcoming,
            None => DropStatus::Completed,
        };
        Drop {
            id: drop.id,
            name: drop.name.clone(),
            date: dates::format_short_date(date),
            status,
        }
    });

    drops
        .iter()
        .zip(&parsed)
        .map(|(drop, date)| {
            if date.is_some() {
                sorted.next().expect("one sorted entry per parseable drop")
            } else {
                Drop {
                    id: drop.id,
                    name: drop.name.clone(),
                    date: drop.date.clone(),
                    status: drop.status,
                }
            }
        })
        .collect()
}

/// Apply display defaults and normalize the feature list
pub fn decorate_team(team: &RawTeam) -> Team {
    Team {
        name: team.name.clone().unwrap_or_else(|| DEFAULT_TEAM_NAME.to_string()),
        icon_color: team
            .icon_color
            .clone()
            .unwrap_or_else(|| DEFAULT_TEAM_ICON_COLOR.to_string()),
        border_color: team
            .border_color
            .clone()
            .unwrap_or_else(|| DEFAULT_TEAM_BORDER_COLOR.to_string()),
        features: team.features.iter().map(normalize_feature).collect(),
    }
}

/// Normalize a feature to always carry (possibly empty) dev/qa lists
pub fn normalize_feature(feature: &RawFeature) -> Feature {
    match feature {
        RawFeature::Title(title) => Feature {
            title: title.clone(),
            dev: Vec::new(),
            qa: Vec::new(),
        },
        RawFeature::Full { title, dev, qa } => Feature {
            title: title.clone(),
            dev: dev.clone().unwrap_or_default(),
            qa: qa.clone().unwrap_or_default(),
        },
    }
}

/// Decorate one birthday against `today`, or drop it if its date is garbage
fn decorate_birthday(birthday: &RawBirthday, today: NaiveDate) -> Option<Birthday> {
    let parts = dates::parse_flexible_date(&birthday.date)?;
    let occurrence = dates::next_occurrence(parts, today)?;

    let days_away = dates::days_between(today, occurrence).max(0);
    Some(Birthday {
        name: birthday.name.clone(),
        date: dates::format_annual_date(occurrence),
        days_away,
        image: birthday.image.clone(),
    })
}

/// The (at most) two nearest birthdays, ascending by distance
///
/// Records whose date fails to parse are silently skipped; one bad record
/// never rejects the document.
pub fn prepare_birthdays(birthdays: &[RawBirthday], now: DateTime<Local>) -> Vec<Birthday> {
    let today = dates::start_of_day(now);

    let mut upcoming: Vec<Birthday> = birthdays
        .iter()
        .filter_map(|birthday| {
            let decorated = decorate_birthday(birthday, today);
            if decorated.is_none() {
                debug!(name = %birthday.name, date = %birthday.date, "Skipping unparseable birthday");
            }
            decorated
        })
        .collect();

    upcoming.sort_by_key(|birthday| birthday.days_away);
    upcoming.truncate(2);
    upcoming
}

fn round_to(n: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (n * factor).round() / factor
}

/// Derive the full view model from one validated config document
pub fn process_config(config: &AppConfig, now: DateTime<Local>) -> Result<ProcessedConfig, CoreError> {
    let version_data = compute_version_data(&config.version_data, now)?;
    let weeks_left = round_to(version_data.days_left as f64 / 7.0, 1).max(0.0);
    let drops = decorate_drops(&config.drops, now);
    let teams = config.teams.iter().map(decorate_team).collect();
    let birthdays = prepare_birthdays(&config.birthdays, now);

    // Selection is by position, not by value: two entries with identical
    // decorated fields are still distinct birthdays.
    let upcoming_index = birthdays
        .iter()
        .position(|birthday| birthday.days_away <= UPCOMING_BIRTHDAY_WINDOW_DAYS);
    let next_index = (0..birthdays.len()).find(|&index| Some(index) != upcoming_index);

    Ok(ProcessedConfig {
        version_data,
        weeks_left,
        drops,
        teams,
        upcoming_birthday: upcoming_index.map(|index| birthdays[index].clone()),
        next_birthday: next_index.map(|index| birthdays[index].clone()),
        has_upcoming_birthday: upcoming_index.is_some(),
        birthdays,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn fixed_now() -> DateTime<Local> {
        Local
            .with_ymd_and_hms(2026, 3, 14, 12, 0, 0)
            .single()
            .expect("unambiguous local time")
    }

    fn version(start: &str, end: &str) -> RawVersionData {
        RawVersionData {
            name: "26.2".to_string(),
            start_date: start.to_string(),
            end_date: end.to_string(),
            total_days: 0,
            days_left: 0,
            progress: 0,
            milestones: Vec::new(),
            branches: Vec::new(),
        }
    }

    fn drop_record(id: i64, date: &str) -> RawDrop {
        RawDrop {
            id,
            name: format!("Drop {id}"),
            date: date.to_string(),
            status: DropStatus::Upcoming,
        }
    }

    fn birthday_record(name: &str, date: &str) -> RawBirthday {
        RawBirthday {
            name: name.to_string(),
            date: date.to_string(),
            days_away: 0,
            image: "<svg/>".to_string(),
        }
    }

    #[test]
    fn test_version_data_midway() {
        let now = fixed_now();
        let start = (now - Duration::days(10)).to_rfc3339();
        let end = (now + Duration::days(10)).to_rfc3339();

        let data = compute_version_data(&version(&start, &end), now).unwrap();
        assert_eq!(data.total_days, 20);
        assert_eq!(data.progress, 50);
        assert!((9..=11).contains(&data.days_left));
    }

    #[test]
    fn test_version_data_zero_duration() {
        let now = fixed_now();
        let instant = now.to_rfc3339();

        let data = compute_version_data(&version(&instant, &instant), now).unwrap();
        assert_eq!(data.total_days, 0);
        assert_eq!(data.days_left, 0);
        assert_eq!(data.progress, 0);
    }

    #[test]
    fn test_version_data_progress_clamped() {
        let now = fixed_now();
        let start = (now - Duration::days(30)).to_rfc3339();
        let end = (now - Duration::days(10)).to_rfc3339();

        let data = compute_version_data(&version(&start, &end), now).unwrap();
        assert_eq!(data.progress, 100);
        assert_eq!(data.days_left, 0);
    }

    #[test]
    fn test_version_data_before_window() {
        let now = fixed_now();
        let start = (now + Duration::days(5)).to_rfc3339();
        let end = (now + Duration::days(25)).to_rfc3339();

        let data = compute_version_data(&version(&start, &end), now).unwrap();
        assert_eq!(data.progress, 0);
        assert_eq!(data.total_days, 20);
    }

    #[test]
    fn test_version_data_plain_dates() {
        let now = fixed_now();
        let data = compute_version_data(&version("2026-02-01", "2026-04-01"), now).unwrap();
        assert_eq!(data.total_days, 59);
        assert!(data.progress > 0 && data.progress < 100);
    }

    #[test]
    fn test_version_data_unresolvable_date_is_transform_error() {
        let now = fixed_now();
        let err = compute_version_data(&version("whenever", "2026-04-01"), now).unwrap_err();
        assert!(matches!(err, CoreError::Transform { .. }));
    }

    #[test]
    fn test_decorate_drops_past_and_future() {
        let now = fixed_now();
        let future = (now + Duration::days(10)).format("%d.%m.%Y").to_string();
        let past = (now - Duration::days(10)).format("%d.%m.%Y").to_string();

        let decorated = decorate_drops(&[drop_record(1, &future), drop_record(2, &past)], now);

        // Sorted ascending: the past drop comes first and is completed, the
        // future one is current
        assert_eq!(decorated[0].id, 2);
        assert_eq!(decorated[0].status, DropStatus::Completed);
        assert_eq!(decorated[1].id, 1);
        assert_eq!(decorated[1].status, DropStatus::Current);
    }

    #[test]
    fn test_decorate_drops_single_current() {
        let now = fixed_now();
        let dates: Vec<String> = (-2..=2)
            .map(|offset| (now + Duration::days(offset * 7)).format("%d.%m.%y").to_string())
            .collect();
        let drops: Vec<RawDrop> = dates
            .iter()
            .enumerate()
            .map(|(index, date)| drop_record(index as i64, date))
            .collect();

        let decorated = decorate_drops(&drops, now);
        let current = decorated
            .iter()
            .filter(|drop| drop.status == DropStatus::Current)
            .count();
        assert_eq!(current, 1);

        let statuses: Vec<DropStatus> = decorated.iter().map(|drop| drop.status).collect();
        assert_eq!(
            statuses,
            vec![
                DropStatus::Completed,
                DropStatus::Completed,
                DropStatus::Current,
                DropStatus::Upcoming,
                DropStatus::Upcoming,
            ]
        );
    }

    #[test]
    fn test_decorate_drops_all_past() {
        let now = fixed_now();
        let drops: Vec<RawDrop> = (1..=3)
            .map(|offset| {
                let date = (now - Duration::days(offset * 10)).format("%d.%m.%y").to_string();
                drop_record(offset, &date)
            })
            .collect();

        let decorated = decorate_drops(&drops, now);
        assert!(decorated.iter().all(|drop| drop.status == DropStatus::Completed));
    }

    #[test]
    fn test_decorate_drops_unparseable_kept_in_place() {
        let now = fixed_now();
        let future = (now + Duration::days(3)).format("%d.%m.%y").to_string();
        let past = (now - Duration::days(3)).format("%d.%m.%y").to_string();

        let drops = vec![
            drop_record(1, &future),
            RawDrop {
                id: 2,
                name: "Drop 2".to_string(),
                date: "TBD".to_string(),
                status: DropStatus::Completed,
            },
            drop_record(3, &past),
        ];

        let decorated = decorate_drops(&drops, now);

        // The unparseable drop stays at index 1, untouched
        assert_eq!(decorated[1].id, 2);
        assert_eq!(decorated[1].date, "TBD");
        assert_eq!(decorated[1].status, DropStatus::Completed);

        // Parseable drops sort around it
        assert_eq!(decorated[0].id, 3);
        assert_eq!(decorated[0].status, DropStatus::Completed);
        assert_eq!(decorated[2].id, 1);
        assert_eq!(decorated[2].status, DropStatus::Current);
    }

    #[test]
    fn test_decorate_drops_renders_short_dates() {
        let now = fixed_now();
        let decorated = decorate_drops(&[drop_record(1, "15.01.26")], now);
        assert_eq!(decorated[0].date, "15 Jan");
    }

    #[test]
    fn test_normalize_feature_bare_string() {
        let feature = normalize_feature(&RawFeature::Title("My Feature".to_string()));
        assert_eq!(
            feature,
            Feature {
                title: "My Feature".to_string(),
                dev: Vec::new(),
                qa: Vec::new(),
            }
        );
    }

    #[test]
    fn test_normalize_feature_missing_lists() {
        let feature = normalize_feature(&RawFeature::Full {
            title: "Search".to_string(),
            dev: Some(vec!["ana".to_string()]),
            qa: None,
        });
        assert_eq!(feature.dev, vec!["ana".to_string()]);
        assert!(feature.qa.is_empty());
    }

    #[test]
    fn test_decorate_team_defaults() {
        let team = decorate_team(&RawTeam::default());
        assert_eq!(team.name, DEFAULT_TEAM_NAME);
        assert_eq!(team.icon_color, DEFAULT_TEAM_ICON_COLOR);
        assert_eq!(team.border_color, DEFAULT_TEAM_BORDER_COLOR);
        assert!(team.features.is_empty());
    }

    #[test]
    fn test_prepare_birthdays_caps_at_two_sorted() {
        let now = fixed_now();
        let records = vec![
            birthday_record("Far", "25/12"),
            birthday_record("Near", "20/03"),
            birthday_record("Mid", "01/06"),
        ];

        let birthdays = prepare_birthdays(&records, now);
        assert_eq!(birthdays.len(), 2);
        assert!(birthdays[0].days_away <= birthdays[1].days_away);
        assert_eq!(birthdays[0].name, "Near");
        assert_eq!(birthdays[1].name, "Mid");
    }

    #[test]
    fn test_prepare_birthdays_skips_garbage() {
        let now = fixed_now();
        let records = vec![
            birthday_record("Ok", "15/06"),
            birthday_record("Bad", "someday soon"),
        ];

        let birthdays = prepare_birthdays(&records, now);
        assert_eq!(birthdays.len(), 1);
        assert_eq!(birthdays[0].name, "Ok");
    }

    #[test]
    fn test_prepare_birthdays_today_is_zero_days_away() {
        let now = fixed_now();
        let today = now.format("%d/%m").to_string();
        let birthdays = prepare_birthdays(&[birthday_record("Today", &today)], now);
        assert_eq!(birthdays[0].days_away, 0);
    }

    #[test]
    fn test_prepare_birthdays_rewrites_date() {
        let now = fixed_now();
        let birthdays = prepare_birthdays(&[birthday_record("Ana", "2000-06-15")], now);
        assert_eq!(birthdays[0].date, "JUNE 15");
    }

    fn full_config(now: DateTime<Local>, birthdays: Vec<RawBirthday>) -> AppConfig {
        AppConfig {
            version_data: version(
                &(now - Duration::days(7)).to_rfc3339(),
                &(now + Duration::days(21)).to_rfc3339(),
            ),
            drops: vec![drop_record(1, "15.01.26")],
            teams: vec![RawTeam {
                name: Some("Platform".to_string()),
                ..Default::default()
            }],
            birthdays,
        }
    }

    #[test]
    fn test_process_config_weeks_left() {
        let now = fixed_now();
        let processed = process_config(&full_config(now, Vec::new()), now).unwrap();
        assert_eq!(processed.version_data.days_left, 21);
        assert!((processed.weeks_left - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_process_config_upcoming_and_next() {
        let now = fixed_now();
        let near = (dates::start_of_day(now) + Duration::days(3)).format("%d/%m").to_string();
        let far = (dates::start_of_day(now) + Duration::days(40)).format("%d/%m").to_string();

        let processed = process_config(
            &full_config(
                now,
                vec![birthday_record("Near", &near), birthday_record("Far", &far)],
            ),
            now,
        )
        .unwrap();

        assert!(processed.has_upcoming_birthday);
        assert_eq!(processed.upcoming_birthday.as_ref().unwrap().name, "Near");
        assert_eq!(processed.next_birthday.as_ref().unwrap().name, "Far");
    }

    #[test]
    fn test_process_config_no_upcoming_window() {
        let now = fixed_now();
        let far = (dates::start_of_day(now) + Duration::days(40)).format("%d/%m").to_string();
        let farther = (dates::start_of_day(now) + Duration::days(80)).format("%d/%m").to_string();

        let processed = process_config(
            &full_config(
                now,
                vec![birthday_record("A", &far), birthday_record("B", &farther)],
            ),
            now,
        )
        .unwrap();

        assert!(!processed.has_upcoming_birthday);
        assert!(processed.upcoming_birthday.is_none());
        // Without an upcoming birthday the nearest entry is still "next"
        assert_eq!(processed.next_birthday.as_ref().unwrap().name, "A");
    }

    #[test]
    fn test_process_config_duplicate_birthdays_stay_distinct() {
        let now = fixed_now();
        let same_day = (dates::start_of_day(now) + Duration::days(2)).format("%d/%m").to_string();

        // Two people, identical decorated values; index tracking keeps the
        // second one as a legitimate "next" entry
        let processed = process_config(
            &full_config(
                now,
                vec![
                    birthday_record("Twin", &same_day),
                    birthday_record("Twin", &same_day),
                ],
            ),
            now,
        )
        .unwrap();

        assert!(processed.has_upcoming_birthday);
        assert!(processed.next_birthday.is_some());
        assert_eq!(processed.birthdays.len(), 2);
    }

    #[test]
    fn test_process_config_empty_birthdays() {
        let now = fixed_now();
        let processed = process_config(&full_config(now, Vec::new()), now).unwrap();
        assert!(processed.birthdays.is_empty());
        assert!(processed.upcoming_birthday.is_none());
        assert!(processed.next_birthday.is_none());
        assert!(!processed.has_upcoming_birthday);
    }
}
