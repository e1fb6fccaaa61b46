//! Lastmod resolution.
//!
//! A project's lastmod is the first usable value of, in order: the latest
//! commit date of its repository, `dates.updated`, `dates.completed` and
//! `dates.created`. `dates.started` only marks when work began and is never
//! consulted.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use projecthub_core::Project;
use tracing::warn;

/// Normalize an authored or fetched timestamp to `YYYY-MM-DDTHH:MM:SS.mmmZ`.
///
/// Accepts every W3C Datetime precision: `YYYY`, `YYYY-MM`, `YYYY-MM-DD`,
/// `YYYY-MM-DDThh:mmTZD` and full RFC 3339 timestamps (any offset, converted
/// to UTC). Missing parts map to the start of the period. Date-times without
/// an offset are read as UTC. Returns `None` for empty or unparseable input.
pub fn normalize_timestamp(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    Some(parse_utc(value)?.to_rfc3339_opts(SecondsFormat::Millis, true))
}

fn parse_utc(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    // Minute precision with a designator: `Z` or `+hh:mm`.
    let with_offset = match value.strip_suffix(['Z', 'z']) {
        Some(rest) => format!("{rest}+00:00"),
        None => value.to_string(),
    };
    if let Ok(dt) = DateTime::parse_from_str(&with_offset, "%Y-%m-%dT%H:%M%:z") {
        return Some(dt.with_timezone(&Utc));
    }

    for format in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
    ] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt.and_utc());
        }
    }

    let date = match value.len() {
        10 => NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()?,
        7 => NaiveDate::parse_from_str(&format!("{value}-01"), "%Y-%m-%d").ok()?,
        4 if value.bytes().all(|b| b.is_ascii_digit()) => {
            NaiveDate::from_ymd_opt(value.parse().ok()?, 1, 1)?
        }
        _ => return None,
    };

    Some(date.and_hms_opt(0, 0, 0)?.and_utc())
}

/// Resolve the lastmod of `project`, given its externally observed timestamp.
pub fn resolve_lastmod(project: &Project, external: Option<&str>) -> Option<String> {
    let dates = project.dates();
    let candidates = [
        ("external", external),
        ("updated", dates.and_then(|d| d.updated.as_deref())),
        ("completed", dates.and_then(|d| d.completed.as_deref())),
        ("created", dates.and_then(|d| d.created.as_deref())),
    ];

    for (source, value) in candidates {
        let Some(value) = value.filter(|v| !v.trim().is_empty()) else {
            continue;
        };
        match normalize_timestamp(value) {
            Some(lastmod) => return Some(lastmod),
            None => warn!(
                slug = %project.slug,
                source,
                value,
                "ignoring unparseable timestamp"
            ),
        }
    }

    None
}
