use std::sync::LazyLock;

use chrono::{DateTime, Duration, Months, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;
use tracing::trace;

static RELATIVE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(\d{1,4})\+?\s*(minutes?|mins?|m|hours?|hrs?|h|days?|d|weeks?|wks?|w|months?|mos?|years?|yrs?|y)\s+ago\b",
    )
    .unwrap()
});
static EPOCH_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{9,11}$").unwrap());

type DateParser = fn(&str, DateTime<Utc>) -> Option<NaiveDate>;

/// Tried in order; the first parser that produces a date wins.
const PARSERS: &[(&str, DateParser)] = &[
    ("rfc3339", parse_rfc3339),
    ("iso_datetime", parse_iso_datetime),
    ("iso_date", parse_iso_date),
    ("mon_dd_yyyy", parse_month_day_year),
    ("dd_mon_yyyy", parse_day_month_year),
    ("mm_dd_yyyy", parse_us_numeric),
    ("relative", parse_relative),
    ("epoch", parse_epoch),
];

/// Parses a posted date. Relative forms resolve against `reference`; there is
/// no implicit clock. Anything unrecognised is `None`.
pub fn parse_posted_date(raw: Option<&str>, reference: DateTime<Utc>) -> Option<NaiveDate> {
    let text = raw?.split_whitespace().collect::<Vec<_>>().join(" ");
    let text = text.trim_matches(|c: char| c == '.' || c == ';');
    if text.is_empty() {
        return None;
    }
    PARSERS.iter().find_map(|(format, parse)| {
        let date = parse(text, reference)?;
        trace!(input = text, format, %date, "parsed posted date");
        Some(date)
    })
}

fn parse_rfc3339(s: &str, _: DateTime<Utc>) -> Option<NaiveDate> {
    DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive())
}

fn parse_iso_datetime(s: &str, _: DateTime<Utc>) -> Option<NaiveDate> {
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|dt| dt.date())
}

fn parse_iso_date(s: &str, _: DateTime<Utc>) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

// %B reads "December" as well as "Dec"; %b only takes the abbreviation.
fn parse_month_day_year(s: &str, _: DateTime<Utc>) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%B %d, %Y").ok()
}

fn parse_day_month_year(s: &str, _: DateTime<Utc>) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%d %B %Y").ok()
}

fn parse_us_numeric(s: &str, _: DateTime<Utc>) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%m/%d/%Y").ok()
}

fn parse_relative(s: &str, reference: DateTime<Utc>) -> Option<NaiveDate> {
    let lower = s.to_lowercase();
    match lower.as_str() {
        "today" | "just now" | "just posted" | "posted today" => {
            return Some(reference.date_naive())
        }
        "yesterday" | "posted yesterday" => {
            return reference.date_naive().checked_sub_signed(Duration::days(1))
        }
        _ => {}
    }

    let caps = RELATIVE_RE.captures(&lower)?;
    let n: i64 = caps[1].parse().ok()?;
    let unit = &caps[2];
    let resolved = match unit.chars().next()? {
        'm' if unit.starts_with("mo") => reference.checked_sub_months(Months::new(n as u32))?,
        'm' => reference.checked_sub_signed(Duration::minutes(n))?,
        'h' => reference.checked_sub_signed(Duration::hours(n))?,
        'd' => reference.checked_sub_signed(Duration::days(n))?,
        'w' => reference.checked_sub_signed(Duration::weeks(n))?,
        'y' => reference.checked_sub_months(Months::new(n as u32 * 12))?,
        _ => return None,
    };
    Some(resolved.date_naive())
}

fn parse_epoch(s: &str, _: DateTime<Utc>) -> Option<NaiveDate> {
    if !EPOCH_RE.is_match(s) {
        return None;
    }
    let secs: i64 = s.parse().ok()?;
    DateTime::from_timestamp(secs, 0).map(|dt| dt.date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn reference() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 10, 12, 0, 0).unwrap()
    }

    fn parse(s: &str) -> Option<NaiveDate> {
        parse_posted_date(Some(s), reference())
    }

    fn ymd(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[test]
    fn absolute_formats() {
        assert_eq!(parse("2023-12-01"), ymd(2023, 12, 1));
        assert_eq!(parse("2023-12-01T08:30:00+00:00"), ymd(2023, 12, 1));
        assert_eq!(parse("2023-12-01T08:30:00"), ymd(2023, 12, 1));
        assert_eq!(parse("Dec 05, 2023"), ymd(2023, 12, 5));
        assert_eq!(parse("December 5, 2023"), ymd(2023, 12, 5));
        assert_eq!(parse("5 Dec 2023"), ymd(2023, 12, 5));
        assert_eq!(parse("5 December 2023"), ymd(2023, 12, 5));
        assert_eq!(parse("Sep 30, 2023"), ymd(2023, 9, 30));
        assert_eq!(parse("September 30, 2023"), ymd(2023, 9, 30));
        assert_eq!(parse("12/05/2023"), ymd(2023, 12, 5));
    }

    #[test]
    fn relative_forms_use_reference() {
        assert_eq!(parse("3 days ago"), ymd(2024, 1, 7));
        assert_eq!(parse("Posted 3 days ago"), ymd(2024, 1, 7));
        assert_eq!(parse("30+ days ago"), ymd(2023, 12, 11));
        assert_eq!(parse("2w ago"), ymd(2023, 12, 27));
        assert_eq!(parse("1 month ago"), ymd(2023, 12, 10));
        assert_eq!(parse("13 hours ago"), ymd(2024, 1, 9));
        assert_eq!(parse("5 minutes ago"), ymd(2024, 1, 10));
        assert_eq!(parse("today"), ymd(2024, 1, 10));
        assert_eq!(parse("Yesterday"), ymd(2024, 1, 9));
    }

    #[test]
    fn epoch_seconds() {
        assert_eq!(parse("1704067200"), ymd(2024, 1, 1));
    }

    #[test]
    fn garbage_is_absent() {
        assert_eq!(parse(""), None);
        assert_eq!(parse("soon"), None);
        assert_eq!(parse("2023-13-45"), None);
        assert_eq!(parse("12345"), None);
        assert_eq!(parse_posted_date(None, reference()), None);
    }
}
