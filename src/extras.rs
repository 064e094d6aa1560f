//! Best-effort heuristics with no ground truth behind them. Values produced
//! here are hints for a human reader, not part of the cleaned contract.

use std::sync::LazyLock;

use regex::Regex;

use crate::record::NormalizedJobRecord;

static PAY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)[$£€]\s?\d[\d,.]*\s?k?(?:\s*(?:-|–|to)\s*[$£€]?\s?\d[\d,.]*\s?k?)?(?:\s*(?:/|per)\s*(?:year|yr|annum|hour|hr|month))?",
    )
    .unwrap()
});

/// Salary text from the source if it had one, otherwise the first currency
/// amount or range mentioned in the description.
pub fn salary_hint(record: &NormalizedJobRecord) -> Option<String> {
    if let Some(salary) = &record.salary {
        return Some(salary.clone());
    }
    PAY_RE
        .find(&record.description)
        .map(|m| m.as_str().trim().to_string())
}

/// Formats a min/max pair the way listing sites print them.
pub fn format_salary_range(min: Option<u64>, max: Option<u64>) -> Option<String> {
    match (min.filter(|v| *v > 0), max.filter(|v| *v > 0)) {
        (Some(lo), Some(hi)) => Some(format!("${} - ${}", thousands(lo), thousands(hi))),
        (Some(lo), None) => Some(format!("${}+", thousands(lo))),
        (None, Some(hi)) => Some(format!("Up to ${}", thousands(hi))),
        (None, None) => None,
    }
}

fn thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;
    use crate::record::RawJobRecord;
    use chrono::{TimeZone, Utc};

    fn record(raw: RawJobRecord) -> NormalizedJobRecord {
        normalize(&raw, Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap())
    }

    #[test]
    fn formats_ranges() {
        assert_eq!(
            format_salary_range(Some(120000), Some(150000)).as_deref(),
            Some("$120,000 - $150,000")
        );
        assert_eq!(format_salary_range(Some(90000), None).as_deref(), Some("$90,000+"));
        assert_eq!(format_salary_range(None, Some(999)).as_deref(), Some("Up to $999"));
        assert_eq!(format_salary_range(Some(0), None), None);
    }

    #[test]
    fn prefers_source_salary() {
        let mut raw = RawJobRecord::new("x").with_description("Pay: $10 - $20");
        raw.salary = Some("$100k".into());
        assert_eq!(salary_hint(&record(raw)).as_deref(), Some("$100k"));
    }

    #[test]
    fn finds_range_in_description() {
        let raw = RawJobRecord::new("x")
            .with_description("Compensation $120k - $150k per year plus equity");
        assert_eq!(
            salary_hint(&record(raw)).as_deref(),
            Some("$120k - $150k per year")
        );
        assert_eq!(salary_hint(&record(RawJobRecord::new("y"))), None);
    }
}
