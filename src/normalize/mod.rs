//! Field cleanup: turns whatever a source handed over into a record where
//! every field is either well formed or an explicit sentinel.

pub mod date;
pub mod location;
pub mod text;

use chrono::{DateTime, Utc};
use itertools::Itertools;

use crate::record::{matching_text, NormalizedJobRecord, RawJobRecord, NOT_SPECIFIED};
use text::{clean_text, normalize_case};

/// Never fails: malformed fields resolve to `"not specified"` or `None`.
pub fn normalize(raw: &RawJobRecord, reference: DateTime<Utc>) -> NormalizedJobRecord {
    let description = raw.description.as_deref().map(clean_text).unwrap_or_default();
    let matching_text = matching_text(&description);

    NormalizedJobRecord {
        source_id: raw.source_id.clone(),
        title: normalize_label(raw.title.as_deref()),
        company: normalize_label(raw.company.as_deref()),
        location: location::normalize_location(raw.location.as_deref()),
        posted_date: date::parse_posted_date(raw.posted_date.as_deref(), reference),
        description,
        matching_text,
        tags: normalize_tags(raw.tags.as_deref()),
        url: clean_optional(raw.url.as_deref()),
        salary: clean_optional(raw.salary.as_deref()),
        job_type: raw.job_type.as_deref().and_then(normalize_job_type),
    }
}

/// Title and company policy.
pub fn normalize_label(raw: Option<&str>) -> String {
    let cleaned = raw.map(clean_text).unwrap_or_default();
    if cleaned.is_empty() || cleaned.eq_ignore_ascii_case(NOT_SPECIFIED) {
        return NOT_SPECIFIED.to_string();
    }
    normalize_case(&cleaned)
}

fn normalize_tags(raw: Option<&[String]>) -> Vec<String> {
    raw.unwrap_or_default()
        .iter()
        .map(|t| clean_text(t).to_lowercase())
        .filter(|t| !t.is_empty())
        .unique()
        .collect()
}

fn clean_optional(raw: Option<&str>) -> Option<String> {
    raw.map(clean_text)
        .filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case(NOT_SPECIFIED))
}

fn normalize_job_type(raw: &str) -> Option<String> {
    let cleaned = clean_text(raw);
    let lower = cleaned.to_lowercase().replace(['_', ' '], "-");
    let label = match lower.as_str() {
        "" | "not-specified" => return None,
        "full-time" | "fulltime" | "permanent" => "full-time",
        "part-time" | "parttime" => "part-time",
        "contract" | "contractor" | "temporary" => "contract",
        "intern" | "internship" => "internship",
        "freelance" | "freelancer" => "freelance",
        _ => return Some(cleaned),
    };
    Some(label.to_string())
}
