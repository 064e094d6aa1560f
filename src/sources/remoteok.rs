//! Adapter for the RemoteOK public API payload (a JSON array whose first
//! element is a legal notice rather than a job).

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::extras::format_salary_range;
use crate::record::RawJobRecord;

pub const SOURCE_ID: &str = "remoteok";
const BASE_URL: &str = "https://remoteok.com";

/// One API entry. Text fields are kept as raw JSON values because the feed
/// is not consistent about strings versus numbers.
#[derive(Debug, Deserialize)]
struct RemoteOkItem {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    position: Option<Value>,
    #[serde(default)]
    company: Option<Value>,
    #[serde(default)]
    location: Option<Value>,
    #[serde(default)]
    date: Option<Value>,
    #[serde(default)]
    epoch: Option<Value>,
    #[serde(default)]
    description: Option<Value>,
    #[serde(default)]
    tags: Option<Tags>,
    #[serde(default)]
    url: Option<Value>,
    #[serde(default, rename = "type")]
    job_type: Option<Value>,
    #[serde(default)]
    salary_min: Option<Value>,
    #[serde(default)]
    salary_max: Option<Value>,
}

/// Tags arrive either as a list or as one comma-separated string. Anything
/// else is ignored rather than costing the listing.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Tags {
    List(Vec<Value>),
    Text(String),
    Other(Value),
}

impl Tags {
    fn into_vec(self) -> Vec<String> {
        match self {
            Tags::List(values) => values.iter().filter_map(value_to_string).collect(),
            Tags::Text(text) => text
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(String::from)
                .collect(),
            Tags::Other(_) => Vec::new(),
        }
    }
}

/// Converts an API payload into raw records, skipping entries without an id
/// or position. `limit` of `None` keeps everything.
pub fn parse(payload: &str, limit: Option<usize>) -> serde_json::Result<Vec<RawJobRecord>> {
    let items: Vec<Value> = serde_json::from_str(payload)?;
    let total = items.len();
    let limit = limit.unwrap_or(usize::MAX);
    let mut records = Vec::new();

    for (index, value) in items.into_iter().enumerate() {
        if records.len() >= limit {
            break;
        }
        let item = match serde_json::from_value::<RemoteOkItem>(value) {
            Ok(item) => item,
            Err(e) => {
                warn!(index, error = %e, "skipping malformed RemoteOK entry");
                continue;
            }
        };
        if item.id.is_none() || item.position.is_none() {
            debug!(index, "skipping RemoteOK entry without id or position");
            continue;
        }
        records.push(into_raw(item));
    }

    debug!(total, jobs = records.len(), "parsed RemoteOK payload");
    Ok(records)
}

fn into_raw(item: RemoteOkItem) -> RawJobRecord {
    let id = item.id.as_ref().and_then(value_to_string);
    let url = item
        .url
        .as_ref()
        .and_then(value_to_string)
        .or_else(|| id.as_ref().map(|id| format!("{BASE_URL}/remote-jobs/{id}")));
    let posted_date = item
        .date
        .as_ref()
        .and_then(value_to_string)
        .or_else(|| item.epoch.as_ref().and_then(value_to_string));
    let salary = format_salary_range(
        item.salary_min.as_ref().and_then(value_to_u64),
        item.salary_max.as_ref().and_then(value_to_u64),
    );

    RawJobRecord {
        source_id: SOURCE_ID.to_string(),
        title: item.position.as_ref().and_then(value_to_text),
        company: item.company.as_ref().and_then(value_to_text),
        location: item.location.as_ref().and_then(value_to_text),
        posted_date,
        description: item.description.as_ref().and_then(value_to_text),
        tags: item.tags.map(Tags::into_vec),
        url,
        salary,
        job_type: item.job_type.as_ref().and_then(value_to_text),
    }
}

/// Any scalar as text, blanks included; normalization decides what blank means.
fn value_to_text(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn value_to_string(v: &Value) -> Option<String> {
    match v {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn value_to_u64(v: &Value) -> Option<u64> {
    match v {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
