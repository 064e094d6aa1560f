use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Placeholder for text fields that carry no usable data.
pub const NOT_SPECIFIED: &str = "not specified";

/// A listing as handed over by a source adapter. Never mutated after
/// construction; later stages build new values from it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawJobRecord {
    pub source_id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub posted_date: Option<String>,
    #[serde(default, alias = "summary")]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub salary: Option<String>,
    #[serde(default)]
    pub job_type: Option<String>,
}

impl RawJobRecord {
    pub fn new(source_id: impl Into<String>) -> Self {
        RawJobRecord {
            source_id: source_id.into(),
            ..Default::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = Some(company.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_posted_date(mut self, posted_date: impl Into<String>) -> Self {
        self.posted_date = Some(posted_date.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn has_provenance(&self) -> bool {
        !self.source_id.trim().is_empty()
    }
}

/// Cleaned copy of a raw record. Text fields hold either a real value or
/// [`NOT_SPECIFIED`]; `description` is the one field where "" is meaningful.
///
/// The matching copy is derived from the description and is not serialized;
/// loading a stored record rebuilds it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "StoredRecord")]
pub struct NormalizedJobRecord {
    pub source_id: String,
    pub title: String,
    pub company: String,
    pub location: String,
    pub posted_date: Option<NaiveDate>,
    pub description: String,
    #[serde(skip)]
    pub(crate) matching_text: String,
    pub tags: Vec<String>,
    pub url: Option<String>,
    pub salary: Option<String>,
    pub job_type: Option<String>,
}

/// Serialized shape of [`NormalizedJobRecord`].
#[derive(Deserialize)]
struct StoredRecord {
    source_id: String,
    title: String,
    company: String,
    location: String,
    posted_date: Option<NaiveDate>,
    description: String,
    #[serde(default)]
    tags: Vec<String>,
    url: Option<String>,
    salary: Option<String>,
    job_type: Option<String>,
}

impl From<StoredRecord> for NormalizedJobRecord {
    fn from(s: StoredRecord) -> Self {
        NormalizedJobRecord {
            matching_text: matching_text(&s.description),
            source_id: s.source_id,
            title: s.title,
            company: s.company,
            location: s.location,
            posted_date: s.posted_date,
            description: s.description,
            tags: s.tags,
            url: s.url,
            salary: s.salary,
            job_type: s.job_type,
        }
    }
}

/// Keyword-matching form of a cleaned description.
pub(crate) fn matching_text(description: &str) -> String {
    description.to_lowercase()
}

impl NormalizedJobRecord {
    /// Lowercased, whitespace-collapsed description used for keyword matching.
    pub fn matching_copy(&self) -> &str {
        &self.matching_text
    }

    pub fn title_matching_copy(&self) -> String {
        if self.title == NOT_SPECIFIED {
            String::new()
        } else {
            self.title.to_lowercase()
        }
    }

    /// Title and company both fell back to the sentinel.
    pub fn is_incomplete(&self) -> bool {
        self.title == NOT_SPECIFIED && self.company == NOT_SPECIFIED
    }

    pub fn dedup_key(&self) -> (String, String, String) {
        (
            self.title.clone(),
            self.company.clone(),
            self.location.clone(),
        )
    }

    /// Renders the record back into raw form, e.g. to re-run it through
    /// the normalizer.
    pub fn to_raw(&self) -> RawJobRecord {
        RawJobRecord {
            source_id: self.source_id.clone(),
            title: Some(self.title.clone()),
            company: Some(self.company.clone()),
            location: Some(self.location.clone()),
            posted_date: self.posted_date.map(|d| d.format("%Y-%m-%d").to_string()),
            description: Some(self.description.clone()),
            tags: Some(self.tags.clone()),
            url: self.url.clone(),
            salary: self.salary.clone(),
            job_type: self.job_type.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ExperienceLevel {
    #[serde(rename = "intern")]
    Intern,
    #[serde(rename = "entry")]
    Entry,
    #[serde(rename = "mid")]
    Mid,
    #[serde(rename = "senior")]
    Senior,
    #[serde(rename = "lead")]
    Lead,
    #[serde(rename = "not specified")]
    NotSpecified,
}

impl ExperienceLevel {
    pub const ALL: [ExperienceLevel; 6] = [
        ExperienceLevel::Intern,
        ExperienceLevel::Entry,
        ExperienceLevel::Mid,
        ExperienceLevel::Senior,
        ExperienceLevel::Lead,
        ExperienceLevel::NotSpecified,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ExperienceLevel::Intern => "intern",
            ExperienceLevel::Entry => "entry",
            ExperienceLevel::Mid => "mid",
            ExperienceLevel::Senior => "senior",
            ExperienceLevel::Lead => "lead",
            ExperienceLevel::NotSpecified => NOT_SPECIFIED,
        }
    }
}

impl fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Skills matched for one record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillMatch {
    pub skills: BTreeSet<String>,
    pub domains: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedJobRecord {
    #[serde(flatten)]
    pub record: NormalizedJobRecord,
    pub experience_level: ExperienceLevel,
    pub skills: BTreeSet<String>,
    pub skill_domains: BTreeMap<String, usize>,
    /// Best effort, unverified.
    pub salary_hint: Option<String>,
}

/// What the assembler saw while building a dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssemblyReport {
    pub input: usize,
    pub duplicates: usize,
    pub incomplete: usize,
    pub filtered: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    records: Vec<EnrichedJobRecord>,
    report: AssemblyReport,
}

impl Dataset {
    pub(crate) fn new(records: Vec<EnrichedJobRecord>, report: AssemblyReport) -> Self {
        Dataset { records, report }
    }

    pub fn records(&self) -> &[EnrichedJobRecord] {
        &self.records
    }

    pub fn report(&self) -> &AssemblyReport {
        &self.report
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EnrichedJobRecord> {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn experience_level_serializes_to_label() {
        let json = serde_json::to_string(&ExperienceLevel::NotSpecified).unwrap();
        assert_eq!(json, r#""not specified""#);
        let lvl: ExperienceLevel = serde_json::from_str(r#""senior""#).unwrap();
        assert_eq!(lvl, ExperienceLevel::Senior);
        assert_eq!(ExperienceLevel::Lead.to_string(), "lead");
    }

    #[test]
    fn raw_record_accepts_summary_alias() {
        let raw: RawJobRecord =
            serde_json::from_str(r#"{"source_id":"indeed","summary":"Build things"}"#).unwrap();
        assert_eq!(raw.description.as_deref(), Some("Build things"));
        assert!(raw.title.is_none());
    }

    #[test]
    fn raw_record_requires_source_id() {
        let res: Result<RawJobRecord, _> = serde_json::from_str(r#"{"title":"Dev"}"#);
        assert!(res.is_err());
    }

    #[test]
    fn loading_a_stored_dataset_rebuilds_matching_copy() {
        use crate::normalize::normalize;
        use chrono::{TimeZone, Utc};

        let raw = RawJobRecord::new("remoteok")
            .with_title("Data Engineer")
            .with_description("Build Spark pipelines in Python");
        let record = normalize(&raw, Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap());
        let dataset = Dataset::new(
            vec![EnrichedJobRecord {
                record,
                experience_level: ExperienceLevel::NotSpecified,
                skills: BTreeSet::from(["python".to_string(), "spark".to_string()]),
                skill_domains: BTreeMap::from([("data_tools".to_string(), 1)]),
                salary_hint: None,
            }],
            AssemblyReport {
                input: 1,
                ..Default::default()
            },
        );

        let json = serde_json::to_string(&dataset).unwrap();
        assert!(!json.contains("matching_text"));
        let loaded: Dataset = serde_json::from_str(&json).unwrap();
        assert_eq!(
            loaded.records()[0].record.matching_copy(),
            "build spark pipelines in python"
        );
        assert_eq!(loaded, dataset);
    }

    #[test]
    fn blank_source_id_has_no_provenance() {
        assert!(!RawJobRecord::new("  ").has_provenance());
        assert!(RawJobRecord::new("remoteok").has_provenance());
    }
}
