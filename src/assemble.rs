use std::collections::HashSet;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

#[cfg(feature = "rayon")]
use rayon::prelude::*;

use crate::classify::classify;
use crate::error::{PipelineError, Result};
use crate::extras::salary_hint;
use crate::normalize::normalize;
use crate::record::{AssemblyReport, Dataset, EnrichedJobRecord, RawJobRecord};
use crate::skills::{extract, SkillVocabulary};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssembleOptions {
    /// Drop records whose title and company both fell back to the sentinel.
    pub filter_incomplete: bool,
}

/// A vocabulary plus run options. Building one is where configuration errors
/// surface, before any record is looked at.
#[derive(Debug, Clone)]
pub struct Pipeline {
    vocabulary: SkillVocabulary,
    options: AssembleOptions,
}

impl Pipeline {
    pub fn new(vocabulary: SkillVocabulary, options: AssembleOptions) -> Self {
        Pipeline {
            vocabulary,
            options,
        }
    }

    pub fn vocabulary(&self) -> &SkillVocabulary {
        &self.vocabulary
    }

    pub fn options(&self) -> &AssembleOptions {
        &self.options
    }

    pub fn run(&self, records: &[RawJobRecord], reference_time: DateTime<Utc>) -> Result<Dataset> {
        assemble(records, &self.vocabulary, reference_time, &self.options)
    }
}

/// Normalizes, classifies and tags every record, then drops duplicates by
/// (title, company, location) keeping the first one seen. Fails only when a
/// record lacks provenance, and then before doing any work.
pub fn assemble(
    records: &[RawJobRecord],
    vocabulary: &SkillVocabulary,
    reference_time: DateTime<Utc>,
    options: &AssembleOptions,
) -> Result<Dataset> {
    if let Some(index) = records.iter().position(|r| !r.has_provenance()) {
        return Err(PipelineError::MissingSourceId { index });
    }

    let enriched = enrich_all(records, vocabulary, reference_time);

    let mut report = AssemblyReport {
        input: records.len(),
        ..Default::default()
    };
    let mut seen = HashSet::new();
    let mut kept = Vec::with_capacity(enriched.len());

    for (index, record) in enriched.into_iter().enumerate() {
        if !seen.insert(record.record.dedup_key()) {
            debug!(index, title = %record.record.title, "duplicate listing dropped");
            report.duplicates += 1;
            continue;
        }
        if record.record.is_incomplete() {
            report.incomplete += 1;
            warn!(
                index,
                source_id = %record.record.source_id,
                "listing has neither title nor company"
            );
            if options.filter_incomplete {
                report.filtered += 1;
                continue;
            }
        }
        kept.push(record);
    }

    info!(
        input = report.input,
        kept = kept.len(),
        duplicates = report.duplicates,
        incomplete = report.incomplete,
        filtered = report.filtered,
        "dataset assembled"
    );
    Ok(Dataset::new(kept, report))
}

pub fn enrich(
    raw: &RawJobRecord,
    vocabulary: &SkillVocabulary,
    reference_time: DateTime<Utc>,
) -> EnrichedJobRecord {
    let record = normalize(raw, reference_time);
    let experience_level = classify(&record);
    let matched = extract(&record, vocabulary);
    let salary_hint = salary_hint(&record);
    EnrichedJobRecord {
        record,
        experience_level,
        skills: matched.skills,
        skill_domains: matched.domains,
        salary_hint,
    }
}

#[cfg(feature = "rayon")]
fn enrich_all(
    records: &[RawJobRecord],
    vocabulary: &SkillVocabulary,
    reference_time: DateTime<Utc>,
) -> Vec<EnrichedJobRecord> {
    records
        .par_iter()
        .map(|r| enrich(r, vocabulary, reference_time))
        .collect()
}

#[cfg(not(feature = "rayon"))]
fn enrich_all(
    records: &[RawJobRecord],
    vocabulary: &SkillVocabulary,
    reference_time: DateTime<Utc>,
) -> Vec<EnrichedJobRecord> {
    records
        .iter()
        .map(|r| enrich(r, vocabulary, reference_time))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{ExperienceLevel, NOT_SPECIFIED};
    use chrono::TimeZone;

    fn reference() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap()
    }

    fn vocab() -> SkillVocabulary {
        SkillVocabulary::builtin().unwrap()
    }

    fn listing(source: &str, title: &str, company: &str, location: &str) -> RawJobRecord {
        RawJobRecord::new(source)
            .with_title(title)
            .with_company(company)
            .with_location(location)
    }

    #[test]
    fn dedups_on_composite_key() {
        let records = vec![
            listing("remoteok", "Backend Engineer", "Acme", "Remote").with_description("rust"),
            listing("indeed", "Backend Engineer", "Acme", "Remote").with_description("go"),
        ];
        let ds = assemble(&records, &vocab(), reference(), &AssembleOptions::default()).unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.records()[0].record.source_id, "remoteok");
        assert_eq!(ds.report().duplicates, 1);
    }

    #[test]
    fn case_variants_collapse_after_normalization() {
        let records = vec![
            listing("a", "BACKEND ENGINEER", "acme", "wfh"),
            listing("b", "backend engineer", "ACME", "Remote"),
        ];
        let ds = assemble(&records, &vocab(), reference(), &AssembleOptions::default()).unwrap();
        assert_eq!(ds.len(), 1);
    }

    #[test]
    fn keeps_input_order() {
        let records = vec![
            listing("a", "Zeta", "C1", "Berlin"),
            listing("a", "Alpha", "C2", "Berlin"),
            listing("a", "Zeta", "C1", "Berlin"),
            listing("a", "Mid", "C3", "Berlin"),
        ];
        let ds = assemble(&records, &vocab(), reference(), &AssembleOptions::default()).unwrap();
        let titles: Vec<&str> = ds.iter().map(|r| r.record.title.as_str()).collect();
        assert_eq!(titles, vec!["Zeta", "Alpha", "Mid"]);
    }

    #[test]
    fn incomplete_records_are_retained_by_default() {
        let records = vec![
            RawJobRecord::new("a").with_location("Remote"),
            listing("a", "Dev", "Acme", "Remote"),
        ];
        let ds = assemble(&records, &vocab(), reference(), &AssembleOptions::default()).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.report().incomplete, 1);
        assert_eq!(ds.report().filtered, 0);
        assert_eq!(ds.records()[0].record.title, NOT_SPECIFIED);

        let filtering = AssembleOptions {
            filter_incomplete: true,
        };
        let ds = assemble(&records, &vocab(), reference(), &filtering).unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.report().filtered, 1);
    }

    #[test]
    fn missing_source_id_fails_before_work() {
        let records = vec![listing("ok", "Dev", "Acme", "Remote"), RawJobRecord::new("")];
        let err =
            assemble(&records, &vocab(), reference(), &AssembleOptions::default()).unwrap_err();
        assert!(matches!(err, PipelineError::MissingSourceId { index: 1 }));
    }

    #[test]
    fn enriches_scenario_record() {
        let raw = RawJobRecord::new("remoteok")
            .with_title("Senior Data Scientist")
            .with_description("5+ years experience with Python, SQL, and React Native required");
        let pipeline = Pipeline::new(vocab(), AssembleOptions::default());
        let ds = pipeline.run(&[raw], reference()).unwrap();
        let rec = &ds.records()[0];
        assert_eq!(rec.experience_level, ExperienceLevel::Senior);
        for s in ["python", "sql", "react native"] {
            assert!(rec.skills.contains(s), "{s}");
        }
        assert!(!rec.skills.contains("react"));
        let total: usize = rec.skill_domains.values().sum();
        assert_eq!(total, rec.skills.len());
    }

    #[test]
    fn empty_input_is_an_empty_dataset() {
        let ds = assemble(&[], &vocab(), reference(), &AssembleOptions::default()).unwrap();
        assert!(ds.is_empty());
        assert_eq!(ds.report(), &AssemblyReport::default());
    }
}
