//! Flat, one-row-per-listing view of a dataset for CSV/SQLite writers.

use itertools::Itertools;

use crate::record::{Dataset, EnrichedJobRecord, NOT_SPECIFIED};
use crate::skills::SkillVocabulary;

pub const DEFAULT_SKILL_DELIMITER: &str = "; ";

/// Fixed columns; one integer column per vocabulary domain follows.
pub const BASE_COLUMNS: &[&str] = &[
    "source_id",
    "title",
    "company",
    "location",
    "posted_date",
    "experience_level",
    "skills",
    "job_type",
    "salary_hint",
    "tags",
    "url",
    "description",
];

/// Column names a domain may not take: the fixed columns plus the SQLite
/// row id.
pub fn is_reserved_column(name: &str) -> bool {
    name == ROW_ID_COLUMN || BASE_COLUMNS.contains(&name)
}

pub const ROW_ID_COLUMN: &str = "id";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn domain_columns(&self) -> &[String] {
        self.headers.get(BASE_COLUMNS.len()..).unwrap_or_default()
    }
}

impl Dataset {
    pub fn to_table(&self, vocabulary: &SkillVocabulary) -> Table {
        self.to_table_with_delimiter(vocabulary, DEFAULT_SKILL_DELIMITER)
    }

    pub fn to_table_with_delimiter(&self, vocabulary: &SkillVocabulary, delimiter: &str) -> Table {
        let domains: Vec<&str> = vocabulary.domain_names().collect();
        let headers = BASE_COLUMNS
            .iter()
            .copied()
            .chain(domains.iter().copied())
            .map(String::from)
            .collect();
        let rows = self
            .iter()
            .map(|r| render_row(r, &domains, delimiter))
            .collect();
        Table { headers, rows }
    }
}

fn render_row(r: &EnrichedJobRecord, domains: &[&str], delimiter: &str) -> Vec<String> {
    let rec = &r.record;
    let mut row = vec![
        rec.source_id.clone(),
        rec.title.clone(),
        rec.company.clone(),
        rec.location.clone(),
        rec.posted_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| NOT_SPECIFIED.to_string()),
        r.experience_level.to_string(),
        r.skills.iter().join(delimiter),
        rec.job_type.clone().unwrap_or_default(),
        r.salary_hint.clone().unwrap_or_default(),
        rec.tags.iter().join(delimiter),
        rec.url.clone().unwrap_or_default(),
        rec.description.clone(),
    ];
    row.extend(
        domains
            .iter()
            .map(|d| r.skill_domains.get(*d).copied().unwrap_or(0).to_string()),
    );
    row
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assemble::{assemble, AssembleOptions};
    use crate::record::RawJobRecord;
    use chrono::{TimeZone, Utc};

    #[test]
    fn one_row_per_record_with_domain_columns() {
        let vocab = SkillVocabulary::from_toml_str(
            r#"
            [[domains]]
            name = "programming_languages"
            skills = [{ name = "python" }, { name = "rust" }]

            [[domains]]
            name = "cloud"
            skills = [{ name = "aws" }]
            "#,
        )
        .unwrap();
        let records = vec![
            RawJobRecord::new("remoteok")
                .with_title("Platform Engineer")
                .with_description("Rust and Python on AWS")
                .with_posted_date("2024-01-02"),
            RawJobRecord::new("remoteok").with_title("Writer"),
        ];
        let reference = Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap();
        let ds = assemble(&records, &vocab, reference, &AssembleOptions::default()).unwrap();
        let table = ds.to_table(&vocab);

        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.domain_columns(), ["programming_languages", "cloud"]);
        let col = |name: &str| table.headers.iter().position(|h| h == name).unwrap();

        let first = &table.rows[0];
        assert_eq!(first[col("skills")], "aws; python; rust");
        assert_eq!(first[col("programming_languages")], "2");
        assert_eq!(first[col("cloud")], "1");
        assert_eq!(first[col("posted_date")], "2024-01-02");

        let second = &table.rows[1];
        assert_eq!(second[col("skills")], "");
        assert_eq!(second[col("cloud")], "0");
        assert_eq!(second[col("company")], NOT_SPECIFIED);
        assert_eq!(second[col("posted_date")], NOT_SPECIFIED);
        assert!(table.rows.iter().all(|r| r.len() == table.headers.len()));
    }

    #[test]
    fn builtin_vocabulary_headers_are_unique() {
        let vocab = SkillVocabulary::builtin().unwrap();
        let table = Dataset::default().to_table(&vocab);
        assert!(table.headers.iter().all_unique());
        assert!(!table.headers.iter().any(|h| h == ROW_ID_COLUMN));
        assert!(table.domain_columns().iter().all(|d| !is_reserved_column(d)));
    }
}
