use std::collections::HashMap;
use std::path::Path;

use config::{Config, File, FileFormat};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};
use crate::normalize::text::collapse_whitespace;
use crate::table::is_reserved_column;

const BUILTIN_TOML: &str = include_str!("../../vocab/skills.toml");

/// On-disk shape of a vocabulary file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VocabularySpec {
    #[serde(default)]
    pub domains: Vec<DomainSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainSpec {
    pub name: String,
    #[serde(default)]
    pub skills: Vec<SkillSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillSpec {
    pub name: String,
    #[serde(default)]
    pub synonyms: Vec<String>,
}

impl SkillSpec {
    pub fn new(name: &str, synonyms: &[&str]) -> Self {
        SkillSpec {
            name: name.to_string(),
            synonyms: synonyms.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Domain {
    pub name: String,
    pub skills: Vec<Skill>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skill {
    pub canonical: String,
    /// Canonical name first, then synonyms; all lowercase.
    pub forms: Vec<String>,
}

/// One searchable surface form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Pattern {
    pub form: String,
    pub domain: usize,
    pub skill: usize,
}

/// Immutable controlled vocabulary. Every check happens in the constructor,
/// so a value of this type is always consistent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillVocabulary {
    domains: Vec<Domain>,
    patterns: Vec<Pattern>,
}

impl SkillVocabulary {
    pub fn new(spec: VocabularySpec) -> Result<Self> {
        let mut domains: Vec<Domain> = Vec::with_capacity(spec.domains.len());
        let mut skill_owner: HashMap<String, String> = HashMap::new();
        let mut form_owner: HashMap<String, String> = HashMap::new();

        for domain_spec in spec.domains {
            let domain_name = normalize_name(&domain_spec.name);
            if domain_name.is_empty() {
                return Err(PipelineError::EmptyName("domain"));
            }
            if is_reserved_column(&domain_name) {
                return Err(PipelineError::ReservedDomain(domain_name));
            }
            if domains.iter().any(|d| d.name == domain_name) {
                return Err(PipelineError::DuplicateDomain(domain_name));
            }

            let mut skills = Vec::with_capacity(domain_spec.skills.len());
            for skill_spec in domain_spec.skills {
                let canonical = normalize_name(&skill_spec.name);
                if canonical.is_empty() {
                    return Err(PipelineError::EmptyName("skill"));
                }
                if let Some(first) = skill_owner.get(&canonical) {
                    return Err(PipelineError::DuplicateSkill {
                        skill: canonical,
                        first: first.clone(),
                        second: domain_name,
                    });
                }
                skill_owner.insert(canonical.clone(), domain_name.clone());

                let forms: Vec<String> = std::iter::once(canonical.clone())
                    .chain(skill_spec.synonyms.iter().map(|s| normalize_name(s)))
                    .filter(|f| !f.is_empty())
                    .unique()
                    .collect();
                for form in &forms {
                    match form_owner.get(form) {
                        Some(owner) if *owner != canonical => {
                            return Err(PipelineError::ConflictingSynonym {
                                form: form.clone(),
                                first: owner.clone(),
                                second: canonical,
                            });
                        }
                        _ => {
                            form_owner.insert(form.clone(), canonical.clone());
                        }
                    }
                }
                skills.push(Skill { canonical, forms });
            }
            domains.push(Domain {
                name: domain_name,
                skills,
            });
        }

        let patterns = build_patterns(&domains);
        Ok(SkillVocabulary { domains, patterns })
    }

    /// Reads a vocabulary file; format follows the extension (toml, json, yaml...).
    pub fn from_file(path: &Path) -> Result<Self> {
        let spec: VocabularySpec = Config::builder()
            .add_source(File::from(path))
            .build()?
            .try_deserialize()?;
        Self::new(spec)
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        let spec: VocabularySpec = Config::builder()
            .add_source(File::from_str(text, FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        Self::new(spec)
    }

    /// The vocabulary shipped with the crate (`vocab/skills.toml`).
    pub fn builtin() -> Result<Self> {
        Self::from_toml_str(BUILTIN_TOML)
    }

    pub fn domains(&self) -> &[Domain] {
        &self.domains
    }

    pub fn domain_names(&self) -> impl Iterator<Item = &str> {
        self.domains.iter().map(|d| d.name.as_str())
    }

    pub fn skill_count(&self) -> usize {
        self.domains.iter().map(|d| d.skills.len()).sum()
    }

    pub fn contains(&self, skill: &str) -> bool {
        self.domain_of(skill).is_some()
    }

    pub fn domain_of(&self, skill: &str) -> Option<&str> {
        self.domains
            .iter()
            .find(|d| d.skills.iter().any(|s| s.canonical == skill))
            .map(|d| d.name.as_str())
    }

    pub(crate) fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    pub(crate) fn skill(&self, pattern: &Pattern) -> &Skill {
        &self.domains[pattern.domain].skills[pattern.skill]
    }
}

/// Longest surface form first; ties keep vocabulary order.
fn build_patterns(domains: &[Domain]) -> Vec<Pattern> {
    domains
        .iter()
        .enumerate()
        .flat_map(|(d, domain)| {
            domain.skills.iter().enumerate().flat_map(move |(s, skill)| {
                skill.forms.iter().map(move |form| Pattern {
                    form: form.clone(),
                    domain: d,
                    skill: s,
                })
            })
        })
        .sorted_by_key(|p| std::cmp::Reverse(p.form.chars().count()))
        .collect()
}

fn normalize_name(name: &str) -> String {
    collapse_whitespace(name).to_lowercase()
}
