use std::collections::{BTreeMap, BTreeSet};
use std::ops::Range;

use super::vocabulary::SkillVocabulary;
use crate::record::{NormalizedJobRecord, SkillMatch};

/// Scans title + description matching copies against the vocabulary.
pub fn extract(record: &NormalizedJobRecord, vocabulary: &SkillVocabulary) -> SkillMatch {
    let text = format!(
        "{} | {}",
        record.title_matching_copy(),
        record.matching_copy()
    );
    extract_from_text(&text, vocabulary)
}

/// Longest-match-first scan. A span claimed by a longer form cannot be
/// claimed again by a shorter one, so "react native" never also yields "react".
pub fn extract_from_text(text: &str, vocabulary: &SkillVocabulary) -> SkillMatch {
    let text = text.to_lowercase();
    let mut consumed: Vec<Range<usize>> = Vec::new();
    let mut skills = BTreeSet::new();
    let mut domains: BTreeMap<String, usize> = vocabulary
        .domain_names()
        .map(|name| (name.to_string(), 0))
        .collect();

    for pattern in vocabulary.patterns() {
        let mut matched = false;
        for (start, found) in text.match_indices(pattern.form.as_str()) {
            let span = start..start + found.len();
            if !is_whole_token(&text, &span) || overlaps(&consumed, &span) {
                continue;
            }
            consumed.push(span);
            matched = true;
        }
        if !matched {
            continue;
        }
        let skill = vocabulary.skill(pattern);
        if skills.insert(skill.canonical.clone()) {
            let domain = &vocabulary.domains()[pattern.domain].name;
            if let Some(count) = domains.get_mut(domain) {
                *count += 1;
            }
        }
    }

    SkillMatch { skills, domains }
}

/// Characters that glue onto a token: "c++", "c#", "python3", "snake_case".
fn is_token_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '+' | '#')
}

fn is_whole_token(text: &str, span: &Range<usize>) -> bool {
    let before = text[..span.start].chars().next_back();
    let after = text[span.end..].chars().next();
    !before.is_some_and(is_token_char) && !after.is_some_and(is_token_char)
}

fn overlaps(consumed: &[Range<usize>], span: &Range<usize>) -> bool {
    consumed
        .iter()
        .any(|r| r.start < span.end && span.start < r.end)
}
