use std::sync::LazyLock;

use itertools::Itertools;
use regex::Regex;

use super::text::{clean_text, is_emoji_char};
use crate::record::NOT_SPECIFIED;

pub const REMOTE: &str = "remote";
pub const HYBRID: &str = "hybrid";
pub const ONSITE: &str = "onsite";

/// Alias phrases per category. Categories are tried in order, so remote wins
/// over hybrid for strings such as "Remote or hybrid".
const ALIASES: &[(&str, &[&str])] = &[
    (
        REMOTE,
        &["remote", "wfh", "work from home", "anywhere", "worldwide", "global", "distributed"],
    ),
    (HYBRID, &["hybrid"]),
    (ONSITE, &["onsite", "on-site", "on site", "in office", "in-office"]),
];

/// Countries and regions accepted as geographic signal on their own. The
/// United States is matched separately by [`US_RE`].
const REGIONS: &[&str] = &[
    "united states", "america", "north america", "latam", "latin america",
    "canada", "mexico", "brazil", "argentina", "uk", "united kingdom", "england", "ireland",
    "europe", "emea", "eu", "germany", "france", "spain", "portugal", "italy", "netherlands",
    "poland", "sweden", "norway", "denmark", "finland", "switzerland", "austria", "belgium",
    "india", "apac", "asia", "singapore", "japan", "china", "australia", "new zealand",
    "africa", "nigeria", "kenya", "south africa", "israel", "uae", "dubai", "philippines",
    "london", "berlin", "paris", "new york", "nyc", "san francisco", "sf", "bay area",
    "seattle", "austin", "boston", "chicago", "los angeles", "toronto", "vancouver",
    "amsterdam", "bangalore", "bengaluru", "tokyo", "sydney",
];

static ALIAS_RES: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    ALIASES
        .iter()
        .map(|(category, phrases)| (*category, any_word(phrases)))
        .collect()
});

static REGION_RE: LazyLock<Regex> = LazyLock::new(|| any_word(REGIONS));

/// Case-sensitive: lowercase "us" is almost always the pronoun.
static US_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bUSA?\b").unwrap());

/// "City, Region" with letters on both sides of the comma.
static PAIR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\p{L}[\p{L} .'-]*,\s*\p{L}").unwrap());

/// Case-insensitive whole-word alternation over `phrases`.
fn any_word(phrases: &[&str]) -> Regex {
    let alternation = phrases.iter().map(|p| regex::escape(p)).join("|");
    Regex::new(&format!(r"(?i)\b(?:{alternation})\b")).unwrap()
}

/// Maps a free-form location to a category, a cleaned place name, or the
/// sentinel.
pub fn normalize_location(raw: Option<&str>) -> String {
    let Some(raw) = raw else {
        return NOT_SPECIFIED.to_string();
    };
    let cleaned = strip_punctuation(&clean_text(raw));
    if cleaned.is_empty() || cleaned.eq_ignore_ascii_case(NOT_SPECIFIED) {
        return NOT_SPECIFIED.to_string();
    }

    if let Some((category, _)) = ALIAS_RES.iter().find(|(_, re)| re.is_match(&cleaned)) {
        return (*category).to_string();
    }

    if has_geographic_signal(&cleaned) {
        cleaned
    } else {
        NOT_SPECIFIED.to_string()
    }
}

fn has_geographic_signal(cleaned: &str) -> bool {
    PAIR_RE.is_match(cleaned) || US_RE.is_match(cleaned) || REGION_RE.is_match(cleaned)
}

/// Keeps letters, digits, whitespace and the separators place names use.
fn strip_punctuation(text: &str) -> String {
    let kept: String = text
        .chars()
        .filter(|c| !is_emoji_char(*c))
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, ',' | '-' | '.' | '\'' | '%' | '/') {
                c
            } else {
                ' '
            }
        })
        .collect();
    let collapsed = kept.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed
        .replace(" ,", ",")
        .trim_matches(|c: char| !c.is_alphanumeric())
        .to_string()
}
