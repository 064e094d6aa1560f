use std::ops::RangeInclusive;
use std::sync::LazyLock;

use regex::Regex;

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^<>]*>").unwrap());
static ENTITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&(#[0-9]{1,7}|#[xX][0-9a-fA-F]{1,6}|[a-zA-Z]{2,8});").unwrap());

/// Strips markup, entities and control characters and collapses whitespace.
///
/// Decoding can expose new markup (`&lt;b&gt;`) or another entity layer
/// (`&amp;amp;`), so rounds repeat until the text stops changing. A round
/// never lengthens the text, and only shortening or control-to-space edits
/// change it, so this terminates.
pub fn clean_text(raw: &str) -> String {
    let mut current = collapse_whitespace(raw);
    loop {
        let decoded = decode_entities(&current);
        let stripped = TAG_RE.replace_all(&decoded, " ");
        let next = collapse_whitespace(&strip_control(&stripped));
        if next == current {
            return current;
        }
        current = next;
    }
}

pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn strip_control(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}

fn decode_entities(text: &str) -> String {
    ENTITY_RE
        .replace_all(text, |caps: &regex::Captures| {
            let name = &caps[1];
            decode_entity(name).unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

fn decode_entity(name: &str) -> Option<String> {
    if let Some(num) = name.strip_prefix('#') {
        let cp = match num.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => num.parse::<u32>().ok()?,
        };
        return char::from_u32(cp).map(String::from);
    }
    let decoded = match name {
        "amp" => "&",
        "lt" => "<",
        "gt" => ">",
        "quot" => "\"",
        "apos" => "'",
        "nbsp" => " ",
        "ndash" => "-",
        "mdash" => "-",
        "hellip" => "...",
        "rsquo" | "lsquo" => "'",
        "rdquo" | "ldquo" => "\"",
        "bull" | "middot" => " ",
        _ => return None,
    };
    Some(decoded.to_string())
}

/// Title-cases `text` when it is entirely upper- or lowercase. Mixed case is
/// assumed to already be formatted by a human and is left alone.
pub fn normalize_case(text: &str) -> String {
    let has_upper = text.chars().any(char::is_uppercase);
    let has_lower = text.chars().any(char::is_lowercase);
    if has_upper == has_lower {
        return text.to_string();
    }
    text.split(' ').map(title_case_word).collect::<Vec<_>>().join(" ")
}

fn title_case_word(word: &str) -> String {
    let mut out = String::with_capacity(word.len());
    let mut at_start = true;
    for c in word.chars() {
        if at_start && c.is_alphabetic() {
            out.extend(c.to_uppercase());
            at_start = false;
        } else {
            out.extend(c.to_lowercase());
            if c.is_alphanumeric() {
                at_start = false;
            }
        }
    }
    out
}

/// Pictographs, symbols, dingbats and regional-indicator (flag) halves.
const EMOJI_RANGES: &[RangeInclusive<u32>] = &[
    0x2600..=0x27BF,
    0x1F1E6..=0x1F1FF,
    0x1F300..=0x1FAFF,
];

pub fn is_emoji_char(c: char) -> bool {
    let cp = u32::from(c);
    EMOJI_RANGES.iter().any(|range| range.contains(&cp))
}
