//! The bilingual rule tables, one module per field kind.
//!
//! Within each kind the list order is the precedence order: the extractor
//! tries rules top to bottom and the first match wins. Keep explicit
//! phrasings (labeled lines, directional patterns) above bare fallbacks.

pub(crate) mod airline;
pub(crate) mod contacts;
pub(crate) mod datetime_raw;
pub(crate) mod post_type;
pub(crate) mod route;


use crate::{FieldRule, FieldValue};

/// The full default rule set.
pub(crate) fn get() -> Vec<FieldRule> {
    let mut rules = Vec::new();
    rules.extend(post_type::rules());
    rules.extend(route::rules());
    rules.extend(datetime_raw::rules());
    rules.extend(airline::rules());
    rules.extend(contacts::rules());
    rules
}

/// Capture group `i`, trimmed of whitespace and trailing punctuation.
pub(crate) fn group(caps: &regex::Captures<'_>, i: usize) -> Option<FieldValue> {
    let raw = caps.get(i)?.as_str();
    let cleaned = raw.trim().trim_end_matches(['.', ',', ';', ':', '،', '؛', '!']).trim();
    if cleaned.is_empty() { None } else { Some(FieldValue::One(cleaned.to_string())) }
}

/// The whole match, verbatim.
pub(crate) fn whole(caps: &regex::Captures<'_>) -> Option<FieldValue> {
    let raw = caps.get(0)?.as_str().trim();
    if raw.is_empty() { None } else { Some(FieldValue::One(raw.to_string())) }
}
