//! Origin and destination rules.
//!
//! Both kinds walk the same ladder, most specific first:
//!
//! 1. labeled lines (`مبدا: تهران`, `origin: Tehran`);
//! 2. inline directional phrases (`from A to B`, `از A به B`);
//! 3. bare directional cues (`to Toronto`, `به تورنتو`);
//! 4. a fallback that takes the first (origin) / second (destination)
//!    distinct city-like token in document order.
//!
//! The ladder is why a post mentioning three cities but one directional
//! phrase resolves to the phrase's pair: directional rules sit above the
//! co-occurrence fallback and first match wins.

use crate::engine::BucketMask;
use crate::normalize::NormalizedText;
use crate::rules::group;
use crate::{datetime, rule, scan_rule, FieldKind, FieldRule, FieldValue};

use super::{airline, post_type};

pub(crate) fn rules() -> Vec<FieldRule> {
    vec![
        // --- origin ---------------------------------------------------------
        rule! {
            id: "origin: labeled fa",
            kind: FieldKind::Origin,
            pattern: r"(?m)^#?\s*(?:مبدا|مبدأ)\s*[:：]\s*(.+)$",
            buckets: BucketMask::HAS_PERSIAN.bits(),
            prod: |caps| group(caps, 1),
        },
        rule! {
            id: "origin: labeled en",
            kind: FieldKind::Origin,
            pattern: r"(?im)^\s*(?:origin|from)\s*[:：]\s*(.+)$",
            prod: |caps| group(caps, 1),
        },
        rule! {
            id: "origin: from-to en",
            kind: FieldKind::Origin,
            pattern: r"(?i)\bfrom\s+(.+?)\s+to\s+(.+?)(?:[\s.,;،؛]|$)",
            prod: |caps| group(caps, 1),
        },
        rule! {
            id: "origin: from-to fa",
            kind: FieldKind::Origin,
            pattern: r"\bاز\s+(.+?)\s+به\s+(.+?)(?:[\s.,;،؛]|$)",
            buckets: BucketMask::HAS_PERSIAN.bits(),
            prod: |caps| group(caps, 1),
        },
        rule! {
            id: "origin: bare from en",
            kind: FieldKind::Origin,
            pattern: r"(?i)\bfrom\s+([^\s.,;،؛:]+)",
            prod: |caps| group(caps, 1),
        },
        rule! {
            id: "origin: bare from fa",
            kind: FieldKind::Origin,
            pattern: r"\bاز\s+([^\s.,;،؛:]+)",
            buckets: BucketMask::HAS_PERSIAN.bits(),
            prod: |caps| group(caps, 1),
        },
        scan_rule! {
            id: "origin: city-token fallback",
            kind: FieldKind::Origin,
            scan: scan_origin,
        },
        // --- destination ----------------------------------------------------
        rule! {
            id: "destination: labeled fa",
            kind: FieldKind::Destination,
            pattern: r"(?m)^#?\s*مقصد\s*[:：]\s*(.+)$",
            buckets: BucketMask::HAS_PERSIAN.bits(),
            prod: |caps| group(caps, 1),
        },
        rule! {
            id: "destination: labeled en",
            kind: FieldKind::Destination,
            pattern: r"(?im)^\s*(?:destination|to)\s*[:：]\s*(.+)$",
            prod: |caps| group(caps, 1),
        },
        rule! {
            id: "destination: from-to en",
            kind: FieldKind::Destination,
            pattern: r"(?i)\bfrom\s+(?:.+?)\s+to\s+(.+?)(?:[\s.,;،؛]|$)",
            prod: |caps| group(caps, 1),
        },
        rule! {
            id: "destination: from-to fa",
            kind: FieldKind::Destination,
            pattern: r"\bاز\s+(?:.+?)\s+به\s+(.+?)(?:[\s.,;،؛]|$)",
            buckets: BucketMask::HAS_PERSIAN.bits(),
            prod: |caps| group(caps, 1),
        },
        rule! {
            id: "destination: bare to en",
            kind: FieldKind::Destination,
            pattern: r"(?i)\bto\s+([^\s.,;،؛:]+)",
            prod: |caps| group(caps, 1),
        },
        rule! {
            id: "destination: bare to fa",
            kind: FieldKind::Destination,
            pattern: r"\bبه\s+([^\s.,;،؛:]+)",
            buckets: BucketMask::HAS_PERSIAN.bits(),
            prod: |caps| group(caps, 1),
        },
        scan_rule! {
            id: "destination: city-token fallback",
            kind: FieldKind::Destination,
            scan: scan_destination,
        },
    ]
}

// --- City-token fallback -----------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cue {
    None,
    From,
    To,
}

/// Tokens that could plausibly be a city name, each tagged with the
/// directional cue of the word right before it.
fn city_tokens(text: &NormalizedText) -> Vec<(String, Cue)> {
    let mut out = Vec::new();
    let mut prev_lower = String::new();

    for raw in text.text.split_whitespace() {
        let token = raw.trim_matches(|c: char| !c.is_alphabetic() && c != '-');
        let lower = token.to_lowercase();
        if !token.is_empty() && is_city_like(token, &lower) {
            let cue = match prev_lower.as_str() {
                "از" | "from" => Cue::From,
                "به" | "to" => Cue::To,
                _ => Cue::None,
            };
            out.push((token.to_string(), cue));
        }
        prev_lower = lower;
    }
    out
}

fn is_city_like(token: &str, lower: &str) -> bool {
    if !token.chars().all(|c| c.is_alphabetic() || c == '-') {
        return false;
    }
    let persian = crate::normalize::contains_persian(token);
    let min_len = if persian { 2 } else { 3 };
    if token.chars().count() < min_len {
        return false;
    }
    !is_stopword(lower)
        && !post_type::is_type_word(lower)
        && !airline::is_airline_word(lower)
        && !datetime::is_month_word(lower)
}

fn is_stopword(lower: &str) -> bool {
    const STOPWORDS: &[&str] = &[
        // English function and label words
        "from", "to", "the", "and", "for", "with", "via", "on", "at", "in", "of", "is", "are",
        "date", "time", "flight", "airline", "carrier", "contact", "origin", "destination",
        "available", "ticket", "luggage", "suitcase", "space", "airport", "direct",
        "next", "this", "week", "day", "today", "tomorrow",
        "monday", "tuesday", "wednesday", "thursday", "friday", "saturday", "sunday",
        // Persian function and label words
        "از", "به", "در", "با", "و", "تا", "برای", "که", "این", "آن", "من", "ما", "شما",
        "هم", "یا", "را", "رو", "هستم", "دارم", "میرم", "تاریخ", "ساعت", "زمان", "پرواز",
        "تماس", "مبدا", "مبدأ", "مقصد", "بلیط", "چمدان", "فرودگاه", "کیلو", "ارسال",
        "فردا", "امروز", "هفته", "سه", "شنبه", "یکشنبه", "دوشنبه", "چهارشنبه", "پنجشنبه",
        "جمعه", "صبح", "ظهر", "عصر", "شب",
    ];
    STOPWORDS.contains(&lower)
}

/// First city-like token not claimed by a destination cue.
fn scan_origin(text: &NormalizedText) -> Option<FieldValue> {
    city_tokens(text)
        .into_iter()
        .find(|(_, cue)| *cue != Cue::To)
        .map(|(token, _)| FieldValue::One(token))
}

/// A to-cued token wins outright; otherwise the second distinct city-like
/// token in document order, skipping from-cued ones.
fn scan_destination(text: &NormalizedText) -> Option<FieldValue> {
    let tokens = city_tokens(text);

    if let Some((token, _)) = tokens.iter().find(|(_, cue)| *cue == Cue::To) {
        return Some(FieldValue::One(token.clone()));
    }

    let (first, _) = tokens.iter().find(|(_, cue)| *cue != Cue::To)?;
    tokens
        .iter()
        .filter(|(_, cue)| *cue != Cue::From)
        .find(|(token, _)| !token.eq_ignore_ascii_case(first) && token != first)
        .map(|(token, _)| FieldValue::One(token.clone()))
}
