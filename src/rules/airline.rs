//! Airline rules: a labeled line first, then a free-text keyword scan.

use crate::normalize::NormalizedText;
use crate::rules::group;
use crate::{rule, scan_rule, FieldKind, FieldRule, FieldValue};

/// Known carriers, longest spelling first per carrier. Matching prefers the
/// longest keyword found anywhere in the text, so "Qatar Airways" beats the
/// bare "Qatar" and a tie falls back to table order. Keywords match against
/// normalized text, so ZWNJ-joined spellings are written with a plain space.
const AIRLINES: &[(&str, &str)] = &[
    ("turkish airlines", "Turkish Airlines"),
    ("turkish", "Turkish Airlines"),
    ("ترکیش", "Turkish Airlines"),
    ("qatar airways", "Qatar Airways"),
    ("qatar", "Qatar Airways"),
    ("قطر", "Qatar Airways"),
    ("emirates", "Emirates"),
    ("امارات", "Emirates"),
    ("lufthansa", "Lufthansa"),
    ("لوفت هانزا", "Lufthansa"),
    ("لوفتانزا", "Lufthansa"),
    ("air canada", "Air Canada"),
    ("ایرکانادا", "Air Canada"),
    ("iran air", "Iran Air"),
    ("ایران ایر", "Iran Air"),
    ("mahan air", "Mahan Air"),
    ("mahan", "Mahan Air"),
    ("ماهان", "Mahan Air"),
    ("oman air", "Oman Air"),
    ("عمان ایر", "Oman Air"),
    ("aseman", "Aseman"),
    ("آسمان", "Aseman"),
    ("qeshm air", "Qeshm Air"),
    ("qeshm", "Qeshm Air"),
    ("قشم", "Qeshm Air"),
    ("pegasus", "Pegasus"),
    ("پگاسوس", "Pegasus"),
    ("flydubai", "Flydubai"),
    ("فلای دبی", "Flydubai"),
    ("klm", "KLM"),
    ("austrian", "Austrian"),
    ("اتریشی", "Austrian"),
];

pub(crate) fn rules() -> Vec<FieldRule> {
    vec![
        rule! {
            id: "airline: labeled",
            kind: FieldKind::Airline,
            pattern: r"(?im)^\s*(?:پرواز|ایرلاین|airline|carrier)\s*[:：]\s*(.+)$",
            prod: |caps| {
                let line = match group(caps, 1) {
                    Some(FieldValue::One(s)) => s,
                    _ => return None,
                };
                Some(FieldValue::One(
                    best_keyword(&line.to_lowercase())
                        .map(str::to_string)
                        .unwrap_or(line),
                ))
            },
        },
        scan_rule! {
            id: "airline: keyword",
            kind: FieldKind::Airline,
            scan: scan_keyword,
        },
    ]
}

/// Longest known keyword contained in `lower`, canonicalized.
fn best_keyword(lower: &str) -> Option<&'static str> {
    let mut best: Option<(&'static str, usize)> = None;
    for (keyword, canonical) in AIRLINES {
        if lower.contains(keyword) {
            let len = keyword.chars().count();
            if best.map_or(true, |(_, n)| len > n) {
                best = Some((canonical, len));
            }
        }
    }
    best.map(|(canonical, _)| canonical)
}

fn scan_keyword(text: &NormalizedText) -> Option<FieldValue> {
    best_keyword(&text.text.to_lowercase()).map(|name| FieldValue::One(name.to_string()))
}

/// Whether a lowercased token belongs to some airline spelling. Used to keep
/// carrier names out of the route fallback.
pub(crate) fn is_airline_word(lower: &str) -> bool {
    AIRLINES
        .iter()
        .any(|(keyword, _)| keyword.split_whitespace().any(|word| word == lower))
        || lower == "airways"
        || lower == "air"
        || lower == "airlines"
        || lower == "ایر"
}
