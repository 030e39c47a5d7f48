//! Post type classification rules (passenger vs cargo).
//!
//! Hashtag rules come first: an explicit `#مسافر` beats a keyword buried in
//! prose. No keyword at all leaves the raw value empty and the record type
//! `Unknown` - never an error.

use crate::engine::BucketMask;
use crate::{rule, FieldKind, FieldRule, FieldValue};

/// `#مسافر`, `#traveler` and friends.
fn rule_hashtag_passenger() -> FieldRule {
    rule! {
        id: "type: passenger hashtag",
        kind: FieldKind::PostType,
        pattern: r"(?i)#(?:مسافر|همسفر|traveler|traveller|passenger)",
        buckets: BucketMask::HAS_HASH.bits(),
        prod: |_| Some(FieldValue::One("passenger".into())),
    }
}

fn rule_hashtag_cargo() -> FieldRule {
    rule! {
        id: "type: cargo hashtag",
        kind: FieldKind::PostType,
        pattern: r"(?i)#(?:بار|بسته|امانت|cargo|parcel|package|delivery|courier|shipment)",
        buckets: BucketMask::HAS_HASH.bits(),
        prod: |_| Some(FieldValue::One("cargo".into())),
    }
}

fn rule_keyword_passenger() -> FieldRule {
    rule! {
        id: "type: passenger keyword",
        kind: FieldKind::PostType,
        pattern: r"(?i)\b(?:traveler|traveller|passenger)\b|مسافر|همسفر",
        prod: |_| Some(FieldValue::One("passenger".into())),
    }
}

/// Bare cargo keywords. The Persian words are short and live inside longer
/// words ("انبار"), so they only count when standing alone.
fn rule_keyword_cargo() -> FieldRule {
    rule! {
        id: "type: cargo keyword",
        kind: FieldKind::PostType,
        pattern: r"(?i)\b(?:cargo|parcel|package|delivery|courier|shipment)\b|(?:^|[\s#])(?:بار|بسته|امانت)(?:[\s.,،؛!:]|$)",
        prod: |_| Some(FieldValue::One("cargo".into())),
    }
}

pub(crate) fn rules() -> Vec<FieldRule> {
    vec![
        rule_hashtag_passenger(),
        rule_hashtag_cargo(),
        rule_keyword_passenger(),
        rule_keyword_cargo(),
    ]
}

/// Keywords that must never be mistaken for city names by the route
/// fallback.
pub(crate) fn is_type_word(token_lower: &str) -> bool {
    const WORDS: &[&str] = &[
        "traveler", "traveller", "passenger", "cargo", "parcel", "package", "delivery",
        "courier", "shipment", "مسافر", "همسفر", "بار", "بسته", "امانت",
    ];
    WORDS.contains(&token_lower)
}
