extern crate self as parvaz;

use regex::Regex;

mod macros;
pub(crate) use macros::{regex, rule, scan_rule};
mod alias;
mod api;
mod datetime;
mod engine;
mod error;
mod normalize;
mod record;
mod resolver;
mod rules;

pub use alias::{AliasEntry, AliasTable, FuzzyPolicy, Lang};
pub use api::{
    Context, ExtractionTrace, FieldTrace, Options, extract, extract_verbose_with, extract_with,
};
pub use datetime::{DayMonthOrder, jalali_to_gregorian, normalize_date, normalize_time};
pub use error::AliasLoadError;
pub use normalize::{NormalizedText, normalize};
pub use record::{PostType, RawPost, TripRecord};
pub use resolver::{CityResolver, Resolution};

// --- Internal types ---------------------------------------------------------

/// Field categories filled by a single extraction pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    PostType,
    Origin,
    Destination,
    Date,
    Time,
    Airline,
    Contacts,
}

impl FieldKind {
    /// Single-valued kinds, in evaluation order. `Contacts` is the one
    /// collect-all kind and is handled separately by the extractor.
    pub(crate) const SCALAR: [FieldKind; 6] = [
        FieldKind::PostType,
        FieldKind::Origin,
        FieldKind::Destination,
        FieldKind::Date,
        FieldKind::Time,
        FieldKind::Airline,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            FieldKind::PostType => "type",
            FieldKind::Origin => "origin",
            FieldKind::Destination => "destination",
            FieldKind::Date => "date",
            FieldKind::Time => "time",
            FieldKind::Airline => "airline",
            FieldKind::Contacts => "contacts",
        }
    }
}

/// Value produced by a rule production.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum FieldValue {
    /// A single raw string (every scalar kind).
    One(String),
    /// Multiple raw strings from one pass over the text (contacts).
    Many(Vec<String>),
}

/// Tagged outcome of applying one rule to the normalized text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RuleOutcome {
    Matched { value: FieldValue, rule_id: &'static str },
    NoMatch,
}

/// Production for regex-backed rules: maps the first match's capture groups
/// to a field value. Returning `None` lets the next rule in line try.
pub(crate) type Produce = fn(&regex::Captures<'_>) -> Option<FieldValue>;

/// How a rule inspects the input: either a regular expression over the
/// normalized text (the common case, stored as a static reference created via
/// the `regex!` macro in `src/macros.rs`), or a free-form scan function for
/// rules that cannot be expressed as a single pattern (token fallbacks,
/// longest-keyword selection, multi-match collection).
pub(crate) enum Matcher {
    Regex { re: &'static Regex, produce: Produce },
    Scan(fn(&NormalizedText) -> Option<FieldValue>),
}

impl std::fmt::Debug for Matcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Matcher::Regex { re, .. } => f.debug_tuple("Regex").field(&re.as_str()).finish(),
            Matcher::Scan(_) => f.debug_tuple("Scan").field(&"<function>").finish(),
        }
    }
}

/// An extraction rule: an id, the field kind it fills, a matcher, and an
/// optional bucket mask gating its activation (see `engine/trigger.rs`).
///
/// Rules for the same kind are evaluated in declaration order; the first one
/// that matches wins the field. That ordering is part of the contract: the
/// most specific phrasing must be listed before bare co-occurrence.
#[derive(Debug)]
pub(crate) struct FieldRule {
    pub id: &'static str,
    pub kind: FieldKind,
    pub matcher: Matcher,
    /// Bucket mask - rule only activates if the input has matching buckets.
    pub buckets: u32,
}

impl FieldRule {
    pub(crate) fn apply(&self, text: &NormalizedText) -> RuleOutcome {
        let value = match &self.matcher {
            Matcher::Regex { re, produce } => re.captures(&text.text).and_then(|caps| produce(&caps)),
            Matcher::Scan(scan) => scan(text),
        };
        match value {
            Some(value) => RuleOutcome::Matched { value, rule_id: self.id },
            None => RuleOutcome::NoMatch,
        }
    }
}

// --- Extraction output ------------------------------------------------------

/// Raw string captured for one field, plus the id of the rule that matched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedField {
    pub raw_value: Option<String>,
    pub rule_id: Option<&'static str>,
}

impl ExtractedField {
    pub(crate) fn matched(raw_value: String, rule_id: &'static str) -> Self {
        ExtractedField { raw_value: Some(raw_value), rule_id: Some(rule_id) }
    }
}

/// Everything one extraction pass found, before resolution and assembly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMap {
    pub post_type: ExtractedField,
    pub origin: ExtractedField,
    pub destination: ExtractedField,
    pub date: ExtractedField,
    pub time: ExtractedField,
    pub airline: ExtractedField,
    /// Deduplicated contacts in insertion order.
    pub contacts: Vec<String>,
    /// Ids of the contact rules that contributed at least one entry.
    pub contact_rules: Vec<&'static str>,
}

impl FieldMap {
    pub fn scalar(&self, kind: FieldKind) -> Option<&ExtractedField> {
        match kind {
            FieldKind::PostType => Some(&self.post_type),
            FieldKind::Origin => Some(&self.origin),
            FieldKind::Destination => Some(&self.destination),
            FieldKind::Date => Some(&self.date),
            FieldKind::Time => Some(&self.time),
            FieldKind::Airline => Some(&self.airline),
            FieldKind::Contacts => None,
        }
    }

    pub(crate) fn scalar_mut(&mut self, kind: FieldKind) -> Option<&mut ExtractedField> {
        match kind {
            FieldKind::PostType => Some(&mut self.post_type),
            FieldKind::Origin => Some(&mut self.origin),
            FieldKind::Destination => Some(&mut self.destination),
            FieldKind::Date => Some(&mut self.date),
            FieldKind::Time => Some(&mut self.time),
            FieldKind::Airline => Some(&mut self.airline),
            FieldKind::Contacts => None,
        }
    }
}
