//! Public entry points: one post in, one [`TripRecord`] out.
//!
//! `extract` runs the whole pipeline with defaults, `extract_with` takes an
//! explicit context and options, and `extract_verbose_with` additionally
//! returns a trace of what fired. Extraction is total: every call yields a
//! record, however empty the input.

use std::time::{Duration, Instant};

use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use tracing::debug;

use crate::alias::AliasTable;
use crate::datetime::{self, DayMonthOrder};
use crate::engine::Extractor;
use crate::normalize;
use crate::record::{self, RawPost, TripRecord};
use crate::resolver::CityResolver;
use crate::rules;
use crate::{FieldKind, FieldMap, FieldRule, FuzzyPolicy};

static DEFAULT_RULES: Lazy<Vec<FieldRule>> = Lazy::new(rules::get);

/// Ambient state an extraction runs against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Context {
    /// Anchor for yearless dates and Jalali year inference.
    pub reference_time: NaiveDateTime,
}

impl Default for Context {
    fn default() -> Self {
        let reference_time = if cfg!(test) {
            NaiveDateTime::parse_from_str("2025-08-20 12:00:00", "%Y-%m-%d %H:%M:%S").unwrap()
        } else {
            chrono::Utc::now().naive_utc()
        };
        Context { reference_time }
    }
}

impl Context {
    pub fn new(reference_time: NaiveDateTime) -> Self {
        Context { reference_time }
    }
}

/// Tunables that change interpretation, not the rule set.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Options {
    pub day_month_order: DayMonthOrder,
    pub fuzzy: FuzzyPolicy,
}

/// One scalar field as the trace saw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldTrace {
    pub kind: FieldKind,
    pub rule_id: Option<&'static str>,
    pub raw: Option<String>,
}

/// Debug-level account of a single extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionTrace {
    /// Trigger buckets seen in the input, rendered as flag names.
    pub buckets: String,
    /// Ids of the rules the buckets activated, in precedence order.
    pub active_rules: Vec<&'static str>,
    pub fields: Vec<FieldTrace>,
    pub contacts: Vec<String>,
    pub elapsed: Duration,
}

/// Extract with the default context and options.
pub fn extract(post: &RawPost, table: &AliasTable) -> TripRecord {
    extract_with(post, table, &Context::default(), &Options::default())
}

pub fn extract_with(
    post: &RawPost,
    table: &AliasTable,
    ctx: &Context,
    opts: &Options,
) -> TripRecord {
    let (record, _) = run(post, table, ctx, opts);
    record
}

/// Like [`extract_with`], plus a trace for debug tooling.
pub fn extract_verbose_with(
    post: &RawPost,
    table: &AliasTable,
    ctx: &Context,
    opts: &Options,
) -> (TripRecord, ExtractionTrace) {
    let start = Instant::now();
    let (record, raw) = run(post, table, ctx, opts);
    let (buckets, active_rules, fields) = raw;

    let trace = ExtractionTrace {
        buckets,
        active_rules,
        fields,
        contacts: record.contacts.clone(),
        elapsed: start.elapsed(),
    };
    (record, trace)
}

type RunTrace = (String, Vec<&'static str>, Vec<FieldTrace>);

fn run(post: &RawPost, table: &AliasTable, ctx: &Context, opts: &Options) -> (TripRecord, RunTrace) {
    let normalized = normalize::normalize(&post.text);
    let extractor = Extractor::new(&normalized, &DEFAULT_RULES);
    let fields = extractor.run();

    let resolver = CityResolver::with_policy(table, opts.fuzzy);
    let origin = fields.origin.raw_value.as_deref().map(|raw| resolver.resolve(raw));
    let destination = fields.destination.raw_value.as_deref().map(|raw| resolver.resolve(raw));

    let reference = ctx.reference_time.date();
    let date = fields
        .date
        .raw_value
        .as_deref()
        .and_then(|raw| datetime::normalize_date(raw, reference, opts.day_month_order));
    let time = fields.time.raw_value.as_deref().and_then(datetime::normalize_time);

    debug!(
        message_id = post.message_id,
        origin = ?origin,
        destination = ?destination,
        date = ?date,
        time = ?time,
        "post resolved"
    );

    let record = record::assemble(post, &fields, origin, destination, date, time, &normalized);

    let buckets = format!("{:?}", extractor.trigger().buckets);
    let active = extractor.active_rule_ids();
    let traces = field_traces(&fields);
    (record, (buckets, active, traces))
}

fn field_traces(fields: &FieldMap) -> Vec<FieldTrace> {
    FieldKind::SCALAR
        .iter()
        .filter_map(|&kind| {
            fields.scalar(kind).map(|f| FieldTrace {
                kind,
                rule_id: f.rule_id,
                raw: f.raw_value.clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};

    use crate::record::PostType;

    fn post(text: &str) -> RawPost {
        RawPost {
            message_id: 42,
            posted_at: Utc.with_ymd_and_hms(2025, 8, 20, 9, 0, 0).unwrap(),
            text: text.to_string(),
            source_ref: Some("channel:test".to_string()),
        }
    }

    #[test]
    fn six_field_english_post() {
        let table = AliasTable::builtin();
        let record = extract(
            &post("Passenger flight from Tehran to Toronto\nDate: 2025-09-05 at 18:45\nTurkish Airlines\nContact @ali_travel"),
            &table,
        );

        assert_eq!(record.post_type, PostType::Passenger);
        assert_eq!(record.origin, "Tehran");
        assert_eq!(record.origin_code.as_deref(), Some("THR"));
        assert_eq!(record.destination, "Toronto");
        assert_eq!(record.destination_code.as_deref(), Some("YYZ"));
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2025, 9, 5));
        assert_eq!(record.time.as_deref(), Some("18:45"));
        assert_eq!(record.airline.as_deref(), Some("Turkish Airlines"));
        assert_eq!(record.contacts, vec!["@ali_travel"]);
        assert!((record.confidence - 1.0).abs() < 1e-6);
    }

    #[test]
    fn persian_post_with_jalali_date() {
        let table = AliasTable::builtin();
        let record = extract(
            &post("#مسافر\nمبدا: تهران (ونک)\nمقصد: تورنتو\nتاریخ پرواز: ۱۴۰۳/۰۵/۳۱ ساعت ۸ شب\nتماس: ۰۹۱۲۱۲۳۴۵۶۷"),
            &table,
        );

        assert_eq!(record.post_type, PostType::Passenger);
        assert_eq!(record.origin_code.as_deref(), Some("THR"));
        assert_eq!(record.destination_code.as_deref(), Some("YYZ"));
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2024, 8, 21));
        assert_eq!(record.time.as_deref(), Some("20:00"));
        assert_eq!(record.contacts, vec!["09121234567"]);
    }

    #[test]
    fn empty_post_still_yields_a_record() {
        let table = AliasTable::builtin();
        for text in ["", "   \n  ", "👍👍👍"] {
            let record = extract(&post(text), &table);
            assert_eq!(record.post_type, PostType::Unknown);
            assert_eq!(record.origin, "");
            assert!(record.origin_code.is_none());
            assert!(record.date.is_none());
            assert!(record.contacts.is_empty());
            assert_eq!(record.confidence, 0.0);
        }
    }

    #[test]
    fn extraction_is_idempotent() {
        let table = AliasTable::builtin();
        let p = post("از تهران به ونکوور، ۲ مرداد، ساعت ۱۷:۳۰، ماهان");
        let a = extract(&p, &table);
        let b = extract(&p, &table);
        let ja = serde_json::to_string(&a).unwrap();
        let jb = serde_json::to_string(&b).unwrap();
        assert_eq!(ja, jb);
    }

    #[test]
    fn verbose_trace_reports_winning_rules() {
        let table = AliasTable::builtin();
        let (record, trace) = extract_verbose_with(
            &post("from Tehran to Toronto 21:10"),
            &table,
            &Context::default(),
            &Options::default(),
        );

        assert_eq!(record.time.as_deref(), Some("21:10"));
        assert!(!trace.active_rules.is_empty());
        let origin = trace.fields.iter().find(|f| f.kind == FieldKind::Origin).unwrap();
        assert_eq!(origin.rule_id, Some("origin: from-to en"));
        assert!(trace.buckets.contains("HAS_DIGITS"));
    }

    #[test]
    fn confidence_tracks_resolved_fields_only() {
        let table = AliasTable::builtin();
        let record = extract(&post("از تهرون به جایی‌نامعلوم"), &table);

        // Fuzzy repair resolves the origin; the destination stays raw.
        assert_eq!(record.origin_code.as_deref(), Some("THR"));
        assert!(record.destination_code.is_none());
        assert!((record.confidence - 0.20).abs() < 1e-6);
    }
}
