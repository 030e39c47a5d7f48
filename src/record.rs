//! The structured output record and its assembly.
//!
//! Assembly is a pure merge of extraction, resolution, and normalization
//! outputs. It always succeeds: a post with zero recognizable fields still
//! yields a valid record with confidence 0.0 and the original text preserved
//! in the snippet.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::normalize::NormalizedText;
use crate::resolver::Resolution;
use crate::FieldMap;

/// An unstructured announcement as handed over by the ingestion side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPost {
    pub message_id: i64,
    pub posted_at: DateTime<Utc>,
    pub text: String,
    /// Opaque reference to where the post came from (channel, chat id, ...).
    pub source_ref: Option<String>,
}

/// What kind of announcement a post is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PostType {
    Passenger,
    Cargo,
    #[default]
    Unknown,
}

impl PostType {
    fn from_raw(raw: Option<&str>) -> Self {
        match raw {
            Some("passenger") => PostType::Passenger,
            Some("cargo") => PostType::Cargo,
            _ => PostType::Unknown,
        }
    }
}

/// The structured trip record produced once per [`RawPost`].
///
/// Raw values are always preserved; `*_code`, `date`, `time` and `airline`
/// are null unless their resolution succeeded. `confidence` summarizes how
/// many of the weighted fields resolved and never suppresses the record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripRecord {
    pub message_id: i64,
    pub posted_at: DateTime<Utc>,
    #[serde(rename = "type")]
    pub post_type: PostType,
    pub origin: String,
    pub origin_code: Option<String>,
    pub destination: String,
    pub destination_code: Option<String>,
    pub date: Option<NaiveDate>,
    pub date_raw: String,
    pub time: Option<String>,
    pub airline: Option<String>,
    /// Deduplicated contacts in insertion order.
    pub contacts: Vec<String>,
    pub snippet: String,
    pub confidence: f32,
}

// Fixed checklist weights; contacts deliberately contribute nothing.
const WEIGHT_TYPE: f32 = 0.15;
const WEIGHT_ORIGIN_CODE: f32 = 0.20;
const WEIGHT_DESTINATION_CODE: f32 = 0.20;
const WEIGHT_DATE: f32 = 0.20;
const WEIGHT_TIME: f32 = 0.10;
const WEIGHT_AIRLINE: f32 = 0.15;

/// Merge everything into the final record.
pub(crate) fn assemble(
    post: &RawPost,
    fields: &FieldMap,
    origin: Option<Resolution>,
    destination: Option<Resolution>,
    date: Option<NaiveDate>,
    time: Option<String>,
    normalized: &NormalizedText,
) -> TripRecord {
    let post_type = PostType::from_raw(fields.post_type.raw_value.as_deref());
    let origin_code = origin.as_ref().and_then(|r| r.code.clone());
    let destination_code = destination.as_ref().and_then(|r| r.code.clone());
    let airline = fields.airline.raw_value.clone();

    let mut confidence = 0.0;
    if post_type != PostType::Unknown {
        confidence += WEIGHT_TYPE;
    }
    if origin_code.is_some() {
        confidence += WEIGHT_ORIGIN_CODE;
    }
    if destination_code.is_some() {
        confidence += WEIGHT_DESTINATION_CODE;
    }
    if date.is_some() {
        confidence += WEIGHT_DATE;
    }
    if time.is_some() {
        confidence += WEIGHT_TIME;
    }
    if airline.is_some() {
        confidence += WEIGHT_AIRLINE;
    }

    TripRecord {
        message_id: post.message_id,
        posted_at: post.posted_at,
        post_type,
        origin: fields.origin.raw_value.clone().unwrap_or_default(),
        origin_code,
        destination: fields.destination.raw_value.clone().unwrap_or_default(),
        destination_code,
        date,
        date_raw: fields.date.raw_value.clone().unwrap_or_default(),
        time,
        airline,
        contacts: fields.contacts.clone(),
        snippet: normalized.text.replace('\n', " "),
        confidence,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize;

    fn post(text: &str) -> RawPost {
        RawPost {
            message_id: 7,
            posted_at: DateTime::from_timestamp(1_755_000_000, 0).unwrap(),
            text: text.to_string(),
            source_ref: None,
        }
    }

    #[test]
    fn empty_fields_assemble_to_confidence_zero() {
        let p = post("gibberish");
        let normalized = normalize("gibberish");
        let record = assemble(&p, &FieldMap::default(), None, None, None, None, &normalized);

        assert_eq!(record.post_type, PostType::Unknown);
        assert_eq!(record.origin, "");
        assert_eq!(record.origin_code, None);
        assert_eq!(record.date, None);
        assert_eq!(record.confidence, 0.0);
        assert_eq!(record.snippet, "gibberish");
        assert_eq!(record.message_id, 7);
    }

    #[test]
    fn confidence_sums_resolved_weights() {
        let p = post("x");
        let normalized = normalize("x");
        let mut fields = FieldMap::default();
        fields.post_type.raw_value = Some("passenger".into());
        fields.airline.raw_value = Some("Emirates".into());

        let origin = Resolution { name: "Tehran".into(), code: Some("THR".into()) };
        let record = assemble(
            &p,
            &fields,
            Some(origin),
            None,
            Some(NaiveDate::from_ymd_opt(2025, 8, 22).unwrap()),
            Some("09:15".into()),
            &normalized,
        );

        // type + origin_code + date + time + airline
        let expected = 0.15 + 0.20 + 0.20 + 0.10 + 0.15;
        assert!((record.confidence - expected).abs() < 1e-6);
    }

    #[test]
    fn serializes_with_the_contract_field_names() {
        let p = post("x");
        let normalized = normalize("x");
        let record = assemble(&p, &FieldMap::default(), None, None, None, None, &normalized);
        let json = serde_json::to_value(&record).unwrap();

        for key in [
            "message_id",
            "posted_at",
            "type",
            "origin",
            "origin_code",
            "destination",
            "destination_code",
            "date",
            "date_raw",
            "time",
            "airline",
            "contacts",
            "snippet",
            "confidence",
        ] {
            assert!(json.get(key).is_some(), "missing key: {key}");
        }
        assert_eq!(json["type"], "unknown");
        assert_eq!(json["origin_code"], serde_json::Value::Null);
    }
}
