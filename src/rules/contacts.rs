//! Contact extraction: messaging handles and phone numbers.
//!
//! Contacts are the one field that keeps every match. Both rules walk the
//! whole text with `find_iter`; the extractor unions their output and
//! deduplicates case-insensitively.

use crate::engine::BucketMask;
use crate::normalize::NormalizedText;
use crate::{regex, scan_rule, FieldKind, FieldRule, FieldValue};

pub(crate) fn rules() -> Vec<FieldRule> {
    vec![
        scan_rule! {
            id: "contacts: handles",
            kind: FieldKind::Contacts,
            buckets: BucketMask::HAS_AT.bits(),
            scan: scan_handles,
        },
        scan_rule! {
            id: "contacts: phones",
            kind: FieldKind::Contacts,
            buckets: BucketMask::HAS_DIGITS.bits(),
            scan: scan_phones,
        },
    ]
}

fn scan_handles(text: &NormalizedText) -> Option<FieldValue> {
    let re = regex!(r"@[A-Za-z0-9_]\w*");
    let found: Vec<String> = re
        .find_iter(&text.text)
        .map(|m| m.as_str().to_string())
        .collect();
    (!found.is_empty()).then_some(FieldValue::Many(found))
}

fn scan_phones(text: &NormalizedText) -> Option<FieldValue> {
    let re = regex!(r"\+?\d[\d\s()\-]*\d");
    let mut found = Vec::new();
    for m in re.find_iter(&text.text) {
        split_span(m.as_str(), &mut found);
    }
    (!found.is_empty()).then_some(FieldValue::Many(found))
}

/// Canonicalizes one phone-shaped span into numbers: separators stripped, a
/// leading `+` kept, 10 to 15 digits each. A span may glue several numbers
/// together ("0912 123 4567 0935 111 2233"), so digit groups accumulate only
/// until a number reaches plausible length; the next group then starts a new
/// number. A trailing run too short to be a number is dropped as noise.
fn split_span(span: &str, out: &mut Vec<String>) {
    let mut current = String::new();
    if span.starts_with('+') {
        current.push('+');
    }

    let mut digits = 0usize;
    for group in span.split(|c: char| !c.is_ascii_digit()) {
        if group.is_empty() {
            continue;
        }
        current.push_str(group);
        digits += group.len();
        if digits >= 10 {
            if digits <= 15 {
                out.push(std::mem::take(&mut current));
            } else {
                current.clear();
            }
            digits = 0;
        }
    }
}
