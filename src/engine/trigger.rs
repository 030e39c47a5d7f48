//! Trigger scanning (input pre-classification).
//!
//! Inspects the normalized input and produces coarse boolean signals
//! (`BucketMask`) that let the extractor quickly decide which rules are worth
//! trying at all. This is a heuristic scan: false positives are acceptable
//! because the rules still have to match their full patterns; false
//! negatives are not, so keep the checks generous.

use super::compiled::BucketMask;
use crate::normalize;

/// Input characteristics detected from the normalized input.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TriggerInfo {
    pub buckets: BucketMask,
}

const MONTH_WORDS_EN: &[&str] = &[
    "january", "february", "march", "april", "may", "june", "july", "august", "september",
    "october", "november", "december", "jan", "feb", "mar", "apr", "jun", "jul", "aug", "sep",
    "sept", "oct", "nov", "dec",
];

const MONTH_WORDS_FA: &[&str] = &[
    // Jalali
    "فروردین", "اردیبهشت", "خرداد", "تیر", "مرداد", "شهریور", "مهر", "آبان", "آذر", "دی",
    "بهمن", "اسفند",
    // Gregorian months in Persian script
    "ژانویه", "فوریه", "مارس", "آوریل", "مه", "ژوئن", "ژوئیه", "جولای", "اوت", "آگوست",
    "سپتامبر", "اکتبر", "نوامبر", "دسامبر",
];

impl TriggerInfo {
    /// Scan `input` for coarse buckets.
    pub fn scan(input: &str) -> Self {
        let mut buckets = BucketMask::empty();
        let lower = input.to_lowercase();

        if input.bytes().any(|b| b.is_ascii_digit()) {
            buckets |= BucketMask::HAS_DIGITS;
        }
        if input.contains(':') || input.contains('：') {
            buckets |= BucketMask::HAS_COLON;
        }
        if normalize::contains_persian(input) {
            buckets |= BucketMask::HAS_PERSIAN;
        }
        if input.contains('@') {
            buckets |= BucketMask::HAS_AT;
        }
        if input.contains('#') {
            buckets |= BucketMask::HAS_HASH;
        }

        // AM/PM with crude substring checks; the time rules do the real work.
        if lower.contains("am") || lower.contains("a.m") || lower.contains("pm") || lower.contains("p.m") {
            buckets |= BucketMask::HAS_AMPM;
        }

        // Month detection, both scripts.
        let monthish = lower.split_whitespace().any(|w| {
            let w = w.trim_matches(|c: char| !c.is_alphabetic());
            MONTH_WORDS_EN.contains(&w) || MONTH_WORDS_FA.contains(&w)
        });
        if monthish {
            buckets |= BucketMask::MONTHISH;
        }

        TriggerInfo { buckets }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_buckets() {
        let info = TriggerInfo::scan("از تهران به تورنتو، 31 مرداد ساعت 09:15 @ali #مسافر");
        assert!(info.buckets.contains(BucketMask::HAS_DIGITS));
        assert!(info.buckets.contains(BucketMask::HAS_COLON));
        assert!(info.buckets.contains(BucketMask::HAS_PERSIAN));
        assert!(info.buckets.contains(BucketMask::HAS_AT));
        assert!(info.buckets.contains(BucketMask::HAS_HASH));
        assert!(info.buckets.contains(BucketMask::MONTHISH));
        assert!(!info.buckets.contains(BucketMask::HAS_AMPM));
    }

    #[test]
    fn plain_text_sets_nothing() {
        let info = TriggerInfo::scan("hello world");
        assert!(info.buckets.is_empty());
    }

    #[test]
    fn english_months_and_ampm() {
        let info = TriggerInfo::scan("Flight date: 22 Aug, time 9:30 pm");
        assert!(info.buckets.contains(BucketMask::MONTHISH));
        assert!(info.buckets.contains(BucketMask::HAS_AMPM));
    }
}
