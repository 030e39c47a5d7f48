//! Raw date and time capture rules.
//!
//! These rules only locate a span worth interpreting; the actual calendar
//! and clock work (Jalali conversion, two-digit years, day parts) happens
//! downstream in [`crate::datetime`]. Time rules that know their meridiem
//! sit above the bare `HH:MM` rule so "9:30 pm" is captured with its suffix.

use crate::engine::BucketMask;
use crate::rules::{group, whole};
use crate::{rule, FieldKind, FieldRule};

pub(crate) fn rules() -> Vec<FieldRule> {
    vec![
        // --- date -----------------------------------------------------------
        rule! {
            id: "date: labeled",
            kind: FieldKind::Date,
            pattern: r"(?im)^\s*(?:تاریخ(?:\s*پرواز)?|flight\s*date|departure\s*date|date)\s*[:：]?\s+(.+)$",
            buckets: BucketMask::HAS_DIGITS.bits(),
            prod: |caps| group(caps, 1),
        },
        rule! {
            id: "date: month name fa (day first)",
            kind: FieldKind::Date,
            pattern: r"\b\d{1,2}\s+(?:فروردین|اردیبهشت|خرداد|تیر|مرداد|شهریور|مهر|آبان|آذر|دی|بهمن|اسفند|ژانویه|فوریه|مارس|آوریل|مه|ژوئن|ژوئیه|جولای|اوت|آگوست|سپتامبر|اکتبر|نوامبر|دسامبر)(?:\s+\d{2,4})?",
            buckets: BucketMask::MONTHISH.bits(),
            prod: whole,
        },
        rule! {
            id: "date: month name fa (month first)",
            kind: FieldKind::Date,
            pattern: r"(?:فروردین|اردیبهشت|خرداد|تیر|مرداد|شهریور|مهر|آبان|آذر|دی|بهمن|اسفند|ژانویه|فوریه|مارس|آوریل|مه|ژوئن|ژوئیه|جولای|اوت|آگوست|سپتامبر|اکتبر|نوامبر|دسامبر)\s+\d{1,2}(?:\s+\d{2,4})?",
            buckets: BucketMask::MONTHISH.bits(),
            prod: whole,
        },
        rule! {
            id: "date: month name en (day first)",
            kind: FieldKind::Date,
            pattern: r"(?i)\b\d{1,2}(?:st|nd|rd|th)?\s+(?:jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|jun(?:e)?|jul(?:y)?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)\b\.?(?:,?\s+\d{2,4})?",
            buckets: BucketMask::MONTHISH.bits(),
            prod: whole,
        },
        rule! {
            id: "date: month name en (month first)",
            kind: FieldKind::Date,
            pattern: r"(?i)\b(?:jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|jun(?:e)?|jul(?:y)?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)\b\.?\s+\d{1,2}(?:st|nd|rd|th)?(?:,?\s+\d{2,4})?",
            buckets: BucketMask::MONTHISH.bits(),
            prod: whole,
        },
        rule! {
            id: "date: numeric",
            kind: FieldKind::Date,
            pattern: r"\b(?:\d{1,2}|\d{4})[/.-]\d{1,2}(?:[/.-]\d{2,4})?\b",
            buckets: BucketMask::HAS_DIGITS.bits(),
            prod: whole,
        },
        // --- time -----------------------------------------------------------
        rule! {
            id: "time: labeled",
            kind: FieldKind::Time,
            pattern: r"(?im)^\s*(?:زمان(?:\s*پرواز)?|ساعت|departure\s*time|time|at)\s*[:：]?\s+(.+)$",
            buckets: BucketMask::HAS_DIGITS.bits(),
            prod: |caps| group(caps, 1),
        },
        rule! {
            id: "time: am-pm",
            kind: FieldKind::Time,
            pattern: r"(?i)\b\d{1,2}(?::[0-5]\d)?\s*(?:a\.?m\.?|p\.?m\.?)",
            buckets: BucketMask::HAS_AMPM.bits(),
            prod: whole,
        },
        rule! {
            id: "time: day part fa",
            kind: FieldKind::Time,
            pattern: r"\b\d{1,2}(?:[:.][0-5]\d)?\s*(?:صبح|ظهر|عصر|شب)",
            buckets: BucketMask::HAS_PERSIAN.bits(),
            prod: whole,
        },
        rule! {
            id: "time: saat inline",
            kind: FieldKind::Time,
            pattern: r"ساعت\s+(\d{1,2}(?:[:.][0-5]\d)?(?:\s*(?:صبح|ظهر|عصر|شب))?)",
            buckets: BucketMask::HAS_PERSIAN.bits(),
            prod: |caps| group(caps, 1),
        },
        rule! {
            id: "time: hh-mm",
            kind: FieldKind::Time,
            pattern: r"\b(?:[01]?\d|2[0-3])[:.٫][0-5]\d\b",
            buckets: BucketMask::HAS_DIGITS.bits(),
            prod: whole,
        },
    ]
}
