//! Date and time normalization.
//!
//! Raw tokens captured by the extractor are turned into canonical values
//! here: dates become `NaiveDate` (serialized as ISO-8601), times become
//! `"HH:MM"`. Three families of dates are understood:
//!
//! - ASCII-Gregorian numerics (`22/08/2025`, `2025-08-22`);
//! - solar (Jalali) numerics, recognized by year magnitude (1200..1500)
//!   rather than any locale flag, and converted with the Borkowski
//!   algorithm;
//! - bilingual month names (`22 Aug`, `31 مرداد 1403`, `5 سپتامبر`).
//!
//! A token that fails every attempt yields `None`; the raw text is preserved
//! upstream, so this is a missing-data signal rather than an error.

use chrono::{Datelike, NaiveDate};

use crate::{normalize, regex};

/// How to read `a/b` when both numbers could be a day or a month.
///
/// This is a deterministic policy choice, not a per-call guess: the posts
/// this engine reads overwhelmingly write day first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DayMonthOrder {
    #[default]
    DayFirst,
    MonthFirst,
}

/// Jalali years live in this range for any post worth parsing; a leading
/// number inside it is a solar year, outside it a Gregorian one.
const JALALI_YEAR_RANGE: std::ops::Range<i32> = 1200..1500;

/// Offset between a Gregorian year and the Jalali year covering most of it.
/// Used when a Jalali date omits its year.
const JALALI_YEAR_OFFSET: i32 = 621;

const GREG_MONTHS: &[(&str, u32)] = &[
    ("january", 1),
    ("february", 2),
    ("march", 3),
    ("april", 4),
    ("may", 5),
    ("june", 6),
    ("july", 7),
    ("august", 8),
    ("september", 9),
    ("october", 10),
    ("november", 11),
    ("december", 12),
    ("jan", 1),
    ("feb", 2),
    ("mar", 3),
    ("apr", 4),
    ("jun", 6),
    ("jul", 7),
    ("aug", 8),
    ("sep", 9),
    ("sept", 9),
    ("oct", 10),
    ("nov", 11),
    ("dec", 12),
];

const JALALI_MONTHS: &[(&str, u32)] = &[
    ("فروردین", 1),
    ("اردیبهشت", 2),
    ("خرداد", 3),
    ("تیر", 4),
    ("مرداد", 5),
    ("شهریور", 6),
    ("مهر", 7),
    ("آبان", 8),
    ("آذر", 9),
    ("دی", 10),
    ("بهمن", 11),
    ("اسفند", 12),
];

/// Persian spellings of the Gregorian months, with the common variants.
const PERSIAN_GREG_MONTHS: &[(&str, u32)] = &[
    ("ژانویه", 1),
    ("فوریه", 2),
    ("مارس", 3),
    ("آوریل", 4),
    ("مه", 5),
    ("ژوئن", 6),
    ("ژوئیه", 7),
    ("جولای", 7),
    ("اوت", 8),
    ("آگوست", 8),
    ("سپتامبر", 9),
    ("اکتبر", 10),
    ("نوامبر", 11),
    ("دسامبر", 12),
];

fn month_en(name: &str) -> Option<u32> {
    GREG_MONTHS.iter().find(|(n, _)| name.eq_ignore_ascii_case(n)).map(|&(_, m)| m)
}

fn month_jalali(name: &str) -> Option<u32> {
    JALALI_MONTHS.iter().find(|(n, _)| *n == name).map(|&(_, m)| m)
}

fn month_fa_greg(name: &str) -> Option<u32> {
    PERSIAN_GREG_MONTHS.iter().find(|(n, _)| *n == name).map(|&(_, m)| m)
}

/// True if `token` is a month name in any supported spelling. The route
/// fallback uses this to keep months out of city-token candidates.
pub(crate) fn is_month_word(token: &str) -> bool {
    month_en(token).is_some() || month_jalali(token).is_some() || month_fa_greg(token).is_some()
}

/// Parse a raw date token to a calendar date. `reference` supplies the year
/// when the token omits one; `order` settles ambiguous two-number dates.
pub fn normalize_date(raw: &str, reference: NaiveDate, order: DayMonthOrder) -> Option<NaiveDate> {
    let t = normalize::normalize(raw).text.to_lowercase();
    if t.is_empty() {
        return None;
    }

    parse_month_name_fa(&t, reference)
        .or_else(|| parse_month_name_en(&t, reference))
        .or_else(|| parse_numeric(&t, reference, order))
}

/// Parse a raw time token to `"HH:MM"` (24h).
pub fn normalize_time(raw: &str) -> Option<String> {
    let t = normalize::normalize(raw).text.to_lowercase();
    if t.is_empty() {
        return None;
    }

    // The am/pm and day-part forms must run before the bare HH:MM form:
    // "9:30 pm" contains a valid-looking "9:30".
    parse_time_ampm(&t)
        .or_else(|| parse_time_daypart_fa(&t))
        .or_else(|| parse_time_hhmm(&t))
        .or_else(|| parse_time_bare_hour(&t))
        .map(|(h, m)| format!("{h:02}:{m:02}"))
}

/// Jalali to Gregorian conversion (Borkowski). Exact for modern dates.
pub fn jalali_to_gregorian(jy: i32, jm: u32, jd: u32) -> Option<NaiveDate> {
    if !(1..=12).contains(&jm) || !(1..=31).contains(&jd) {
        return None;
    }

    let jy = jy + 1595;
    let mut days = -355668
        + 365 * jy
        + (jy / 33) * 8
        + ((jy % 33 + 3) / 4)
        + jd as i32
        + if jm <= 6 { 31 * (jm as i32 - 1) } else { 186 + (jm as i32 - 7) * 30 };
    if days < 0 {
        return None;
    }

    let mut gy = 400 * (days / 146097);
    days %= 146097;
    if days > 36524 {
        days -= 1;
        gy += 100 * (days / 36524);
        days %= 36524;
        if days >= 365 {
            days += 1;
        }
    }
    gy += 4 * (days / 1461);
    days %= 1461;
    if days > 365 {
        gy += (days - 1) / 365;
        days = (days - 1) % 365;
    }

    let mut gd = days + 1;
    let leap = (gy % 4 == 0 && gy % 100 != 0) || gy % 400 == 0;
    let month_days = [31, if leap { 29 } else { 28 }, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
    let mut gm = 0usize;
    while gm < 12 && gd > month_days[gm] {
        gd -= month_days[gm];
        gm += 1;
    }

    NaiveDate::from_ymd_opt(gy, gm as u32 + 1, gd as u32)
}

// --- Date parsing attempts ---------------------------------------------------

fn parse_month_name_fa(t: &str, reference: NaiveDate) -> Option<NaiveDate> {
    // Day first: "31 مرداد 1403", "5 سپتامبر"
    let day_first = regex!(
        r"\b(\d{1,2})\s+(فروردین|اردیبهشت|خرداد|تیر|مرداد|شهریور|مهر|آبان|آذر|دی|بهمن|اسفند|ژانویه|فوریه|مارس|آوریل|مه|ژوئن|ژوئیه|جولای|اوت|آگوست|سپتامبر|اکتبر|نوامبر|دسامبر)(?:\s+(\d{3,4}))?\b"
    );
    for caps in day_first.captures_iter(t) {
        let day: u32 = caps[1].parse().ok()?;
        let name = &caps[2];
        let year: Option<i32> = caps.get(3).and_then(|m| m.as_str().parse().ok());

        if let Some(jm) = month_jalali(name) {
            let jy = year.unwrap_or(reference.year() - JALALI_YEAR_OFFSET);
            if let Some(date) = jalali_to_gregorian(jy, jm, day) {
                return Some(date);
            }
        } else if let Some(gm) = month_fa_greg(name) {
            let gy = match year {
                Some(y) if y >= 1700 => y,
                _ => reference.year(),
            };
            if let Some(date) = NaiveDate::from_ymd_opt(gy, gm, day) {
                return Some(date);
            }
        }
    }

    // Month first: "سپتامبر 5 2025" (Gregorian-in-Persian only)
    let month_first = regex!(
        r"\b(ژانویه|فوریه|مارس|آوریل|مه|ژوئن|ژوئیه|جولای|اوت|آگوست|سپتامبر|اکتبر|نوامبر|دسامبر)\s+(\d{1,2})(?:\s+(\d{3,4}))?\b"
    );
    for caps in month_first.captures_iter(t) {
        let gm = month_fa_greg(&caps[1])?;
        let day: u32 = caps[2].parse().ok()?;
        let gy = match caps.get(3).and_then(|m| m.as_str().parse::<i32>().ok()) {
            Some(y) if y >= 1700 => y,
            _ => reference.year(),
        };
        if let Some(date) = NaiveDate::from_ymd_opt(gy, gm, day) {
            return Some(date);
        }
    }

    None
}

fn parse_month_name_en(t: &str, reference: NaiveDate) -> Option<NaiveDate> {
    // "22 August 2025", "22 Aug", "22-aug"
    let day_first = regex!(r"\b(\d{1,2})(?:st|nd|rd|th)?[ /-]+([a-z]+)\.?(?:,?\s+(\d{2,4}))?\b");
    for caps in day_first.captures_iter(t) {
        if let Some(month) = month_en(&caps[2]) {
            let day: u32 = caps[1].parse().ok()?;
            let year = expand_year(caps.get(3).and_then(|m| m.as_str().parse().ok()), reference);
            if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
                return Some(date);
            }
        }
    }

    // "Aug 22", "august 22, 2025"
    let month_first = regex!(r"\b([a-z]+)\.?[ /-]+(\d{1,2})(?:st|nd|rd|th)?(?:,?\s+(\d{2,4}))?\b");
    for caps in month_first.captures_iter(t) {
        if let Some(month) = month_en(&caps[1]) {
            let day: u32 = caps[2].parse().ok()?;
            let year = expand_year(caps.get(3).and_then(|m| m.as_str().parse().ok()), reference);
            if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
                return Some(date);
            }
        }
    }

    None
}

fn parse_numeric(t: &str, reference: NaiveDate, order: DayMonthOrder) -> Option<NaiveDate> {
    let re = regex!(r"\b(\d{1,4})[/.-](\d{1,2})(?:[/.-](\d{2,4}))?\b");
    for caps in re.captures_iter(t) {
        let a_raw = &caps[1];
        let a: i32 = a_raw.parse().ok()?;
        let b: u32 = caps[2].parse().ok()?;
        let c: Option<i32> = caps.get(3).and_then(|m| m.as_str().parse().ok());

        // Leading 3-4 digit number is a year: "2025-08-22", "1403/05/31".
        if a_raw.len() >= 3 {
            let Some(day) = c else { continue };
            let day = day as u32;
            let date = if JALALI_YEAR_RANGE.contains(&a) {
                jalali_to_gregorian(a, b, day)
            } else {
                NaiveDate::from_ymd_opt(a, b, day)
            };
            if let Some(date) = date {
                return Some(date);
            }
            continue;
        }

        // Two small numbers, optional trailing year: "22/08/2025", "5/6".
        let a = a as u32;
        let (day, month) = if a > 12 {
            (a, b)
        } else if b > 12 {
            (b, a)
        } else {
            match order {
                DayMonthOrder::DayFirst => (a, b),
                DayMonthOrder::MonthFirst => (b, a),
            }
        };

        let date = match c {
            Some(y) if JALALI_YEAR_RANGE.contains(&y) => jalali_to_gregorian(y, month, day),
            y => NaiveDate::from_ymd_opt(expand_year(y, reference), month, day),
        };
        if let Some(date) = date {
            return Some(date);
        }
    }

    None
}

fn expand_year(year: Option<i32>, reference: NaiveDate) -> i32 {
    match year {
        Some(y) if y < 100 => 2000 + y,
        Some(y) => y,
        None => reference.year(),
    }
}

// --- Time parsing attempts ---------------------------------------------------

fn parse_time_ampm(t: &str) -> Option<(u32, u32)> {
    let re = regex!(r"\b(\d{1,2})(?::([0-5]\d))?\s*(a\.?m\.?|p\.?m\.?)");
    let caps = re.captures(t)?;
    let h: u32 = caps[1].parse().ok()?;
    if !(1..=12).contains(&h) {
        return None;
    }
    let m: u32 = caps.get(2).map_or(0, |g| g.as_str().parse().unwrap_or(0));
    let pm = caps[3].starts_with('p');
    let h = match (pm, h) {
        (true, 12) => 12,
        (true, h) => h + 12,
        (false, 12) => 0,
        (false, h) => h,
    };
    Some((h, m))
}

fn parse_time_daypart_fa(t: &str) -> Option<(u32, u32)> {
    let re = regex!(r"\b(\d{1,2})(?::([0-5]\d))?\s*(صبح|ظهر|عصر|شب)");
    let caps = re.captures(t)?;
    let h: u32 = caps[1].parse().ok()?;
    if !(1..=12).contains(&h) {
        return None;
    }
    let m: u32 = caps.get(2).map_or(0, |g| g.as_str().parse().unwrap_or(0));
    let h = match &caps[3] {
        "صبح" => {
            if h == 12 {
                0
            } else {
                h
            }
        }
        // Afternoon/evening words shift to 24h; noon stays put.
        _ => {
            if h == 12 {
                12
            } else {
                h + 12
            }
        }
    };
    Some((h, m))
}

fn parse_time_hhmm(t: &str) -> Option<(u32, u32)> {
    let re = regex!(r"\b([01]?\d|2[0-3])[:.٫]([0-5]\d)\b");
    let caps = re.captures(t)?;
    Some((caps[1].parse().ok()?, caps[2].parse().ok()?))
}

/// A lone hour ("ساعت 14" arrives here as "14").
fn parse_time_bare_hour(t: &str) -> Option<(u32, u32)> {
    let caps = regex!(r"^([01]?\d|2[0-3])$").captures(t.trim())?;
    Some((caps[1].parse().ok()?, 0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn reference() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 8, 20).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn jalali_conversion_fixtures() {
        assert_eq!(jalali_to_gregorian(1403, 5, 31), Some(date(2024, 8, 21)));
        assert_eq!(jalali_to_gregorian(1404, 1, 1), Some(date(2025, 3, 21)));
        assert_eq!(jalali_to_gregorian(1403, 1, 1), Some(date(2024, 3, 20)));
        assert_eq!(jalali_to_gregorian(1403, 13, 1), None);
        assert_eq!(jalali_to_gregorian(1403, 0, 1), None);
    }

    #[test]
    fn date_examples() {
        let cases: Vec<(NaiveDate, &str)> = vec![
            (date(2025, 8, 22), "2025-08-22"),
            (date(2025, 8, 22), "22/08/2025"),
            (date(2025, 8, 22), "22.08.2025"),
            (date(2025, 8, 22), "22/08/25"),
            (date(2025, 8, 22), "22 August 2025"),
            (date(2025, 8, 22), "22 Aug"),
            (date(2025, 8, 22), "Aug 22"),
            (date(2025, 8, 22), "august 22, 2025"),
            (date(2024, 8, 21), "31 مرداد 1403"),
            (date(2024, 8, 21), "1403/05/31"),
            (date(2024, 8, 21), "31/5/1403"),
            (date(2025, 9, 5), "5 سپتامبر"),
            (date(2025, 9, 5), "سپتامبر 5"),
            (date(2025, 9, 5), "5 سپتامبر 2025"),
        ];
        for (expected, input) in cases {
            assert_eq!(
                normalize_date(input, reference(), DayMonthOrder::DayFirst),
                Some(expected),
                "input: {input}"
            );
        }
    }

    #[test]
    fn yearless_jalali_uses_reference_year() {
        // Reference 2025 -> Jalali 1404; 1404-05-31 is 2025-08-22.
        assert_eq!(
            normalize_date("31 مرداد", reference(), DayMonthOrder::DayFirst),
            Some(date(2025, 8, 22))
        );
    }

    #[test]
    fn ambiguous_numeric_defaults_to_day_first() {
        assert_eq!(
            normalize_date("05/06/2025", reference(), DayMonthOrder::DayFirst),
            Some(date(2025, 6, 5))
        );
        assert_eq!(
            normalize_date("05/06/2025", reference(), DayMonthOrder::MonthFirst),
            Some(date(2025, 5, 6))
        );
        // Unambiguous: 22 can only be a day, regardless of policy.
        assert_eq!(
            normalize_date("08/22/2025", reference(), DayMonthOrder::DayFirst),
            Some(date(2025, 8, 22))
        );
    }

    #[test]
    fn unparseable_dates_yield_none() {
        for input in ["", "soon", "99/99/9999", "32/13/2025", "فردا"] {
            assert_eq!(normalize_date(input, reference(), DayMonthOrder::DayFirst), None, "input: {input}");
        }
    }

    #[test]
    fn time_examples() {
        let cases: Vec<(&str, &str)> = vec![
            ("09:15", "09:15"),
            ("09:15", "ساعت 09:15"),
            ("21:30", "9:30 pm"),
            ("21:30", "9:30pm"),
            ("09:30", "9:30 am"),
            ("00:00", "12 am"),
            ("12:00", "12 pm"),
            ("19:00", "7 عصر"),
            ("21:00", "9 شب"),
            ("09:00", "9 صبح"),
            ("12:00", "12 ظهر"),
            ("14:00", "14"),
            ("23:45", "23:45"),
        ];
        for (expected, input) in cases {
            assert_eq!(normalize_time(input).as_deref(), Some(expected), "input: {input}");
        }
    }

    #[test]
    fn unparseable_times_yield_none() {
        for input in ["", "25:00", "1:99", "evening", "عصر"] {
            assert_eq!(normalize_time(input), None, "input: {input}");
        }
    }
}
