//! Text normalization (script, digit, and whitespace canonicalization).
//!
//! Every extraction pass starts here. Announcement posts mix Persian and
//! Arabic letterforms, two numeral systems, zero-width joiners from mobile
//! keyboards, and erratic spacing; the rule tables downstream assume all of
//! that has been folded into one canonical shape.
//!
//! Normalization never fails: empty input yields empty normalized text.

/// The original input paired with its canonicalized form.
///
/// Rules match against `text`; `original` is retained so assembled records
/// can preserve the author's exact wording.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedText {
    pub original: String,
    pub text: String,
}

/// Canonicalize `input`. Applied in order:
///
/// 1. Persian (U+06F0..U+06F9) and Arabic-Indic (U+0660..U+0669) digits fold
///    to ASCII.
/// 2. Visually-equivalent letterforms collapse: Arabic yeh and alef maksura
///    to Persian yeh, Arabic kaf to Persian kaf.
/// 3. Zero-width joiners become a space (so "ایران‌ایر" matches "ایران ایر");
///    directional marks and the BOM are dropped.
/// 4. Runs of horizontal whitespace collapse to a single space. Newlines
///    survive: labeled-field rules are line-anchored.
/// 5. Each line and the whole text are trimmed.
pub fn normalize(input: &str) -> NormalizedText {
    let mut folded = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            // Persian digits
            '\u{06F0}'..='\u{06F9}' => {
                folded.push(char::from(b'0' + (c as u32 - 0x06F0) as u8));
            }
            // Arabic-Indic digits
            '\u{0660}'..='\u{0669}' => {
                folded.push(char::from(b'0' + (c as u32 - 0x0660) as u8));
            }
            // Arabic yeh / alef maksura -> Persian yeh
            '\u{064A}' | '\u{0649}' => folded.push('\u{06CC}'),
            // Arabic kaf -> Persian kaf
            '\u{0643}' => folded.push('\u{06A9}'),
            // ZWNJ / ZWJ -> space
            '\u{200C}' | '\u{200D}' => folded.push(' '),
            // Directional marks, BOM, embedding/isolate controls: dropped
            '\u{200E}' | '\u{200F}' | '\u{202A}'..='\u{202E}' | '\u{2066}'..='\u{2069}'
            | '\u{FEFF}' => {}
            '\r' => {}
            _ => folded.push(c),
        }
    }

    let text = folded
        .split('\n')
        .map(collapse_spaces)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string();

    NormalizedText { original: input.to_string(), text }
}

fn collapse_spaces(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut in_gap = false;
    for c in line.trim().chars() {
        if c == ' ' || c == '\t' {
            if !in_gap {
                out.push(' ');
                in_gap = true;
            }
        } else {
            out.push(c);
            in_gap = false;
        }
    }
    out
}

/// True if `text` contains any character from the main Arabic block.
/// Used to tag alias lookups with a language.
pub(crate) fn contains_persian(text: &str) -> bool {
    text.chars().any(|c| ('\u{0600}'..='\u{06FF}').contains(&c))
}
