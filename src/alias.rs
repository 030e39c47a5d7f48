//! The alias table: an immutable, load-once mapping from normalized city
//! spellings to canonical names and airport/city codes.
//!
//! A single city accumulates many spellings across two scripts ("تهران",
//! "طهران", "tehran", "thr") and may be served by several airports; each
//! entry therefore carries an ordered code list with one designated primary.
//! The table is built once at startup, validated, and shared by reference
//! into every extraction call. It is never mutated afterwards, so read-only
//! sharing across threads needs no locking.

use std::collections::HashMap;
use std::io;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::AliasLoadError;
use crate::normalize;

/// Script/language tag attached to each alias.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    Fa,
    En,
}

/// One known spelling of a city, with its canonical identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasEntry {
    /// The spelling. Normalized (digits, letterforms, whitespace, case) at
    /// load time, so configuration files may use any equivalent form.
    pub alias: String,
    pub lang: Lang,
    pub canonical_name: String,
    /// Ordered, non-empty list of valid codes for this city.
    pub codes: Vec<String>,
    /// The designated code among `codes` that resolution returns.
    pub primary_code: String,
}

/// Immutable lookup table over [`AliasEntry`] records.
#[derive(Debug, Clone, Default)]
pub struct AliasTable {
    entries: Vec<AliasEntry>,
    /// Tag-specific index: `(normalized alias, lang)` -> entry.
    by_alias_lang: HashMap<(String, Lang), usize>,
    /// Language-agnostic fallback index; the first entry for a spelling wins.
    by_alias: HashMap<String, usize>,
}

/// Knobs for the bounded fuzzy lookup. Edit-distance budgets are relative to
/// alias length: aliases shorter than `min_alias_len` get no budget at all,
/// longer ones get `alias_len / 4` capped at `max_distance`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FuzzyPolicy {
    pub min_alias_len: usize,
    pub max_distance: usize,
}

impl Default for FuzzyPolicy {
    fn default() -> Self {
        FuzzyPolicy { min_alias_len: 4, max_distance: 2 }
    }
}

impl FuzzyPolicy {
    fn budget(&self, alias_len: usize) -> usize {
        if alias_len < self.min_alias_len { 0 } else { (alias_len / 4).min(self.max_distance) }
    }
}

impl AliasTable {
    /// Build and validate a table. Fails on an empty collection, an entry
    /// with no codes, or a primary code missing from its own list.
    pub fn from_entries(entries: Vec<AliasEntry>) -> Result<Self, AliasLoadError> {
        if entries.is_empty() {
            return Err(AliasLoadError::Empty);
        }

        let mut table = AliasTable::default();
        for mut entry in entries {
            if entry.codes.is_empty() {
                return Err(AliasLoadError::NoCodes { alias: entry.alias });
            }
            if !entry.codes.contains(&entry.primary_code) {
                return Err(AliasLoadError::PrimaryNotListed {
                    alias: entry.alias,
                    primary: entry.primary_code,
                });
            }

            entry.alias = canonical_key(&entry.alias);
            let idx = table.entries.len();
            table.by_alias_lang.insert((entry.alias.clone(), entry.lang), idx);
            table.by_alias.entry(entry.alias.clone()).or_insert(idx);
            table.entries.push(entry);
        }

        debug!(entries = table.entries.len(), "alias table loaded");
        Ok(table)
    }

    /// Load from a JSON array of entries.
    pub fn from_json_str(json: &str) -> Result<Self, AliasLoadError> {
        let entries: Vec<AliasEntry> = serde_json::from_str(json)?;
        Self::from_entries(entries)
    }

    /// Load from a reader yielding a JSON array of entries.
    pub fn from_json_reader<R: io::Read>(reader: R) -> Result<Self, AliasLoadError> {
        let entries: Vec<AliasEntry> = serde_json::from_reader(reader)?;
        Self::from_entries(entries)
    }

    /// The explicit opt-in degraded table: every resolution misses, so all
    /// records carry null codes. Deployments that cannot supply alias data
    /// must choose this deliberately rather than ship an empty file.
    pub fn degraded() -> Self {
        AliasTable::default()
    }

    /// Starter table covering the cities seen most often in the source
    /// channels. Real deployments load their own configuration on top.
    pub fn builtin() -> Self {
        fn entry(
            alias: &str,
            lang: Lang,
            name: &str,
            codes: &[&str],
            primary: &str,
        ) -> AliasEntry {
            AliasEntry {
                alias: alias.to_string(),
                lang,
                canonical_name: name.to_string(),
                codes: codes.iter().map(|c| c.to_string()).collect(),
                primary_code: primary.to_string(),
            }
        }

        let thr = &["THR", "IKA"];
        let entries = vec![
            entry("تهران", Lang::Fa, "Tehran", thr, "THR"),
            entry("طهران", Lang::Fa, "Tehran", thr, "THR"),
            entry("tehran", Lang::En, "Tehran", thr, "THR"),
            entry("thr", Lang::En, "Tehran", thr, "THR"),
            entry("ika", Lang::En, "Tehran", thr, "IKA"),
            entry("imam", Lang::En, "Tehran", thr, "IKA"),
            entry("imam khomeini", Lang::En, "Tehran", thr, "IKA"),
            entry("تورنتو", Lang::Fa, "Toronto", &["YYZ"], "YYZ"),
            entry("toronto", Lang::En, "Toronto", &["YYZ"], "YYZ"),
            entry("yyz", Lang::En, "Toronto", &["YYZ"], "YYZ"),
            entry("pearson", Lang::En, "Toronto", &["YYZ"], "YYZ"),
            entry("ونکوور", Lang::Fa, "Vancouver", &["YVR"], "YVR"),
            entry("vancouver", Lang::En, "Vancouver", &["YVR"], "YVR"),
            entry("yvr", Lang::En, "Vancouver", &["YVR"], "YVR"),
            entry("مونترال", Lang::Fa, "Montreal", &["YUL"], "YUL"),
            entry("montreal", Lang::En, "Montreal", &["YUL"], "YUL"),
            entry("yul", Lang::En, "Montreal", &["YUL"], "YUL"),
            entry("مشهد", Lang::Fa, "Mashhad", &["MHD"], "MHD"),
            entry("mashhad", Lang::En, "Mashhad", &["MHD"], "MHD"),
            entry("کلگری", Lang::Fa, "Calgary", &["YYC"], "YYC"),
            entry("calgary", Lang::En, "Calgary", &["YYC"], "YYC"),
            entry("yyc", Lang::En, "Calgary", &["YYC"], "YYC"),
            entry("شیراز", Lang::Fa, "Shiraz", &["SYZ"], "SYZ"),
            entry("shiraz", Lang::En, "Shiraz", &["SYZ"], "SYZ"),
            entry("اصفهان", Lang::Fa, "Isfahan", &["IFN"], "IFN"),
            entry("isfahan", Lang::En, "Isfahan", &["IFN"], "IFN"),
            entry("esfahan", Lang::En, "Isfahan", &["IFN"], "IFN"),
            entry("اتاوا", Lang::Fa, "Ottawa", &["YOW"], "YOW"),
            entry("ottawa", Lang::En, "Ottawa", &["YOW"], "YOW"),
            entry("دبی", Lang::Fa, "Dubai", &["DXB"], "DXB"),
            entry("dubai", Lang::En, "Dubai", &["DXB"], "DXB"),
            entry("dxb", Lang::En, "Dubai", &["DXB"], "DXB"),
        ];

        // Builtin data is known-good; validation cannot fail here.
        Self::from_entries(entries).unwrap_or_default()
    }

    /// Exact lookup: tag-specific first, then the language-agnostic fallback.
    /// `alias` must already be in canonical key form.
    pub fn get(&self, alias: &str, lang: Lang) -> Option<&AliasEntry> {
        self.by_alias_lang
            .get(&(alias.to_string(), lang))
            .or_else(|| self.by_alias.get(alias))
            .map(|&idx| &self.entries[idx])
    }

    /// Bounded fuzzy lookup: accept the closest alias whose edit distance
    /// fits its budget, but only if the closest match is unique. Two
    /// different cities at the same distance are a miss, not a coin toss.
    pub fn fuzzy(&self, query: &str, policy: &FuzzyPolicy) -> Option<&AliasEntry> {
        let query_chars: Vec<char> = query.chars().collect();
        if query_chars.is_empty() {
            return None;
        }

        let mut best_dist = usize::MAX;
        let mut best: Option<&AliasEntry> = None;
        let mut ambiguous = false;

        for entry in &self.entries {
            let alias_len = entry.alias.chars().count();
            let budget = policy.budget(alias_len);
            if budget == 0 {
                continue;
            }
            // Length difference is a lower bound on the distance.
            if alias_len.abs_diff(query_chars.len()) > budget {
                continue;
            }
            let dist = levenshtein(&query_chars, &entry.alias);
            if dist > budget {
                continue;
            }
            if dist < best_dist {
                best_dist = dist;
                best = Some(entry);
                ambiguous = false;
            } else if dist == best_dist {
                if let Some(current) = best {
                    let same_city = current.canonical_name == entry.canonical_name
                        && current.primary_code == entry.primary_code;
                    if !same_city {
                        ambiguous = true;
                    }
                }
            }
        }

        if ambiguous {
            debug!(query, "fuzzy alias lookup ambiguous, treating as miss");
            return None;
        }
        if let Some(entry) = best {
            debug!(query, alias = %entry.alias, dist = best_dist, "fuzzy alias hit");
        }
        best
    }

    pub fn entries(&self) -> &[AliasEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Normalized lowercase key form shared by load and lookup.
pub(crate) fn canonical_key(alias: &str) -> String {
    normalize::normalize(alias).text.to_lowercase()
}

fn levenshtein(a: &[char], b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0usize; b.len() + 1];

    for (i, &ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_table() {
        assert!(matches!(AliasTable::from_entries(vec![]), Err(AliasLoadError::Empty)));
    }

    #[test]
    fn rejects_entry_without_codes() {
        let entry = AliasEntry {
            alias: "x".into(),
            lang: Lang::En,
            canonical_name: "X".into(),
            codes: vec![],
            primary_code: "XXX".into(),
        };
        assert!(matches!(
            AliasTable::from_entries(vec![entry]),
            Err(AliasLoadError::NoCodes { .. })
        ));
    }

    #[test]
    fn rejects_primary_outside_code_list() {
        let entry = AliasEntry {
            alias: "tehran".into(),
            lang: Lang::En,
            canonical_name: "Tehran".into(),
            codes: vec!["THR".into()],
            primary_code: "IKA".into(),
        };
        assert!(matches!(
            AliasTable::from_entries(vec![entry]),
            Err(AliasLoadError::PrimaryNotListed { .. })
        ));
    }

    #[test]
    fn loads_from_json() {
        let json = r#"[
            {"alias": "تهران", "lang": "fa", "canonical_name": "Tehran",
             "codes": ["THR", "IKA"], "primary_code": "THR"}
        ]"#;
        let table = AliasTable::from_json_str(json).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("تهران", Lang::Fa).unwrap().primary_code, "THR");
    }

    #[test]
    fn language_agnostic_fallback() {
        let table = AliasTable::builtin();
        // "toronto" is tagged En; an Fa-tagged query still finds it.
        assert_eq!(table.get("toronto", Lang::Fa).unwrap().primary_code, "YYZ");
    }

    #[test]
    fn aliases_are_normalized_at_load() {
        let entries = vec![AliasEntry {
            alias: "  Tehran ".into(),
            lang: Lang::En,
            canonical_name: "Tehran".into(),
            codes: vec!["THR".into()],
            primary_code: "THR".into(),
        }];
        let table = AliasTable::from_entries(entries).unwrap();
        assert!(table.get("tehran", Lang::En).is_some());
    }

    #[test]
    fn ambiguous_city_always_returns_primary() {
        let table = AliasTable::builtin();
        for alias in ["تهران", "طهران", "tehran", "thr"] {
            assert_eq!(table.get(alias, Lang::Fa).unwrap().primary_code, "THR");
        }
        // Explicit IKA aliases keep their own primary.
        assert_eq!(table.get("ika", Lang::En).unwrap().primary_code, "IKA");
    }

    #[test]
    fn fuzzy_accepts_unique_close_match() {
        let table = AliasTable::builtin();
        let policy = FuzzyPolicy::default();
        assert_eq!(table.fuzzy("torontto", &policy).unwrap().primary_code, "YYZ");
        assert_eq!(table.fuzzy("vancuver", &policy).unwrap().primary_code, "YVR");
    }

    #[test]
    fn fuzzy_rejects_short_aliases_and_far_queries() {
        let table = AliasTable::builtin();
        let policy = FuzzyPolicy::default();
        // 3-letter codes get no budget; a typo in one is a miss.
        assert!(table.fuzzy("yyx", &policy).is_none());
        assert!(table.fuzzy("samarkand", &policy).is_none());
    }

    #[test]
    fn fuzzy_tie_between_cities_is_a_miss() {
        let a = AliasEntry {
            alias: "arvin".into(),
            lang: Lang::En,
            canonical_name: "Arvin".into(),
            codes: vec!["AAA".into()],
            primary_code: "AAA".into(),
        };
        let b = AliasEntry {
            alias: "arlin".into(),
            lang: Lang::En,
            canonical_name: "Arlin".into(),
            codes: vec!["BBB".into()],
            primary_code: "BBB".into(),
        };
        let table = AliasTable::from_entries(vec![a, b]).unwrap();
        // "arbin" is distance 1 from both.
        assert!(table.fuzzy("arbin", &FuzzyPolicy::default()).is_none());
    }

    #[test]
    fn levenshtein_basics() {
        let chars: Vec<char> = "kitten".chars().collect();
        assert_eq!(levenshtein(&chars, "sitting"), 3);
        assert_eq!(levenshtein(&chars, "kitten"), 0);
        assert_eq!(levenshtein(&[], "abc"), 3);
    }
}
